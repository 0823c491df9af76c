//! Text processing and analysis module

pub mod analyzer;
pub mod similarity;
pub mod skill_catalog;
pub mod skill_matcher;
pub mod text_processor;

pub use analyzer::{AnalysisInput, AnalysisResult, Analyzer};
pub use skill_catalog::{SkillCatalog, SkillCategory, SkillEntry};
