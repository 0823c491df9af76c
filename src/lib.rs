//! ATS checker library: score a resume against a job description by the
//! catalog skills both mention.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{AtsCheckerError, Result};
pub use processing::{AnalysisInput, AnalysisResult, Analyzer, SkillCatalog};
