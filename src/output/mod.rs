//! Report rendering and export

pub mod formatter;
pub mod pdf;
pub mod report;

pub use formatter::{OutputFormatter, RenderedReport, ReportGenerator};
pub use report::{AnalysisReport, ReportMetadata, Verdict};
