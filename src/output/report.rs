//! Report structures wrapping an analysis result for presentation

use crate::processing::analyzer::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a formatter needs: the result plus how and when it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: ReportSummary,
    pub result: AnalysisResult,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Compatibility score (0-100)
    pub score: u8,
    pub verdict: Verdict,
    pub relevant_skills: usize,
    pub matched_count: usize,
    pub missing_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    /// File name of the resume
    pub resume_source: String,
    /// File name of the job description, or "inline text"
    pub job_source: String,
    pub catalog_size: usize,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    Poor,
    /// The job description mentions no catalog skill
    NotApplicable,
}

impl Verdict {
    pub fn from_score(score: u8, relevant_skills: usize) -> Self {
        if relevant_skills == 0 {
            return Verdict::NotApplicable;
        }
        match score {
            80..=100 => Verdict::Excellent,
            60..=79 => Verdict::Good,
            40..=59 => Verdict::Fair,
            _ => Verdict::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Excellent => "EXCELLENT",
            Verdict::Good => "GOOD",
            Verdict::Fair => "FAIR",
            Verdict::Poor => "POOR",
            Verdict::NotApplicable => "N/A",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Verdict::Excellent => "Strong match: the resume covers nearly every skill the job asks for.",
            Verdict::Good => "Good match: most requested skills are present.",
            Verdict::Fair => "Partial match: several requested skills are missing.",
            Verdict::Poor => "Weak match: most requested skills are missing from the resume.",
            Verdict::NotApplicable => "No recognised skills in the job description to score against.",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl AnalysisReport {
    pub fn new(result: AnalysisResult, metadata: ReportMetadata) -> Self {
        let relevant_skills = result.relevant_skill_count();
        let summary = ReportSummary {
            score: result.score,
            verdict: Verdict::from_score(result.score, relevant_skills),
            relevant_skills,
            matched_count: result.matched_skills.len(),
            missing_count: result.missing_skills.len(),
        };

        Self {
            summary,
            result,
            metadata,
        }
    }

    pub fn generated_at_display(&self) -> String {
        self.metadata
            .generated_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
    }
}

impl ReportMetadata {
    pub fn new(resume_source: impl Into<String>, job_source: impl Into<String>, catalog_size: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_source: resume_source.into(),
            job_source: job_source.into(),
            catalog_size,
            processing_time_ms: 0,
        }
    }

    pub fn with_processing_time(mut self, elapsed: std::time::Duration) -> Self {
        self.processing_time_ms = elapsed.as_millis() as u64;
        self
    }
}
