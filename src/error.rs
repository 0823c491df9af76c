//! Error handling for the ATS checker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsCheckerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to extract text: {0}")]
    Extraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Skill catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Report rendering error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, AtsCheckerError>;

impl AtsCheckerError {
    /// Whether the failure happened before any analysis could run.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            AtsCheckerError::Extraction(_) | AtsCheckerError::UnsupportedFormat(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_message_is_user_facing() {
        let err = AtsCheckerError::Extraction("resume.pdf: corrupt xref table".to_string());
        assert_eq!(
            err.to_string(),
            "Unable to extract text: resume.pdf: corrupt xref table"
        );
        assert!(err.is_extraction_failure());
    }

    #[test]
    fn test_render_error_is_not_extraction_failure() {
        let err = AtsCheckerError::Render("font missing".to_string());
        assert!(!err.is_extraction_failure());
    }
}
