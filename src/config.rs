//! Configuration management for the ATS checker

use crate::error::{AtsCheckerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub matching: MatchingConfig,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// How many job description keywords are compared against the resume
    pub top_keywords: usize,
    /// Jaro-Winkler similarity at which a resume token is reported as a near match
    pub fuzzy_threshold: f64,
    /// Shortest token considered a keyword
    pub min_keyword_len: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional TOML skill catalog replacing the built-in one
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    /// PDF page width and height in millimetres
    pub pdf_page_size_mm: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
    Pdf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                top_keywords: 20,
                fuzzy_threshold: 0.9,
                min_keyword_len: 3,
            },
            catalog: CatalogConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                // A4
                pdf_page_size_mm: (210.0, 297.0),
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                AtsCheckerError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            AtsCheckerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-checker")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching.top_keywords == 0 {
            return Err(AtsCheckerError::Configuration(
                "matching.top_keywords must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.matching.fuzzy_threshold) {
            return Err(AtsCheckerError::Configuration(format!(
                "matching.fuzzy_threshold must be between 0 and 1, got {}",
                self.matching.fuzzy_threshold
            )));
        }
        let (width, height) = self.output.pdf_page_size_mm;
        if width < 100.0 || height < 100.0 {
            return Err(AtsCheckerError::Configuration(format!(
                "output.pdf_page_size_mm is too small: {}x{}",
                width, height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.matching.fuzzy_threshold = 1.5;
        config.save_to(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AtsCheckerError::Configuration(_)));
    }

    #[test]
    fn test_garbage_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "matching = 3").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(AtsCheckerError::Configuration(_))
        ));
    }
}
