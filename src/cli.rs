//! CLI interface for the ATS checker

use crate::config::OutputFormat;
use crate::processing::SkillCategory;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Extensions accepted for resumes and job description files.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "ats-checker")]
#[command(about = "Check how well a resume matches a job description")]
#[command(long_about = "Score a resume against a job description the way an applicant tracking system would: find the catalog skills the job asks for and report which ones the resume covers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze(AnalyzeArgs),

    /// List the skill catalog
    Skills {
        /// Only show one category (language, framework, cloud, devops, database, data, practice, tool)
        #[arg(long)]
        category: Option<String>,

        /// Skill catalog TOML file to list instead of the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to resume file (PDF, DOCX, TXT, MD)
    #[arg(short, long)]
    pub resume: PathBuf,

    /// Path to job description file (PDF, DOCX, TXT, MD)
    #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
    pub job: Option<PathBuf>,

    /// Job description given inline
    #[arg(long)]
    pub job_text: Option<String>,

    /// Output format: console, json, markdown, html, pdf
    #[arg(short, long)]
    pub output: Option<String>,

    /// Save output to file
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Include keywords, additional skills and near matches
    #[arg(short, long)]
    pub detailed: bool,

    /// Skill catalog TOML file
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        "pdf" => Ok(OutputFormat::Pdf),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html, pdf",
            format
        )),
    }
}

pub fn parse_category(category: &str) -> Result<SkillCategory, String> {
    category.parse::<SkillCategory>()
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("pdf"), Ok(OutputFormat::Pdf));
        assert!(parse_output_format("docx").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.DOCX"), SUPPORTED_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.rtf"), SUPPORTED_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("resume"), SUPPORTED_EXTENSIONS).is_err());
    }

    #[test]
    fn test_analyze_requires_one_job_source() {
        let cli = Cli::try_parse_from([
            "ats-checker", "analyze", "--resume", "cv.txt", "--job-text", "Need Rust",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.job_text.as_deref(), Some("Need Rust"));
                assert!(args.job.is_none());
            }
            _ => panic!("expected analyze"),
        }

        assert!(Cli::try_parse_from(["ats-checker", "analyze", "--resume", "cv.txt"]).is_err());
        assert!(Cli::try_parse_from([
            "ats-checker", "analyze", "--resume", "cv.txt", "--job", "jd.txt", "--job-text", "x",
        ])
        .is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["ats-checker", "config", "path", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Config { action: Some(ConfigAction::Path) }));
    }
}
