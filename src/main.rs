//! ATS checker: resume vs job description skill compatibility

use anyhow::{anyhow, Context, Result};
use ats_checker::cli::{self, AnalyzeArgs, Cli, Commands, ConfigAction};
use ats_checker::config::Config;
use ats_checker::error::AtsCheckerError;
use ats_checker::input::InputManager;
use ats_checker::output::formatter::{save_report_to_file, suggest_filename};
use ats_checker::output::{AnalysisReport, RenderedReport, ReportGenerator, ReportMetadata};
use ats_checker::processing::{AnalysisInput, Analyzer, SkillCatalog, SkillCategory, SkillEntry};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run_command(cli.command, config, cli.config.as_deref()).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_override: Option<&Path>) -> Result<()> {
    match command {
        Commands::Analyze(args) => analyze(args, &config).await,
        Commands::Skills { category, catalog } => list_skills(category, catalog, &config),
        Commands::Config { action } => manage_config(action, &config, config_override),
    }
}

async fn analyze(args: AnalyzeArgs, config: &Config) -> Result<()> {
    info!("Starting ATS compatibility analysis");

    cli::validate_file_extension(&args.resume, cli::SUPPORTED_EXTENSIONS)
        .map_err(|e| anyhow!("Resume file: {}", e))?;
    if let Some(job) = &args.job {
        cli::validate_file_extension(job, cli::SUPPORTED_EXTENSIONS)
            .map_err(|e| anyhow!("Job description file: {}", e))?;
    }

    let output_format = match &args.output {
        Some(format) => cli::parse_output_format(format).map_err(|e| anyhow!(e))?,
        None => config.output.format,
    };
    let detailed = args.detailed || config.output.detailed;
    debug!("Output format: {:?}, detailed: {}", output_format, detailed);

    let catalog = load_catalog(args.catalog.as_deref(), config)?;
    let catalog_size = catalog.len();

    let progress = spinner("Extracting text...");
    let mut input_manager = InputManager::new();

    let resume_text = match input_manager.extract_text(&args.resume).await {
        Ok(text) => text,
        Err(e) => {
            progress.finish_and_clear();
            return Err(describe_input_error(e, "resume", &args.resume));
        }
    };

    let (job_text, job_source) = match (&args.job, &args.job_text) {
        (Some(job), _) => match input_manager.extract_text(job).await {
            Ok(text) => (text, display_name(job)),
            Err(e) => {
                progress.finish_and_clear();
                return Err(describe_input_error(e, "job description", job));
            }
        },
        (None, Some(text)) => (text.clone(), "inline text".to_string()),
        (None, None) => return Err(anyhow!("Provide a job description with --job or --job-text")),
    };

    if resume_text.is_empty() {
        warn!("Resume text is empty; every requested skill will be reported missing");
    }

    progress.set_message("Matching skills...");
    let started = Instant::now();
    let analyzer = Analyzer::new(catalog, &config.matching).context("Failed to build analyzer")?;
    let result = analyzer.analyze(&AnalysisInput::new(resume_text, job_text));
    let elapsed = started.elapsed();
    progress.finish_and_clear();

    info!(
        "Score {}% ({} of {} requested skills) in {}ms",
        result.score,
        result.matched_skills.len(),
        result.relevant_skill_count(),
        elapsed.as_millis()
    );

    let metadata = ReportMetadata::new(display_name(&args.resume), job_source, catalog_size)
        .with_processing_time(elapsed);
    let report = AnalysisReport::new(result, metadata);

    // Escape codes only belong on a terminal
    let use_colors = config.output.color_output && args.save.is_none();
    let generator =
        ReportGenerator::with_options(use_colors, detailed, config.output.pdf_page_size_mm);

    let rendered = match generator.generate_report(&report, &output_format) {
        Ok(rendered) => rendered,
        Err(e) => {
            warn!("{}; falling back to console output", e);
            eprintln!("{} {}", "⚠️  Could not render report:".yellow(), e);
            println!("{}", generator.generate_console(&report)?);
            return Ok(());
        }
    };

    match (&args.save, rendered) {
        (Some(path), rendered) => {
            save_report_to_file(&rendered, path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            println!("✅ Report saved to {}", path.display());
        }
        (None, RenderedReport::Text(text)) => println!("{}", text),
        (None, rendered @ RenderedReport::Binary(_)) => {
            let path = PathBuf::from(suggest_filename(
                &output_format,
                &report.metadata.resume_source,
                true,
            ));
            save_report_to_file(&rendered, &path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            println!("✅ Report saved to {}", path.display());
        }
    }

    Ok(())
}

fn list_skills(category: Option<String>, catalog: Option<PathBuf>, config: &Config) -> Result<()> {
    let catalog = load_catalog(catalog.as_deref(), config)?;
    let filter = category
        .map(|c| cli::parse_category(&c))
        .transpose()
        .map_err(|e| anyhow!(e))?;

    println!("📚 Skill Catalog ({} skills)\n", catalog.len());
    for category in SkillCategory::ALL {
        if filter.map_or(false, |f| f != category) {
            continue;
        }
        let entries: Vec<&SkillEntry> = catalog.by_category(category).collect();
        if entries.is_empty() {
            continue;
        }

        println!("{}", category.to_string().bold());
        for entry in entries {
            if entry.aliases.is_empty() {
                println!("  • {}", entry.name);
            } else {
                println!("  • {} {}", entry.name, format!("({})", entry.aliases.join(", ")).dimmed());
            }
        }
        println!();
    }

    Ok(())
}

fn manage_config(action: Option<ConfigAction>, config: &Config, config_override: Option<&Path>) -> Result<()> {
    let config_path = config_override
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path);

    match action {
        Some(ConfigAction::Show) | None => {
            println!("⚙️  Current Configuration ({})\n", config_path.display());
            let rendered = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
            println!("{}", rendered);
        }
        Some(ConfigAction::Reset) => {
            println!("🔄 Resetting configuration to defaults...");
            let defaults = Config::default();
            let saved = match config_override {
                Some(path) => defaults.save_to(path),
                None => defaults.save(),
            };
            saved.with_context(|| format!("Failed to write {}", config_path.display()))?;
            println!("✅ Configuration reset successfully!");
        }
        Some(ConfigAction::Path) => println!("{}", config_path.display()),
    }
    Ok(())
}

/// Extraction failures get a hint about the document itself; anything else
/// (missing file, unsupported type) is reported as is.
fn describe_input_error(err: AtsCheckerError, what: &str, path: &Path) -> anyhow::Error {
    let message = if err.is_extraction_failure() {
        format!(
            "Could not read any text from the {} {}; it may be scanned, image-only or damaged",
            what,
            path.display()
        )
    } else {
        format!("Failed to read {} {}", what, path.display())
    };
    anyhow::Error::new(err).context(message)
}

/// Catalog from the command line, then the config file, then the built-in one.
fn load_catalog(override_path: Option<&Path>, config: &Config) -> Result<SkillCatalog> {
    match override_path.or(config.catalog.path.as_deref()) {
        Some(path) => {
            info!("Loading skill catalog from {}", path.display());
            SkillCatalog::load(path)
                .with_context(|| format!("Failed to load skill catalog {}", path.display()))
        }
        None => Ok(SkillCatalog::builtin()),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
