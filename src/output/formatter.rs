//! Output formatters: console, JSON, Markdown and HTML renderings of a report

use crate::config::OutputFormat;
use crate::error::{AtsCheckerError, Result};
use crate::output::pdf::PdfFormatter;
use crate::output::report::{AnalysisReport, Verdict};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Rendered report. PDF is binary, everything else is text.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedReport {
    Text(String),
    Binary(Vec<u8>),
}

impl RenderedReport {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RenderedReport::Text(text) => text.as_bytes(),
            RenderedReport::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RenderedReport::Text(text) => Some(text),
            RenderedReport::Binary(_) => None,
        }
    }
}

/// Trait for turning an analysis report into a document
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<RenderedReport>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and a score bar
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing and notes
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter with embedded styling
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
    pdf_formatter: PdfFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ATS Compatibility Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #007acc; padding-bottom: 20px; }
        .score-badge { display: inline-block; padding: 8px 16px; border-radius: 20px; font-weight: bold; color: white; margin-left: 10px; }
        .score-excellent { background: #28a745; }
        .score-good { background: #17a2b8; }
        .score-fair { background: #ffc107; color: #000; }
        .score-poor { background: #dc3545; }
        .score-na { background: #6c757d; }
        .progress { background: #e9ecef; border-radius: 6px; height: 14px; overflow: hidden; }
        .progress-bar { background: #007acc; height: 14px; }
        .columns { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; }
        .matched, .missing { background: #f8f9fa; padding: 15px; border-radius: 6px; }
        .matched { border-left: 4px solid #28a745; }
        .missing { border-left: 4px solid #dc3545; }
        .section h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 10px; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>ATS Compatibility Report</h1>
            <p>Generated: {{ generated_at }}</p>
        </div>

        <div class="section">
            <h2>Compatibility Score</h2>
            <h3>{{ score }}% <span class="score-badge {{ score_class }}">{{ verdict_label }}</span></h3>
            <div class="progress"><div class="progress-bar" style="width: {{ score }}%"></div></div>
            <p>{{ verdict_description }}</p>
            <p>{{ matched_count }} of {{ relevant_count }} requested skills found. Text similarity: {{ text_similarity }}%</p>
        </div>

        <div class="section columns">
            <div class="matched">
                <h3>Matched Skills</h3>
                {% if matched_skills.is_empty() %}<p>None</p>{% else %}
                <ul>{% for skill in matched_skills %}<li>{{ skill }}</li>{% endfor %}</ul>
                {% endif %}
            </div>
            <div class="missing">
                <h3>Missing Skills</h3>
                {% if missing_skills.is_empty() %}<p>None</p>{% else %}
                <ul>{% for skill in missing_skills %}<li>{{ skill }}</li>{% endfor %}</ul>
                {% endif %}
            </div>
        </div>

        {% if !additional_skills.is_empty() %}
        <div class="section">
            <h2>Additional Skills</h2>
            <p>{{ additional_skills.join(", ") }}</p>
        </div>
        {% endif %}

        <div class="section columns">
            <div class="matched">
                <h3>Matched Keywords</h3>
                <p>{{ matched_keywords.join(", ") }}</p>
            </div>
            <div class="missing">
                <h3>Missing Keywords</h3>
                <p>{{ missing_keywords.join(", ") }}</p>
            </div>
        </div>

        {% if !near_matches.is_empty() %}
        <div class="section">
            <h2>Possible Typos</h2>
            <ul>{% for near in near_matches %}<li>{{ near }}</li>{% endfor %}</ul>
        </div>
        {% endif %}

        {% if !suggestions.is_empty() %}
        <div class="section">
            <h2>Suggestions</h2>
            <ul>{% for suggestion in suggestions %}<li>{{ suggestion }}</li>{% endfor %}</ul>
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>Generated by ATS Checker v{{ version }}</strong></p>
            <p><strong>Resume:</strong> {{ resume_source }} | <strong>Job:</strong> {{ job_source }}</p>
            <p><strong>Skill catalog:</strong> {{ catalog_size }} skills | <strong>Processing time:</strong> {{ processing_time }}ms</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    score: u8,
    score_class: &'static str,
    verdict_label: &'static str,
    verdict_description: &'static str,
    matched_count: usize,
    relevant_count: usize,
    text_similarity: String,
    matched_skills: Vec<String>,
    missing_skills: Vec<String>,
    additional_skills: Vec<String>,
    matched_keywords: Vec<String>,
    missing_keywords: Vec<String>,
    near_matches: Vec<String>,
    suggestions: Vec<String>,
    version: String,
    resume_source: String,
    job_source: String,
    catalog_size: usize,
    processing_time: u64,
}

fn near_match_line(found: &str, skill: &str, similarity: f64) -> String {
    format!("'{}' resembles {} ({:.0}% similar)", found, skill, similarity * 100.0)
}

fn score_bar(score: u8, width: usize) -> String {
    let filled = (score as usize * width + 50) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, verdict: Verdict) -> String {
        let color = match verdict {
            Verdict::Excellent => Color::Green,
            Verdict::Good => Color::BrightGreen,
            Verdict::Fair => Color::Yellow,
            Verdict::Poor => Color::BrightRed,
            Verdict::NotApplicable => Color::White,
        };

        if self.use_colors {
            format!("[{}]", verdict.label().color(color).bold())
        } else {
            format!("[{}]", verdict.label())
        }
    }

    fn format_list(&self, items: &[String], color: Color) -> String {
        if items.is_empty() {
            return "  (none)\n".to_string();
        }
        items
            .iter()
            .map(|item| format!("  • {}\n", self.colorize(item, color)))
            .collect()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<RenderedReport> {
        let summary = &report.summary;
        let result = &report.result;
        let mut output = String::new();

        output.push_str(&self.format_header("ATS COMPATIBILITY ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.generated_at_display(),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Compatibility Score", 2));
        output.push_str(&format!(
            "ATS Score: {}% {}\n",
            summary.score,
            self.format_score_badge(summary.verdict)
        ));
        output.push_str(&format!("{} {}%\n", score_bar(summary.score, 30), summary.score));
        output.push_str(&format!(
            "{}\n",
            self.colorize(summary.verdict.description(), Color::Cyan)
        ));
        output.push_str(&format!(
            "{} of {} requested skills found | Text similarity: {:.2}%\n",
            summary.matched_count, summary.relevant_skills, result.text_similarity
        ));

        output.push_str(&self.format_header("Matched Skills", 3));
        output.push_str(&self.format_list(&result.matched_skills, Color::Green));

        output.push_str(&self.format_header("Missing Skills", 3));
        output.push_str(&self.format_list(&result.missing_skills, Color::Red));

        if self.detailed {
            output.push_str(&self.format_header("Additional Skills (not requested)", 3));
            output.push_str(&self.format_list(&result.additional_skills, Color::Blue));

            output.push_str(&self.format_header("Keywords", 3));
            output.push_str(&format!(
                "Matched: {}\n",
                if result.matched_keywords.is_empty() {
                    "(none)".to_string()
                } else {
                    result.matched_keywords.join(", ")
                }
            ));
            output.push_str(&format!(
                "Missing: {}\n",
                if result.missing_keywords.is_empty() {
                    "(none)".to_string()
                } else {
                    result.missing_keywords.join(", ")
                }
            ));

            if !result.near_matches.is_empty() {
                output.push_str(&self.format_header("Possible Typos", 3));
                for near in &result.near_matches {
                    output.push_str(&format!(
                        "  • {}\n",
                        near_match_line(&near.found, &near.skill, near.similarity)
                    ));
                }
            }
        }

        if !result.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 2));
            for suggestion in &result.suggestions {
                output.push_str(&format!("  💡 {}\n", suggestion));
            }
        }

        Ok(RenderedReport::Text(output))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<RenderedReport> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(RenderedReport::Text(json))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_list(items: &[String]) -> String {
        if items.is_empty() {
            return "_None_\n".to_string();
        }
        items.iter().map(|item| format!("- {}\n", item)).collect()
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<RenderedReport> {
        let summary = &report.summary;
        let result = &report.result;
        let mut md = String::new();

        md.push_str("# ATS Compatibility Report\n\n");
        md.push_str(&format!(
            "**Score:** {}% ({})  \n",
            summary.score,
            summary.verdict.label()
        ));
        md.push_str(&format!("{}\n\n", summary.verdict.description()));
        md.push_str(&format!(
            "{} of {} requested skills found. Text similarity: {:.2}%.\n\n",
            summary.matched_count, summary.relevant_skills, result.text_similarity
        ));

        md.push_str("## Matched Skills\n\n");
        md.push_str(&Self::markdown_list(&result.matched_skills));
        md.push_str("\n## Missing Skills\n\n");
        md.push_str(&Self::markdown_list(&result.missing_skills));

        if !result.additional_skills.is_empty() {
            md.push_str("\n## Additional Skills\n\n");
            md.push_str(&Self::markdown_list(&result.additional_skills));
        }

        md.push_str("\n## Keywords\n\n");
        md.push_str("| Matched | Missing |\n|---|---|\n");
        md.push_str(&format!(
            "| {} | {} |\n",
            result.matched_keywords.join(", "),
            result.missing_keywords.join(", ")
        ));

        if !result.near_matches.is_empty() {
            md.push_str("\n## Possible Typos\n\n");
            for near in &result.near_matches {
                md.push_str(&format!(
                    "- {}\n",
                    near_match_line(&near.found, &near.skill, near.similarity)
                ));
            }
        }

        if !result.suggestions.is_empty() {
            md.push_str("\n## Suggestions\n\n");
            md.push_str(&Self::markdown_list(&result.suggestions));
        }

        if self.include_metadata {
            md.push_str("\n---\n\n");
            md.push_str(&format!(
                "_Generated {} by ATS Checker v{} | Resume: {} | Job: {} | Catalog: {} skills_\n",
                report.generated_at_display(),
                report.metadata.tool_version,
                report.metadata.resume_source,
                report.metadata.job_source,
                report.metadata.catalog_size
            ));
        }

        Ok(RenderedReport::Text(md))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let result = &report.result;
        let score_class = match report.summary.verdict {
            Verdict::Excellent => "score-excellent",
            Verdict::Good => "score-good",
            Verdict::Fair => "score-fair",
            Verdict::Poor => "score-poor",
            Verdict::NotApplicable => "score-na",
        };

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: report.generated_at_display(),
            score: report.summary.score,
            score_class,
            verdict_label: report.summary.verdict.label(),
            verdict_description: report.summary.verdict.description(),
            matched_count: report.summary.matched_count,
            relevant_count: report.summary.relevant_skills,
            text_similarity: format!("{:.2}", result.text_similarity),
            matched_skills: result.matched_skills.clone(),
            missing_skills: result.missing_skills.clone(),
            additional_skills: result.additional_skills.clone(),
            matched_keywords: result.matched_keywords.clone(),
            missing_keywords: result.missing_keywords.clone(),
            near_matches: result
                .near_matches
                .iter()
                .map(|n| near_match_line(&n.found, &n.skill, n.similarity))
                .collect(),
            suggestions: result.suggestions.clone(),
            version: report.metadata.tool_version.clone(),
            resume_source: report.metadata.resume_source.clone(),
            job_source: report.metadata.job_source.clone(),
            catalog_size: report.metadata.catalog_size,
            processing_time: report.metadata.processing_time_ms,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<RenderedReport> {
        let html = self
            .create_template_data(report)
            .render()
            .map_err(|e| AtsCheckerError::Render(e.to_string()))?;
        Ok(RenderedReport::Text(html))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, PdfFormatter::A4)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pdf_page_size_mm: (f32, f32)) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
            pdf_formatter: PdfFormatter::new(pdf_page_size_mm),
        }
    }

    pub fn generate_report(
        &self,
        report: &AnalysisReport,
        format: &OutputFormat,
    ) -> Result<RenderedReport> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
            OutputFormat::Pdf => &self.pdf_formatter,
        };
        formatter.format_report(report)
    }

    /// Console rendering, used when another format fails to render.
    pub fn generate_console(&self, report: &AnalysisReport) -> Result<String> {
        match self.console_formatter.format_report(report)? {
            RenderedReport::Text(text) => Ok(text),
            RenderedReport::Binary(_) => Err(AtsCheckerError::Render(
                "console output must be text".to_string(),
            )),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(report: &RenderedReport, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, report.as_bytes())?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
        OutputFormat::Pdf => "pdf",
    };

    format!("{}_ats_report{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::tests::sample_report;

    #[test]
    fn test_console_without_colors() {
        let formatter = ConsoleFormatter::new(false, true);
        let rendered = formatter.format_report(&sample_report()).unwrap();
        let text = rendered.as_text().unwrap();

        assert!(text.contains("ATS Score: 67% [GOOD]"));
        assert!(text.contains("  • Python\n"));
        assert!(text.contains("  • Docker\n"));
        assert!(text.contains("'dokker' resembles Docker"));
        assert!(text.contains("Text similarity: 42.50%"));
        assert!(!text.contains("\u{1b}["));
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0, 10), "[░░░░░░░░░░]");
        assert_eq!(score_bar(67, 10), "[███████░░░]");
        assert_eq!(score_bar(100, 10), "[██████████]");
    }

    #[test]
    fn test_json_round_trips_result() {
        let report = sample_report();
        let rendered = JsonFormatter::new(false).format_report(&report).unwrap();

        let parsed: AnalysisReport = serde_json::from_str(rendered.as_text().unwrap()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_markdown_sections() {
        let rendered = MarkdownFormatter::new(true)
            .format_report(&sample_report())
            .unwrap();
        let md = rendered.as_text().unwrap();

        assert!(md.starts_with("# ATS Compatibility Report"));
        assert!(md.contains("**Score:** 67% (GOOD)"));
        assert!(md.contains("## Missing Skills\n\n- Docker\n"));
        assert!(md.contains("| python, react | docker |"));
        assert!(md.contains("Resume: resume.pdf"));
    }

    #[test]
    fn test_html_escapes_and_lists() {
        let mut report = sample_report();
        report.result.matched_skills.push("<script>".to_string());

        let rendered = HtmlFormatter::new(false).format_report(&report).unwrap();
        let html = rendered.as_text().unwrap();

        assert!(html.contains("<li>Python</li>"));
        assert!(html.contains("score-good"));
        assert!(!html.contains("<li><script>"));
        assert!(!html.contains("<style>"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, PdfFormatter::A4);
        let report = sample_report();

        assert!(matches!(
            generator.generate_report(&report, &OutputFormat::Markdown).unwrap(),
            RenderedReport::Text(_)
        ));
        assert!(matches!(
            generator.generate_report(&report, &OutputFormat::Pdf).unwrap(),
            RenderedReport::Binary(_)
        ));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Pdf, "cv/jane_resume.pdf", false),
            "jane_resume_ats_report.pdf"
        );
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "resume.txt", false),
            "resume_ats_report.md"
        );
    }

    #[test]
    fn test_save_report_creates_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports").join("out.json");

        save_report_to_file(&RenderedReport::Text("{}".to_string()), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
