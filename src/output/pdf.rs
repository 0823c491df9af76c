//! PDF rendering of an analysis report

use crate::config::OutputFormat;
use crate::error::{AtsCheckerError, Result};
use crate::output::formatter::{OutputFormatter, RenderedReport};
use crate::output::report::AnalysisReport;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

const MARGIN_MM: f32 = 20.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 5.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum LineStyle {
    Title,
    Heading,
    Body,
}

impl LineStyle {
    fn font_size(self) -> f32 {
        match self {
            LineStyle::Title => 18.0,
            LineStyle::Heading => 13.0,
            LineStyle::Body => BODY_SIZE,
        }
    }

    fn advance_mm(self) -> f32 {
        match self {
            LineStyle::Title => 10.0,
            LineStyle::Heading => 8.0,
            LineStyle::Body => LINE_HEIGHT_MM,
        }
    }
}

/// Paginated PDF report using the builtin Helvetica fonts.
pub struct PdfFormatter {
    page_size_mm: (f32, f32),
}

impl PdfFormatter {
    pub const A4: (f32, f32) = (210.0, 297.0);

    pub fn new(page_size_mm: (f32, f32)) -> Self {
        Self { page_size_mm }
    }

    /// Characters per body line for the configured page width.
    fn wrap_width(&self) -> usize {
        let usable = (self.page_size_mm.0 - 2.0 * MARGIN_MM).max(20.0);
        // Helvetica averages roughly half an em per char
        let char_mm = BODY_SIZE * 0.3528 * 0.5;
        (usable / char_mm) as usize
    }

    fn layout(&self, report: &AnalysisReport) -> Vec<(String, LineStyle)> {
        let summary = &report.summary;
        let result = &report.result;
        let width = self.wrap_width();
        let mut lines = Vec::new();

        let push_body = |lines: &mut Vec<(String, LineStyle)>, text: &str| {
            for line in wrap(&sanitize(text), width) {
                lines.push((line, LineStyle::Body));
            }
        };

        lines.push(("ATS Compatibility Report".to_string(), LineStyle::Title));
        push_body(&mut lines, &format!("Generated: {}", report.generated_at_display()));
        push_body(
            &mut lines,
            &format!(
                "Resume: {}    Job: {}",
                report.metadata.resume_source, report.metadata.job_source
            ),
        );

        lines.push(("Score".to_string(), LineStyle::Heading));
        push_body(
            &mut lines,
            &format!("{}% ({})", summary.score, summary.verdict.label()),
        );
        push_body(&mut lines, summary.verdict.description());
        push_body(
            &mut lines,
            &format!(
                "{} of {} requested skills found. Text similarity: {:.2}%.",
                summary.matched_count, summary.relevant_skills, result.text_similarity
            ),
        );

        let sections: [(&str, &[String]); 5] = [
            ("Matched Skills", &result.matched_skills),
            ("Missing Skills", &result.missing_skills),
            ("Additional Skills", &result.additional_skills),
            ("Matched Keywords", &result.matched_keywords),
            ("Missing Keywords", &result.missing_keywords),
        ];
        for (heading, items) in sections {
            lines.push((heading.to_string(), LineStyle::Heading));
            if items.is_empty() {
                push_body(&mut lines, "None");
            } else {
                push_body(&mut lines, &items.join(", "));
            }
        }

        if !result.near_matches.is_empty() {
            lines.push(("Possible Typos".to_string(), LineStyle::Heading));
            for near in &result.near_matches {
                push_body(
                    &mut lines,
                    &format!(
                        "- '{}' resembles {} ({:.0}% similar)",
                        near.found,
                        near.skill,
                        near.similarity * 100.0
                    ),
                );
            }
        }

        if !result.suggestions.is_empty() {
            lines.push(("Suggestions".to_string(), LineStyle::Heading));
            for suggestion in &result.suggestions {
                push_body(&mut lines, &format!("- {}", suggestion));
            }
        }

        lines
    }

    fn new_page(
        &self,
        doc: &PdfDocumentReference,
        page_number: usize,
    ) -> PdfLayerReference {
        let (width, height) = self.page_size_mm;
        let (page, layer) = doc.add_page(Mm(width), Mm(height), format!("Page {}", page_number));
        doc.get_page(page).get_layer(layer)
    }
}

impl OutputFormatter for PdfFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<RenderedReport> {
        let (width, height) = self.page_size_mm;
        let (doc, page, layer) =
            PdfDocument::new("ATS Compatibility Report", Mm(width), Mm(height), "Page 1");

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AtsCheckerError::Render(format!("Failed to load font: {}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AtsCheckerError::Render(format!("Failed to load font: {}", e)))?;

        let mut current = doc.get_page(page).get_layer(layer);
        let mut pages = 1;
        let mut y = height - MARGIN_MM;

        for (text, style) in self.layout(report) {
            let advance = style.advance_mm();
            if y - advance < MARGIN_MM {
                pages += 1;
                current = self.new_page(&doc, pages);
                y = height - MARGIN_MM;
            }
            y -= advance;

            let font: &IndirectFontRef = match style {
                LineStyle::Body => &regular,
                LineStyle::Title | LineStyle::Heading => &bold,
            };
            current.use_text(text, style.font_size(), Mm(MARGIN_MM), Mm(y), font);
        }

        log::debug!("Rendered PDF report with {} page(s)", pages);

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| AtsCheckerError::Render(format!("Failed to write PDF: {}", e)))?;
        Ok(RenderedReport::Binary(bytes))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }
}

impl Default for PdfFormatter {
    fn default() -> Self {
        Self::new(Self::A4)
    }
}

/// The builtin fonts only cover WinAnsi; map common typography to ASCII and
/// replace anything else.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '*',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            c if c.is_whitespace() => ' ',
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
