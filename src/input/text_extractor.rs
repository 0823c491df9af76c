//! Text extraction from various file formats

use crate::error::{AtsCheckerError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        // pdf-extract panics on some malformed fonts; a blocking task contains it
        let extracted = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await;

        match extracted {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(AtsCheckerError::Extraction(format!("{}: {}", path.display(), e))),
            Err(e) if e.is_panic() => Err(AtsCheckerError::Extraction(format!(
                "{}: PDF parser failed on malformed content",
                path.display()
            ))),
            Err(e) => Err(AtsCheckerError::Extraction(format!("{}: {}", path.display(), e))),
        }
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Self::extract_from_bytes(&bytes)
            .map_err(|e| AtsCheckerError::Extraction(format!("{}: {}", path.display(), e)))
    }
}

impl DocxExtractor {
    const DOCUMENT_PART: &'static str = "word/document.xml";

    /// Pull the body text out of a DOCX package. Paragraph ends become newlines.
    pub fn extract_from_bytes(bytes: &[u8]) -> std::result::Result<String, String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| format!("not a DOCX package: {}", e))?;

        let mut xml = String::new();
        archive
            .by_name(Self::DOCUMENT_PART)
            .map_err(|e| format!("missing {}: {}", Self::DOCUMENT_PART, e))?
            .read_to_string(&mut xml)
            .map_err(|e| format!("unreadable {}: {}", Self::DOCUMENT_PART, e))?;

        Self::document_xml_to_text(&xml)
    }

    fn document_xml_to_text(xml: &str) -> std::result::Result<String, String> {
        let run_regex = Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|</w:p>|<w:tab/>|<w:br/>")
            .map_err(|e| e.to_string())?;
        let entity_regex = Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);")
            .map_err(|e| e.to_string())?;

        let mut text = String::new();
        for cap in run_regex.captures_iter(xml) {
            match cap.get(1) {
                Some(run) => text.push_str(&decode_xml_entities(run.as_str(), &entity_regex)),
                None => match &cap[0] {
                    "<w:tab/>" => text.push(' '),
                    _ => text.push('\n'),
                },
            }
        }

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Single pass over named and numeric references, so "&amp;lt;" stays "&lt;".
/// References to invalid code points are left as written.
fn decode_xml_entities(text: &str, entity_regex: &Regex) -> String {
    entity_regex
        .replace_all(text, |caps: &regex::Captures| {
            let decoded = match &caps[1] {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                numeric => {
                    let digits = &numeric[1..];
                    let code = match digits.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => digits.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        String::from_utf8(bytes).map_err(|_| {
            AtsCheckerError::Extraction(format!("{} is not valid UTF-8 text", path.display()))
        })
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(Self::markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    /// Strip Markdown syntax, keeping one block per line.
    pub fn markdown_to_text(markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
