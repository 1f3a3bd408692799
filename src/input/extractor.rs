//! Text extraction from candidate files

use crate::error::{Result, ScreenerError};
use pulldown_cmark::{Event, Parser};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ScreenerError::PdfExtraction(format!(
                "failed to extract text from '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(normalize(&text))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(normalize(&content))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = fs::read_to_string(path).await?;

        // Walk the event stream instead of rendering HTML; all we want is
        // the visible text.
        let mut text = String::new();
        for event in Parser::new(&markdown) {
            match event {
                Event::Text(chunk) | Event::Code(chunk) => text.push_str(&chunk),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(_) => text.push('\n'),
                _ => {}
            }
        }
        Ok(normalize(&text))
    }
}

/// Trims each line and drops empty ones; extraction output is compared by
/// content, not layout.
fn normalize(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn markdown_formatting_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.md");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# Jane Doe\n\n**Senior** engineer with `docker`.").unwrap();

        let text = MarkdownExtractor.extract(&path).await.unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Senior"));
        assert!(text.contains("docker"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
    }

    #[test]
    fn normalize_drops_blank_lines_and_padding() {
        let input = "  line one  \n\n\t\nline two\n";
        assert_eq!(normalize(input), "line one\nline two");
    }
}
