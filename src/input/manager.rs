//! Document intake for candidate batches
//!
//! Routes each file to the right extractor and turns the outcome into a
//! [`CandidateDocument`]. A file that cannot be read becomes a document
//! tagged with a failed extraction status; the batch itself never aborts
//! over one bad file.

use crate::batch::CandidateDocument;
use crate::error::{Result, ScreenerError};
use crate::input::extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::input::file_detector::FileType;
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

pub struct DocumentIntake {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl DocumentIntake {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extracts normalized text from a single file.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("using cached text for {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "file does not exist: {}",
                path.display()
            )));
        }

        let file_type = detect_file_type(path)?;
        let text = match file_type {
            FileType::Pdf => {
                info!("extracting text from PDF {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
            FileType::Unknown => {
                return Err(ScreenerError::UnsupportedFormat(format!(
                    "unsupported file type: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Prepares a batch of candidate documents. The candidate id is the
    /// original file name and must be unique within the batch; per-file
    /// extraction failures are captured on the document, not raised.
    pub async fn intake_batch(&mut self, paths: &[impl AsRef<Path>]) -> Result<Vec<CandidateDocument>> {
        let mut documents = Vec::with_capacity(paths.len());
        let mut seen = HashMap::new();

        for path in paths {
            let path = path.as_ref();
            let id = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| {
                    ScreenerError::InvalidInput(format!("not a file path: {}", path.display()))
                })?;

            if let Some(previous) = seen.insert(id.clone(), path.to_path_buf()) {
                return Err(ScreenerError::InvalidInput(format!(
                    "duplicate candidate file name '{}' ({} and {})",
                    id,
                    previous.display(),
                    path.display()
                )));
            }

            match self.extract_text(path).await {
                Ok(text) => documents.push(CandidateDocument::extracted(id, text)),
                Err(e) => {
                    warn!("extraction failed for {}: {}", path.display(), e);
                    documents.push(CandidateDocument::failed(id, e.to_string()));
                }
            }
        }

        Ok(documents)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for DocumentIntake {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_file_type(path: &Path) -> Result<FileType> {
    let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
        ScreenerError::InvalidInput(format!("file has no extension: {}", path.display()))
    })?;
    Ok(FileType::from_extension(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ExtractionStatus;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[tokio::test]
    async fn batch_intake_keeps_submission_order_and_captures_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(&dir, "jane.txt", "Java developer, 5 years");
        let unsupported = write_file(&dir, "bob.docx", "not readable here");
        let missing = dir.path().join("ghost.txt");

        let mut intake = DocumentIntake::new();
        let docs = intake
            .intake_batch(&[good, unsupported, missing])
            .await
            .unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].id, "jane.txt");
        assert_eq!(docs[0].extraction, ExtractionStatus::Ok);
        assert!(matches!(docs[1].extraction, ExtractionStatus::Failed(_)));
        assert!(matches!(docs[2].extraction, ExtractionStatus::Failed(_)));
    }

    #[tokio::test]
    async fn duplicate_file_names_are_rejected() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let first = write_file(&dir_a, "cv.txt", "one");
        let second = write_file(&dir_b, "cv.txt", "two");

        let mut intake = DocumentIntake::new();
        let result = intake.intake_batch(&[first, second]).await;
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn extraction_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "jane.txt", "Java developer");

        let mut intake = DocumentIntake::new();
        let first = intake.extract_text(&path).await.unwrap();
        assert_eq!(intake.cache_size(), 1);
        let second = intake.extract_text(&path).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(intake.cache_size(), 1);
    }
}
