//! Error handling for the CV screener

use crate::scoring::criterion::CriterionKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Extracted candidate text is empty")]
    ExtractionEmpty,

    #[error("Candidate '{candidate}' is missing criteria: {missing:?}")]
    IncompleteCriteria {
        candidate: String,
        missing: Vec<CriterionKey>,
    },

    #[error("An analysis run is already in progress")]
    AnalysisInProgress,

    #[error("Comparison requires 2 selected candidates, {selected} selected")]
    SelectionIncomplete { selected: usize },

    #[error("Scoring backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Upload error: {0}")]
    Upload(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::Backend(err.to_string())
    }
}
