//! Batch data model: candidate documents going in, tagged entries coming out

pub mod orchestrator;

pub use orchestrator::BatchOrchestrator;

use crate::ranking::SelectionSet;
use crate::scoring::aggregator::CandidateResult;
use crate::scoring::criterion::CriterionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An uploaded candidate file after text extraction. The id is the original
/// file name and must be unique within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: String,
    pub text: String,
    pub extraction: ExtractionStatus,
}

impl CandidateDocument {
    pub fn extracted(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            extraction: ExtractionStatus::Ok,
        }
    }

    pub fn failed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            extraction: ExtractionStatus::Failed(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtractionStatus {
    Ok,
    Failed(String),
}

/// Why a candidate has no score. Captured as data so one bad file never
/// aborts the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FailureReason {
    ExtractionFailed(String),
    ExtractionEmpty,
    IncompleteCriteria(Vec<CriterionKey>),
    Backend(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ExtractionFailed(msg) => write!(f, "extraction failed: {}", msg),
            FailureReason::ExtractionEmpty => write!(f, "extracted text was empty"),
            FailureReason::IncompleteCriteria(missing) => {
                let names: Vec<String> = missing.iter().map(|k| k.to_string()).collect();
                write!(f, "missing criteria: {}", names.join(", "))
            }
            FailureReason::Backend(msg) => write!(f, "scoring backend failed: {}", msg),
        }
    }
}

/// One entry per submitted document, scored or failed, never dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub candidate_id: String,
    pub outcome: ScreeningOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScreeningOutcome {
    Scored(CandidateResult),
    Failed(FailureReason),
}

impl CandidateEntry {
    pub fn result(&self) -> Option<&CandidateResult> {
        match &self.outcome {
            ScreeningOutcome::Scored(result) => Some(result),
            ScreeningOutcome::Failed(_) => None,
        }
    }
}

/// One analysis run: every submitted candidate in submission order, the
/// posting they were scored against, and the operator's selection set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisBatch {
    pub job_description: String,
    pub backend_version: String,
    pub entries: Vec<CandidateEntry>,
    pub selection: SelectionSet,
    pub created_at: DateTime<Utc>,
}

impl AnalysisBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, candidate_id: &str) -> Option<&CandidateEntry> {
        self.entries.iter().find(|e| e.candidate_id == candidate_id)
    }

    /// Scored results in submission order.
    pub fn scored(&self) -> impl Iterator<Item = &CandidateResult> {
        self.entries.iter().filter_map(|e| e.result())
    }
}
