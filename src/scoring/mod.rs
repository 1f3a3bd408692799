//! Candidate scoring: criterion model, pluggable backend, aggregation

pub mod aggregator;
pub mod backend;
pub mod criterion;

pub use aggregator::{CandidateResult, ScoreAggregator};
pub use backend::{KeywordBackend, ScoringBackend};
pub use criterion::{CriterionKey, CriterionScore};
