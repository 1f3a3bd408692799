//! Ranking, selection and side-by-side comparison
//!
//! Ranking is a stable sort on the final score so candidates with colliding
//! scores keep their submission order. Selection is a two-slot FIFO: picking
//! a third candidate evicts the oldest pick, never the most recent one.

use crate::batch::AnalysisBatch;
use crate::error::{Result, ScreenerError};
use crate::scoring::aggregator::CandidateResult;
use crate::scoring::criterion::CriterionKey;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Up to two candidates chosen for comparison, oldest pick first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionSet {
    slots: VecDeque<String>,
}

impl SelectionSet {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, candidate_id: &str) -> bool {
        self.slots.iter().any(|id| id == candidate_id)
    }

    /// Ids in selection order, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|id| id.as_str())
    }

    fn push(&mut self, candidate_id: String) {
        if self.contains(&candidate_id) {
            return;
        }
        self.slots.push_back(candidate_id);
        if self.slots.len() > Self::CAPACITY {
            self.slots.pop_front();
        }
    }
}

/// Per-criterion paired values for the two selected candidates, rows in
/// [`CriterionKey::ALL`] order so chart axes stay put between comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub left_id: String,
    pub right_id: String,
    pub rows: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub criterion: CriterionKey,
    pub left: f32,
    pub right: f32,
}

/// Scored candidates ordered by final score, best first. The sort is stable:
/// equal scores keep submission order. Failed entries are not ranked; they
/// stay visible in the batch listing with their reason.
pub fn rank(batch: &AnalysisBatch) -> Vec<&CandidateResult> {
    let mut ranked: Vec<&CandidateResult> = batch.scored().collect();
    ranked.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Adds a candidate to the selection set, evicting the oldest pick when the
/// set is full. Selecting an already selected candidate keeps its slot.
pub fn select<'a>(batch: &'a mut AnalysisBatch, candidate_id: &str) -> Result<&'a SelectionSet> {
    match batch.entry(candidate_id) {
        None => {
            return Err(ScreenerError::InvalidInput(format!(
                "unknown candidate '{}'",
                candidate_id
            )))
        }
        Some(entry) if entry.result().is_none() => {
            return Err(ScreenerError::InvalidInput(format!(
                "candidate '{}' has no scores to compare",
                candidate_id
            )))
        }
        Some(_) => {}
    }
    batch.selection.push(candidate_id.to_string());
    Ok(&batch.selection)
}

/// Pairs the two selected candidates criterion by criterion.
pub fn compare(batch: &AnalysisBatch) -> Result<Comparison> {
    let ids: Vec<&str> = batch.selection.ids().collect();
    if ids.len() < SelectionSet::CAPACITY {
        return Err(ScreenerError::SelectionIncomplete {
            selected: ids.len(),
        });
    }

    fn resolve<'a>(batch: &'a AnalysisBatch, id: &str) -> Result<&'a CandidateResult> {
        batch.entry(id).and_then(|e| e.result()).ok_or_else(|| {
            ScreenerError::InvalidInput(format!("selected candidate '{}' has no scores", id))
        })
    }
    let left = resolve(batch, ids[0])?;
    let right = resolve(batch, ids[1])?;

    let rows = CriterionKey::ALL
        .iter()
        .map(|k| {
            let value = |result: &CandidateResult| {
                result.score_for(*k).map(|s| s.value).unwrap_or_default()
            };
            ComparisonRow {
                criterion: *k,
                left: value(left),
                right: value(right),
            }
        })
        .collect();

    Ok(Comparison {
        left_id: left.candidate_id.clone(),
        right_id: right.candidate_id.clone(),
        rows,
    })
}
