//! Score aggregation
//!
//! Combines one candidate's per-criterion scores into a single 0-100 final
//! score. The formula is the auditable contract the ranking order and the
//! threshold styling downstream both depend on:
//!
//! `base    = weighted average of positive criteria, each value/10*100`
//! `penalty = weaknesses.value / penalty_scale * 100` (already negative)
//! `final   = clamp(base + penalty, 0, 100)`, rounded to 2 decimals
//!
//! Weights and penalty scale come from [`ScoringConfig`]; the shape of the
//! formula does not change. A candidate missing any criterion fails with
//! `IncompleteCriteria` instead of being averaged over fewer inputs.

use crate::config::ScoringConfig;
use crate::error::{Result, ScreenerError};
use crate::scoring::criterion::{CriterionKey, CriterionScore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fully scored candidate. Write-once: built here, read everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub candidate_id: String,
    /// One score per criterion, in [`CriterionKey::ALL`] order.
    pub scores: Vec<CriterionScore>,
    pub final_score: f32,
    pub critical_analysis: String,
    pub scored_at: DateTime<Utc>,
}

impl CandidateResult {
    pub fn score_for(&self, criterion: CriterionKey) -> Option<&CriterionScore> {
        self.scores.iter().find(|s| s.criterion == criterion)
    }
}

pub struct ScoreAggregator {
    policy: ScoringConfig,
}

impl ScoreAggregator {
    pub fn new(policy: ScoringConfig) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Builds the final [`CandidateResult`] from a complete criterion set.
    pub fn aggregate(
        &self,
        candidate_id: &str,
        job_description: &str,
        scores: Vec<CriterionScore>,
    ) -> Result<CandidateResult> {
        let mut by_key: HashMap<CriterionKey, CriterionScore> = HashMap::new();
        for score in scores {
            if by_key.insert(score.criterion, score).is_some() {
                return Err(ScreenerError::InvalidInput(format!(
                    "duplicate criterion score for candidate '{}'",
                    candidate_id
                )));
            }
        }

        let missing: Vec<CriterionKey> = CriterionKey::ALL
            .iter()
            .filter(|k| !by_key.contains_key(k))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ScreenerError::IncompleteCriteria {
                candidate: candidate_id.to_string(),
                missing,
            });
        }

        let weight_total: f32 = CriterionKey::POSITIVE
            .iter()
            .map(|k| self.policy.weight_for(*k))
            .sum();
        let base: f32 = CriterionKey::POSITIVE
            .iter()
            .map(|k| self.policy.weight_for(*k) * (by_key[k].value / 10.0 * 100.0))
            .sum::<f32>()
            / weight_total;

        let penalty = by_key[&CriterionKey::Weaknesses].value / self.policy.penalty_scale * 100.0;
        let final_score = round2((base + penalty).clamp(0.0, 100.0));

        let critical_analysis = self.critical_analysis(job_description, &by_key);

        let ordered: Vec<CriterionScore> = CriterionKey::ALL
            .iter()
            .map(|k| by_key[k].clone())
            .collect();

        Ok(CandidateResult {
            candidate_id: candidate_id.to_string(),
            scores: ordered,
            final_score,
            critical_analysis,
            scored_at: Utc::now(),
        })
    }

    /// Deterministic summary: the posting's opening plus the strongest
    /// criterion's justification. Ties resolve in criterion order.
    fn critical_analysis(
        &self,
        job_description: &str,
        by_key: &HashMap<CriterionKey, CriterionScore>,
    ) -> String {
        let preview: String = job_description
            .chars()
            .take(self.policy.summary_preview_chars)
            .collect();
        let preview = preview.trim();

        let best = CriterionKey::POSITIVE
            .iter()
            .map(|k| &by_key[k])
            .max_by(|a, b| {
                a.value
                    .partial_cmp(&b.value)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("positive criteria are never empty");

        format!(
            "Role: {}. Strongest dimension is {} ({:.1}/10): {}",
            preview, best.criterion, best.value, best.justification
        )
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn score(criterion: CriterionKey, value: f32) -> CriterionScore {
        CriterionScore::new(criterion, value, format!("evidence for {}", criterion)).unwrap()
    }

    fn full_set(positive: [f32; 5], weaknesses: f32) -> Vec<CriterionScore> {
        let mut scores: Vec<CriterionScore> = CriterionKey::POSITIVE
            .iter()
            .zip(positive)
            .map(|(k, v)| score(*k, v))
            .collect();
        scores.push(score(CriterionKey::Weaknesses, weaknesses));
        scores
    }

    fn aggregator() -> ScoreAggregator {
        ScoreAggregator::new(Config::default().scoring).unwrap()
    }

    #[test]
    fn documented_example_holds() {
        // positive [8,7,6,9,7] -> normalized average 74; weaknesses -1 ->
        // penalty -33.33; final 40.67
        let result = aggregator()
            .aggregate("cv.pdf", "Senior Java role", full_set([8.0, 7.0, 6.0, 9.0, 7.0], -1.0))
            .unwrap();
        assert!((result.final_score - 40.67).abs() < 0.01, "{}", result.final_score);
    }

    #[test]
    fn final_score_clamps_at_zero() {
        let result = aggregator()
            .aggregate("cv.pdf", "role", full_set([1.0, 0.0, 0.0, 0.0, 0.0], -3.0))
            .unwrap();
        assert_eq!(result.final_score, 0.0);
    }

    #[test]
    fn perfect_candidate_caps_at_one_hundred() {
        let result = aggregator()
            .aggregate("cv.pdf", "role", full_set([10.0; 5], 0.0))
            .unwrap();
        assert_eq!(result.final_score, 100.0);
    }

    #[test]
    fn missing_criterion_fails_instead_of_averaging() {
        let mut scores = full_set([8.0, 7.0, 6.0, 9.0, 7.0], -1.0);
        scores.retain(|s| s.criterion != CriterionKey::Education);
        let err = aggregator()
            .aggregate("cv.pdf", "role", scores)
            .unwrap_err();
        match err {
            ScreenerError::IncompleteCriteria { candidate, missing } => {
                assert_eq!(candidate, "cv.pdf");
                assert_eq!(missing, vec![CriterionKey::Education]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn duplicate_criterion_is_rejected() {
        let mut scores = full_set([8.0, 7.0, 6.0, 9.0, 7.0], -1.0);
        scores.push(score(CriterionKey::Skills, 5.0));
        assert!(aggregator().aggregate("cv.pdf", "role", scores).is_err());
    }

    #[test]
    fn summary_quotes_posting_and_best_criterion() {
        let result = aggregator()
            .aggregate(
                "cv.pdf",
                "Senior Java role with AWS",
                full_set([8.0, 7.0, 6.0, 9.0, 7.0], -1.0),
            )
            .unwrap();
        assert!(result.critical_analysis.contains("Senior Java role with AWS"));
        // languages (9.0) is the strongest dimension
        assert!(result.critical_analysis.contains("languages"));
    }

    #[test]
    fn scores_are_stored_in_fixed_order() {
        let mut scores = full_set([8.0, 7.0, 6.0, 9.0, 7.0], -1.0);
        scores.reverse();
        let result = aggregator().aggregate("cv.pdf", "role", scores).unwrap();
        let keys: Vec<CriterionKey> = result.scores.iter().map(|s| s.criterion).collect();
        assert_eq!(keys, CriterionKey::ALL);
    }
}
