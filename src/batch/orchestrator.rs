//! Batch orchestration
//!
//! Fans one job description out over N candidate documents with bounded
//! concurrency, captures per-candidate failures as data, and returns a batch
//! whose entry order is the submission order no matter which workers finish
//! first. The orchestrator returns only when every candidate is resolved;
//! there is no streaming contract at this layer.

use crate::batch::{
    AnalysisBatch, CandidateDocument, CandidateEntry, ExtractionStatus, FailureReason,
    ScreeningOutcome,
};
use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::ranking::SelectionSet;
use crate::scoring::aggregator::ScoreAggregator;
use crate::scoring::backend::ScoringBackend;
use crate::scoring::criterion::{CriterionKey, CriterionScore};
use chrono::Utc;
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub struct BatchOrchestrator<B: ScoringBackend + 'static> {
    backend: Arc<B>,
    aggregator: Arc<ScoreAggregator>,
    max_concurrency: usize,
}

impl<B: ScoringBackend + 'static> BatchOrchestrator<B> {
    pub fn new(backend: B, aggregator: ScoreAggregator, max_concurrency: usize) -> Self {
        Self {
            backend: Arc::new(backend),
            aggregator: Arc::new(aggregator),
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn from_config(backend: B, config: &Config) -> Result<Self> {
        let aggregator = ScoreAggregator::new(config.scoring.clone())?;
        Ok(Self::new(backend, aggregator, config.batch.max_concurrency))
    }

    /// Scores every document against the job description. Always yields
    /// exactly one entry per submitted document; an empty submission yields
    /// an empty batch.
    pub async fn run(
        &self,
        job_description: &str,
        documents: Vec<CandidateDocument>,
    ) -> Result<AnalysisBatch> {
        if job_description.trim().is_empty() {
            return Err(ScreenerError::InvalidInput(
                "job description must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for doc in &documents {
            if !seen.insert(doc.id.clone()) {
                return Err(ScreenerError::InvalidInput(format!(
                    "duplicate candidate id '{}' in batch",
                    doc.id
                )));
            }
        }

        let total = documents.len();
        debug!(
            "starting batch of {} candidates, concurrency {}",
            total, self.max_concurrency
        );

        let job_description = Arc::new(job_description.to_string());
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks: JoinSet<(usize, CandidateEntry)> = JoinSet::new();

        for (index, doc) in documents.into_iter().enumerate() {
            let backend = Arc::clone(&self.backend);
            let aggregator = Arc::clone(&self.aggregator);
            let job_description = Arc::clone(&job_description);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                // The semaphore only closes when dropped, which cannot
                // happen while a task still holds a clone.
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("batch semaphore closed mid-run");
                let entry =
                    score_candidate(backend.as_ref(), &aggregator, &job_description, &doc).await;
                (index, entry)
            });
        }

        // Buffer by submission index; completion order is irrelevant.
        let mut slots: Vec<Option<CandidateEntry>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, entry) = joined
                .map_err(|e| ScreenerError::Backend(format!("candidate worker failed: {}", e)))?;
            slots[index] = Some(entry);
        }

        let entries: Vec<CandidateEntry> = slots
            .into_iter()
            .map(|slot| slot.expect("every submitted candidate resolves to an entry"))
            .collect();

        let failures = entries.iter().filter(|e| e.result().is_none()).count();
        if failures > 0 {
            warn!("batch finished with {}/{} failed candidates", failures, total);
        }

        Ok(AnalysisBatch {
            job_description: job_description.as_ref().clone(),
            backend_version: self.backend.version().to_string(),
            entries,
            selection: SelectionSet::new(),
            created_at: Utc::now(),
        })
    }
}

/// Scores all criteria of one candidate and aggregates them. Every failure
/// path collapses into a tagged entry.
async fn score_candidate<B: ScoringBackend>(
    backend: &B,
    aggregator: &ScoreAggregator,
    job_description: &str,
    doc: &CandidateDocument,
) -> CandidateEntry {
    let failed = |reason: FailureReason| CandidateEntry {
        candidate_id: doc.id.clone(),
        outcome: ScreeningOutcome::Failed(reason),
    };

    if let ExtractionStatus::Failed(message) = &doc.extraction {
        return failed(FailureReason::ExtractionFailed(message.clone()));
    }

    let mut scores: Vec<CriterionScore> = Vec::with_capacity(CriterionKey::ALL.len());
    for criterion in CriterionKey::ALL {
        match backend
            .score_criterion(&doc.text, job_description, criterion)
            .await
        {
            Ok(score) => scores.push(score),
            Err(ScreenerError::ExtractionEmpty) => {
                return failed(FailureReason::ExtractionEmpty);
            }
            Err(e) => {
                return failed(FailureReason::Backend(e.to_string()));
            }
        }
    }

    match aggregator.aggregate(&doc.id, job_description, scores) {
        Ok(result) => CandidateEntry {
            candidate_id: doc.id.clone(),
            outcome: ScreeningOutcome::Scored(result),
        },
        Err(ScreenerError::IncompleteCriteria { missing, .. }) => {
            failed(FailureReason::IncompleteCriteria(missing))
        }
        Err(e) => failed(FailureReason::Backend(e.to_string())),
    }
}
