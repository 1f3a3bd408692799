//! Session-scoped screening state
//!
//! One operator, one session, one explicit state machine:
//! `Idle -> Analyzing -> Done`. The session is the single owner of the
//! current batch and its selection set; a conflicting run request is
//! rejected rather than silently cancelling the one in flight, so partial
//! results are never attributed to the wrong batch.

use crate::batch::{AnalysisBatch, BatchOrchestrator, CandidateDocument};
use crate::error::{Result, ScreenerError};
use crate::external::auth::CurrentUser;
use crate::ranking::{self, Comparison, SelectionSet};
use crate::scoring::aggregator::CandidateResult;
use crate::scoring::backend::ScoringBackend;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Analyzing,
    Done,
}

pub struct ScreeningSession {
    state: SessionState,
    batch: Option<AnalysisBatch>,
    user: Option<CurrentUser>,
}

impl ScreeningSession {
    /// Fresh session, typically created at sign-in.
    pub fn new(user: Option<CurrentUser>) -> Self {
        Self {
            state: SessionState::Idle,
            batch: None,
            user,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn sign_in(&mut self, user: CurrentUser) {
        info!("session user: {}", user.display_name);
        self.user = Some(user);
    }

    /// Drops all session state, batch and selection included.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.batch = None;
        self.state = SessionState::Idle;
    }

    /// The completed batch, if the session is in `Done`.
    pub fn batch(&self) -> Option<&AnalysisBatch> {
        match self.state {
            SessionState::Done => self.batch.as_ref(),
            _ => None,
        }
    }

    /// Claims the session for a new run. A prior completed batch and its
    /// selection are discarded here, not on completion.
    pub fn begin_analysis(&mut self) -> Result<()> {
        if self.state == SessionState::Analyzing {
            return Err(ScreenerError::AnalysisInProgress);
        }
        self.batch = None;
        self.state = SessionState::Analyzing;
        Ok(())
    }

    /// Installs the finished batch and moves to `Done`.
    pub fn complete_analysis(&mut self, batch: AnalysisBatch) -> Result<()> {
        if self.state != SessionState::Analyzing {
            return Err(ScreenerError::InvalidInput(
                "no analysis in progress to complete".to_string(),
            ));
        }
        info!(
            "analysis complete: {} candidates against backend {}",
            batch.len(),
            batch.backend_version
        );
        self.batch = Some(batch);
        self.state = SessionState::Done;
        Ok(())
    }

    /// Aborts the in-flight run and returns to `Idle`, discarding any
    /// partial state.
    pub fn cancel_analysis(&mut self) -> Result<()> {
        if self.state != SessionState::Analyzing {
            return Err(ScreenerError::InvalidInput(
                "no analysis in progress to cancel".to_string(),
            ));
        }
        self.batch = None;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Runs a full analysis through the orchestrator, driving the state
    /// machine around it.
    pub async fn analyze<B: ScoringBackend + 'static>(
        &mut self,
        orchestrator: &BatchOrchestrator<B>,
        job_description: &str,
        documents: Vec<CandidateDocument>,
    ) -> Result<&AnalysisBatch> {
        self.begin_analysis()?;
        match orchestrator.run(job_description, documents).await {
            Ok(batch) => {
                self.complete_analysis(batch)?;
                Ok(self.batch.as_ref().expect("batch installed on completion"))
            }
            Err(e) => {
                self.cancel_analysis()?;
                Err(e)
            }
        }
    }

    /// Ranked view of the completed batch.
    pub fn ranked(&self) -> Result<Vec<&CandidateResult>> {
        Ok(ranking::rank(self.done_batch()?))
    }

    /// Adds a candidate to the comparison selection (FIFO at capacity 2).
    pub fn select(&mut self, candidate_id: &str) -> Result<&SelectionSet> {
        if self.state != SessionState::Done {
            return Err(ScreenerError::InvalidInput(
                "selection requires a completed analysis".to_string(),
            ));
        }
        let batch = self
            .batch
            .as_mut()
            .expect("Done state always holds a batch");
        ranking::select(batch, candidate_id)
    }

    /// Side-by-side comparison of the two selected candidates.
    pub fn compare(&self) -> Result<Comparison> {
        ranking::compare(self.done_batch()?)
    }

    fn done_batch(&self) -> Result<&AnalysisBatch> {
        self.batch().ok_or_else(|| {
            ScreenerError::InvalidInput("no completed analysis in this session".to_string())
        })
    }
}

impl Default for ScreeningSession {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{CandidateEntry, ScreeningOutcome};
    use crate::scoring::criterion::{CriterionKey, CriterionScore};
    use chrono::Utc;

    fn batch_of(ids: &[&str]) -> AnalysisBatch {
        let entries = ids
            .iter()
            .map(|id| CandidateEntry {
                candidate_id: id.to_string(),
                outcome: ScreeningOutcome::Scored(CandidateResult {
                    candidate_id: id.to_string(),
                    scores: CriterionKey::ALL
                        .iter()
                        .map(|k| {
                            let value = if k.is_penalty() { 0.0 } else { 5.0 };
                            CriterionScore::new(*k, value, "evidence".to_string()).unwrap()
                        })
                        .collect(),
                    final_score: 50.0,
                    critical_analysis: "summary".to_string(),
                    scored_at: Utc::now(),
                }),
            })
            .collect();
        AnalysisBatch {
            job_description: "role".to_string(),
            backend_version: "test/1".to_string(),
            entries,
            selection: SelectionSet::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn conflicting_run_is_rejected_and_leaves_state_alone() {
        let mut session = ScreeningSession::default();
        session.begin_analysis().unwrap();
        assert!(matches!(
            session.begin_analysis(),
            Err(ScreenerError::AnalysisInProgress)
        ));
        assert_eq!(session.state(), SessionState::Analyzing);
        // The in-flight run can still complete normally
        session.complete_analysis(batch_of(&["a.pdf"])).unwrap();
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.batch().unwrap().len(), 1);
    }

    #[test]
    fn cancel_returns_to_idle_and_discards() {
        let mut session = ScreeningSession::default();
        session.begin_analysis().unwrap();
        session.cancel_analysis().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.batch().is_none());
        assert!(session.cancel_analysis().is_err());
    }

    #[test]
    fn new_run_discards_previous_batch_and_selection() {
        let mut session = ScreeningSession::default();
        session.begin_analysis().unwrap();
        session.complete_analysis(batch_of(&["a.pdf", "b.pdf"])).unwrap();
        session.select("a.pdf").unwrap();
        session.select("b.pdf").unwrap();

        session.begin_analysis().unwrap();
        session.complete_analysis(batch_of(&["c.pdf"])).unwrap();
        let batch = session.batch().unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch.selection.is_empty());
    }

    #[test]
    fn selection_and_compare_require_done_state() {
        let mut session = ScreeningSession::default();
        assert!(session.select("a.pdf").is_err());
        assert!(session.compare().is_err());

        session.begin_analysis().unwrap();
        assert!(session.select("a.pdf").is_err());

        session.complete_analysis(batch_of(&["a.pdf", "b.pdf"])).unwrap();
        session.select("a.pdf").unwrap();
        assert!(matches!(
            session.compare(),
            Err(ScreenerError::SelectionIncomplete { selected: 1 })
        ));
        session.select("b.pdf").unwrap();
        assert!(session.compare().is_ok());
    }

    #[test]
    fn sign_out_resets_everything() {
        let mut session = ScreeningSession::default();
        session.sign_in(CurrentUser::new("u1", "Op", crate::external::auth::Role::Ops));
        session.begin_analysis().unwrap();
        session.complete_analysis(batch_of(&["a.pdf"])).unwrap();
        session.sign_out();
        assert!(session.current_user().is_none());
        assert!(session.batch().is_none());
        assert_eq!(session.state(), SessionState::Idle);
    }
}
