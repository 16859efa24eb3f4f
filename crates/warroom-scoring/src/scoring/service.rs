use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{GradeResult, GradeSubmission};
use super::engine::{GradeError, ScoringEngine};
use super::records::{RecordError, ScoreOverride, ScoreRecord, ScoreRecordStore};

/// Service composing the deterministic engine with the downstream record
/// store and the admin credential check. The engine stays pure; all clock
/// values come in from the caller.
pub struct GradingService<S> {
    engine: ScoringEngine,
    records: Arc<S>,
    admin_key: String,
}

impl<S> GradingService<S>
where
    S: ScoreRecordStore + 'static,
{
    pub fn new(engine: ScoringEngine, records: Arc<S>, admin_key: String) -> Self {
        Self {
            engine,
            records,
            admin_key,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Grade a submission and record the outcome for downstream surfaces.
    pub fn grade(
        &self,
        submission: &GradeSubmission,
        graded_at: DateTime<Utc>,
    ) -> Result<GradeResult, GradingServiceError> {
        let result = self.engine.grade(submission)?;

        self.records.record(ScoreRecord {
            result: result.clone(),
            recorded_at: graded_at,
            override_entry: None,
        })?;

        Ok(result)
    }

    pub fn record(&self, submission_id: &str) -> Result<Option<ScoreRecord>, GradingServiceError> {
        Ok(self.records.fetch(submission_id)?)
    }

    /// Apply a manual correction to an already-recorded score. Requires the
    /// shared admin key; never touches the engine's own computation.
    pub fn override_score(
        &self,
        admin_key: &str,
        submission_id: &str,
        new_score: f64,
        reason: &str,
        applied_at: DateTime<Utc>,
    ) -> Result<ScoreRecord, GradingServiceError> {
        if admin_key != self.admin_key {
            return Err(GradingServiceError::Unauthorized);
        }

        let entry = ScoreOverride {
            new_score,
            reason: reason.to_string(),
            applied_at,
        };

        Ok(self.records.apply_override(submission_id, entry)?)
    }
}

/// Error raised by the grading service.
#[derive(Debug, thiserror::Error)]
pub enum GradingServiceError {
    #[error(transparent)]
    Grade(#[from] GradeError),
    #[error(transparent)]
    Records(#[from] RecordError),
    #[error("invalid admin key")]
    Unauthorized,
}
