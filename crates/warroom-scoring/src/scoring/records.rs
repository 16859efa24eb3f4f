use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::GradeResult;

/// Downstream record of a graded submission. Admin overrides land here;
/// the engine's own computation is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub result: GradeResult,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub override_entry: Option<ScoreOverride>,
}

/// Manual correction applied by a human reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOverride {
    pub new_score: f64,
    pub reason: String,
    pub applied_at: DateTime<Utc>,
}

/// Error raised by a score record store.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("no score record for submission '{0}'")]
    NotFound(String),
}

/// Persistence seam for graded results. Grading never reads this store;
/// it only feeds it.
pub trait ScoreRecordStore: Send + Sync {
    /// Record (or re-record) the grade for a submission.
    fn record(&self, record: ScoreRecord) -> Result<(), RecordError>;

    fn fetch(&self, submission_id: &str) -> Result<Option<ScoreRecord>, RecordError>;

    /// Attach a manual correction to an existing record.
    fn apply_override(
        &self,
        submission_id: &str,
        entry: ScoreOverride,
    ) -> Result<ScoreRecord, RecordError>;
}
