use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use warroom_scoring::config::DataConfig;
use warroom_scoring::error::AppError;
use warroom_scoring::scoring::{
    RecordError, ReferenceDataset, ScoreOverride, ScoreRecord, ScoreRecordStore,
};

/// Ground truth shipped with the service, used when no override path is
/// configured.
const DEFAULT_REFERENCE_DATA: &str = include_str!("../data/ezz_steel_reference.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) started_at: Instant,
}

pub(crate) fn load_reference_dataset(config: &DataConfig) -> Result<ReferenceDataset, AppError> {
    match &config.reference_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(ReferenceDataset::from_json(&raw)?)
        }
        None => Ok(ReferenceDataset::from_json(DEFAULT_REFERENCE_DATA)?),
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreRecordStore {
    records: Arc<Mutex<HashMap<String, ScoreRecord>>>,
}

impl ScoreRecordStore for InMemoryScoreRecordStore {
    fn record(&self, record: ScoreRecord) -> Result<(), RecordError> {
        let mut guard = self.records.lock().expect("record store mutex poisoned");
        guard.insert(record.result.submission_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, submission_id: &str) -> Result<Option<ScoreRecord>, RecordError> {
        let guard = self.records.lock().expect("record store mutex poisoned");
        Ok(guard.get(submission_id).cloned())
    }

    fn apply_override(
        &self,
        submission_id: &str,
        entry: ScoreOverride,
    ) -> Result<ScoreRecord, RecordError> {
        let mut guard = self.records.lock().expect("record store mutex poisoned");
        let record = guard
            .get_mut(submission_id)
            .ok_or_else(|| RecordError::NotFound(submission_id.to_string()))?;
        record.override_entry = Some(entry);
        Ok(record.clone())
    }
}
