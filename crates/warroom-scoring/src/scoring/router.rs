use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::next_correlation_id;

use super::domain::GradeSubmission;
use super::engine::GradeError;
use super::records::{RecordError, ScoreRecordStore};
use super::service::{GradingService, GradingServiceError};
use super::template::TemplateView;

/// Router builder exposing the grading and read-only inspection endpoints.
pub fn grading_router<S>(service: Arc<GradingService<S>>) -> Router
where
    S: ScoreRecordStore + 'static,
{
    Router::new()
        .route("/api/v1/grade", post(grade_handler::<S>))
        .route("/api/v1/templates", get(templates_handler::<S>))
        .route("/api/v1/reference", get(reference_handler::<S>))
        .route("/api/v1/config", get(config_handler::<S>))
        .route(
            "/api/v1/records/:submission_id",
            get(record_handler::<S>),
        )
        .route("/api/v1/admin/override", post(override_handler::<S>))
        .with_state(service)
}

pub(crate) async fn grade_handler<S>(
    State(service): State<Arc<GradingService<S>>>,
    axum::Json(submission): axum::Json<GradeSubmission>,
) -> Response
where
    S: ScoreRecordStore + 'static,
{
    match service.grade(&submission, Utc::now()) {
        Ok(result) => {
            info!(
                submission_id = %result.submission_id,
                team = result.team.label(),
                battle_no = result.battle_no,
                raw_ai_percent = result.raw_ai_percent,
                battle_points = result.battle_points_out_of_20,
                confidence = result.confidence,
                escalated = result.escalated_for_human_review,
                "submission graded"
            );
            (StatusCode::OK, axum::Json(result)).into_response()
        }
        Err(GradingServiceError::Grade(error @ GradeError::UnknownBattle(_))) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            // A fault here must not come back looking like a plausible score.
            let correlation_id = next_correlation_id();
            error!(
                submission_id = %submission.submission_id,
                team = submission.team.label(),
                battle_no = submission.battle_no,
                %correlation_id,
                error = %other,
                "internal fault while grading"
            );
            let payload = json!({
                "error": "internal error while grading",
                "correlation_id": correlation_id,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn templates_handler<S>(
    State(service): State<Arc<GradingService<S>>>,
) -> axum::Json<serde_json::Value>
where
    S: ScoreRecordStore + 'static,
{
    let templates: BTreeMap<String, TemplateView> = service
        .engine()
        .templates()
        .iter()
        .map(|(battle_no, template)| (battle_no.to_string(), template.view()))
        .collect();

    axum::Json(json!({ "templates": templates }))
}

pub(crate) async fn reference_handler<S>(
    State(service): State<Arc<GradingService<S>>>,
) -> axum::Json<serde_json::Value>
where
    S: ScoreRecordStore + 'static,
{
    axum::Json(service.engine().reference().as_value().clone())
}

pub(crate) async fn config_handler<S>(
    State(service): State<Arc<GradingService<S>>>,
) -> Response
where
    S: ScoreRecordStore + 'static,
{
    axum::Json(service.engine().config()).into_response()
}

pub(crate) async fn record_handler<S>(
    State(service): State<Arc<GradingService<S>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    S: ScoreRecordStore + 'static,
{
    match service.record(&submission_id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("no score record for submission '{submission_id}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverrideRequest {
    pub(crate) submission_id: String,
    pub(crate) new_score: f64,
    pub(crate) reason: String,
}

pub(crate) async fn override_handler<S>(
    State(service): State<Arc<GradingService<S>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<OverrideRequest>,
) -> Response
where
    S: ScoreRecordStore + 'static,
{
    let admin_key = headers
        .get("x-admin-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match service.override_score(
        admin_key,
        &request.submission_id,
        request.new_score,
        &request.reason,
        Utc::now(),
    ) {
        Ok(record) => {
            info!(
                submission_id = %request.submission_id,
                new_score = request.new_score,
                reason = %request.reason,
                "score override recorded"
            );
            let payload = json!({
                "status": "success",
                "message": "score override recorded",
                "record": record,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(GradingServiceError::Unauthorized) => {
            let payload = json!({ "error": "invalid admin key" });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        Err(GradingServiceError::Records(RecordError::NotFound(submission_id))) => {
            let payload = json!({
                "error": format!("no score record for submission '{submission_id}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
