use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use warroom_scoring::scoring::{grading_router, GradingService, ScoreRecordStore};

pub(crate) fn with_service_routes<S>(service: Arc<GradingService<S>>) -> axum::Router
where
    S: ScoreRecordStore + 'static,
{
    grading_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) version: &'static str,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) uptime_seconds: f64,
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
    })
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{load_reference_dataset, InMemoryScoreRecordStore};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use warroom_scoring::config::DataConfig;
    use warroom_scoring::scoring::{ScoringConfig, ScoringEngine, TemplateCatalog};

    fn service() -> Arc<GradingService<InMemoryScoreRecordStore>> {
        let reference =
            load_reference_dataset(&DataConfig::default()).expect("embedded dataset loads");
        let engine = ScoringEngine::new(
            TemplateCatalog::standard(),
            ScoringConfig::default(),
            reference,
        );
        Arc::new(GradingService::new(
            engine,
            Arc::new(InMemoryScoreRecordStore::default()),
            "secret-key".to_string(),
        ))
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&body).expect("body is JSON")
    }

    fn grade_request(payload: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/grade")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    fn sample_submission(battle_no: u8) -> serde_json::Value {
        json!({
            "team": "Alpha",
            "battle_no": battle_no,
            "submission_id": "sub-route-001",
            "submitted_at": "2024-06-01T10:00:00Z",
            "time_taken_seconds": 300,
            "total_time_seconds": 3600,
            "company_reference": { "company_id": "ezz-steel", "use_reference_as_primary": true },
            "fields": {
                "founders": "Ezz Steel Company S.A.E.",
                "key_executives": "Hassan Ahmed Nouh",
                "market_share": "60%",
                "geographic_footprint": "Egypt"
            }
        })
    }

    #[tokio::test]
    async fn grade_endpoint_returns_the_full_result() {
        let app = with_service_routes(service());
        let response = app
            .oneshot(grade_request(sample_submission(1)))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["raw_ai_percent"], 85.0);
        assert_eq!(body["battle_points_out_of_20"], 20.0);
        assert_eq!(body["escalated_for_human_review"], false);
        assert_eq!(body["breakdown"]["source_credibility"], 1.0);
    }

    #[tokio::test]
    async fn unknown_battle_is_a_bad_request() {
        let app = with_service_routes(service());
        let response = app
            .oneshot(grade_request(sample_submission(9)))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], "unknown battle number: 9");
    }

    #[tokio::test]
    async fn templates_endpoint_lists_all_battles() {
        let app = with_service_routes(service());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/templates")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        let templates = body["templates"].as_object().expect("templates object");
        assert_eq!(templates.len(), 5);
        assert_eq!(templates["1"]["name"], "Leadership Recon");
        assert_eq!(templates["1"]["field_weights"]["market_share"], 20.0);
    }

    #[tokio::test]
    async fn admin_override_is_gated_by_the_shared_key() {
        let app = with_service_routes(service());

        // Grade first so a record exists.
        let graded = app
            .clone()
            .oneshot(grade_request(sample_submission(1)))
            .await
            .expect("router responds");
        assert_eq!(graded.status(), StatusCode::OK);

        let override_body = json!({
            "submission_id": "sub-route-001",
            "new_score": 14.5,
            "reason": "manual recount"
        });

        let denied = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/admin/override")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-admin-key", "wrong-key")
                    .body(Body::from(override_body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let accepted = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/admin/override")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-admin-key", "secret-key")
                    .body(Body::from(override_body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(accepted.status(), StatusCode::OK);
        let body = response_json(accepted).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["record"]["override_entry"]["new_score"], 14.5);
    }

    #[tokio::test]
    async fn health_reports_version_and_uptime() {
        use metrics_exporter_prometheus::PrometheusBuilder;
        use std::sync::atomic::AtomicBool;
        use std::time::Instant;

        let handle = PrometheusBuilder::new()
            .build_recorder()
            .handle();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(handle),
            started_at: Instant::now(),
        };

        let Json(body) = healthcheck(Extension(state)).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert!(body.uptime_seconds >= 0.0);
    }
}
