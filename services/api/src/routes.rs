use crate::infra::AppState;
use crate::preview::{preview, SchedulePreviewRequest, SchedulePreviewResponse};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use enrollment_admin::error::AppError;
use enrollment_admin::workflows::scheduling::{
    schedule_router, ScheduleGateway, ScheduleWizardService, SessionStore,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_schedule_routes<S, G>(service: Arc<ScheduleWizardService<S, G>>) -> axum::Router
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    schedule_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/schedule-preview",
            axum::routing::post(schedule_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
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

/// Resolves a complete selection in one call without opening a session.
pub(crate) async fn schedule_preview_endpoint(
    Json(payload): Json<SchedulePreviewRequest>,
) -> Result<Json<SchedulePreviewResponse>, AppError> {
    Ok(Json(preview(&payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::NaiveDate;
    use enrollment_admin::config::UpstreamConfig;
    use enrollment_admin::resources::HttpTransport;
    use enrollment_admin::workflows::scheduling::{
        HourOfDay, HttpScheduleGateway, InMemorySessionStore, LocationId,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::collections::BTreeMap;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date")
    }

    fn hour(raw: &str) -> HourOfDay {
        raw.parse().expect("valid hour")
    }

    fn app(ready: bool) -> axum::Router {
        let upstream = UpstreamConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            token: None,
            timeout: Duration::from_secs(1),
            page_size: 10,
        };
        let transport = Arc::new(HttpTransport::new(&upstream).expect("client builds"));
        let gateway = Arc::new(HttpScheduleGateway::new(transport));
        let store = Arc::new(InMemorySessionStore::default());
        let service = Arc::new(ScheduleWizardService::new(store, gateway));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_schedule_routes(service).layer(Extension(state))
    }

    #[tokio::test]
    async fn schedule_preview_endpoint_resolves_overrides() {
        let mut custom_hours = BTreeMap::new();
        custom_hours.insert(day(15), vec!["13:30".to_string()]);
        let request = SchedulePreviewRequest {
            local_id: Some(LocationId::new("escola-central")),
            dates: vec![day(14), day(15)],
            default_hours: vec![hour("08:00")],
            custom_hours,
        };

        let Json(body) = schedule_preview_endpoint(Json(request))
            .await
            .expect("preview builds");

        assert_eq!(body.slot_count, 2);
        assert_eq!(body.submission.dates[0].hours, vec![hour("08:00")]);
        assert_eq!(body.submission.dates[1].hours, vec![hour("13:30")]);
        assert!(body.state.can_proceed);
    }

    #[tokio::test]
    async fn schedule_preview_without_location_is_unprocessable() {
        let payload = json!({
            "dates": ["2026-03-14"],
            "default_hours": ["08:00"],
        });
        let response = app(true)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/schedule-preview")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn schedule_routes_are_mounted() {
        let response = app(true)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/schedules")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
