use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::command::ScheduleCommand;
use super::gateway::ScheduleGateway;
use super::service::{ScheduleWizardService, WizardError};
use super::session::{SessionId, SessionStore};
use crate::access::Role;
use crate::export::ExportFormat;
use crate::resources::Notice;

/// Header carrying the operator's role string, set by the dashboard's auth layer.
pub const ROLE_HEADER: &str = "x-user-role";

/// Router builder exposing the scheduling wizard over HTTP.
pub fn schedule_router<S, G>(service: Arc<ScheduleWizardService<S, G>>) -> Router
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    Router::new()
        .route("/api/v1/exam-locations", get(locations_handler::<S, G>))
        .route("/api/v1/schedules", post(start_handler::<S, G>))
        .route(
            "/api/v1/schedules/:session_id",
            get(view_handler::<S, G>).delete(discard_handler::<S, G>),
        )
        .route(
            "/api/v1/schedules/:session_id/commands",
            post(command_handler::<S, G>),
        )
        .route(
            "/api/v1/schedules/:session_id/next",
            post(next_handler::<S, G>),
        )
        .route(
            "/api/v1/schedules/:session_id/previous",
            post(previous_handler::<S, G>),
        )
        .route(
            "/api/v1/schedules/:session_id/export",
            get(export_handler::<S, G>),
        )
        .route(
            "/api/v1/schedules/:session_id/submit",
            post(submit_handler::<S, G>),
        )
        .with_state(service)
}

pub(crate) async fn locations_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    match service.locations().await {
        Ok(locations) => (StatusCode::OK, Json(locations)).into_response(),
        Err(err) => error_response("load", "exam location", err),
    }
}

pub(crate) async fn start_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    match service.start() {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(err) => error_response("start", SCHEDULE, err),
    }
}

pub(crate) async fn view_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response("load", SCHEDULE, err),
    }
}

pub(crate) async fn command_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
    Path(session_id): Path<String>,
    Json(command): Json<ScheduleCommand>,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    apply_command(&service, session_id, command)
}

pub(crate) async fn next_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    apply_command(&service, session_id, ScheduleCommand::NextStep)
}

pub(crate) async fn previous_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    apply_command(&service, session_id, ScheduleCommand::PreviousStep)
}

fn apply_command<S, G>(
    service: &ScheduleWizardService<S, G>,
    session_id: String,
    command: ScheduleCommand,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    match service.apply(&SessionId(session_id), command) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response("update", SCHEDULE, err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportParams {
    #[serde(default)]
    format: Option<String>,
}

pub(crate) async fn export_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
    Path(session_id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    let format = match params.format.as_deref() {
        Some(raw) => match raw.parse::<ExportFormat>() {
            Ok(format) => format,
            Err(err) => return error_response("export", SCHEDULE, WizardError::Export(err)),
        },
        None => ExportFormat::default(),
    };

    match service.export(&SessionId(session_id), format) {
        Ok(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, document.content_type().to_string()),
                (header::CONTENT_DISPOSITION, document.content_disposition()),
            ],
            document.body,
        )
            .into_response(),
        Err(err) => error_response("export", SCHEDULE, err),
    }
}

pub(crate) async fn submit_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    let role = headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Role>().ok());
    if !role.is_some_and(Role::can_schedule_exams) {
        let payload = json!({
            "error": "only administrators and managers can confirm exam schedules",
        });
        return (StatusCode::FORBIDDEN, Json(payload)).into_response();
    }

    match service.submit(&SessionId(session_id)).await {
        Ok(receipt) => {
            let payload = json!({
                "status": "submitted",
                "receipt": receipt,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response("submit", SCHEDULE, err),
    }
}

pub(crate) async fn discard_handler<S, G>(
    State(service): State<Arc<ScheduleWizardService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    match service.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response("discard", SCHEDULE, err),
    }
}

const SCHEDULE: &str = "exam schedule";

fn error_response(action: &str, subject: &str, err: WizardError) -> Response {
    let message = match &err {
        WizardError::Gateway(client) => Notice::from_client_error(action, subject, client).message,
        _ => err.to_string(),
    };

    (err.status_code(), Json(json!({ "error": message }))).into_response()
}
