use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ExamSession, SessionId};
use super::repository::{EscalationPublisher, RepositoryError, SessionRepository};
use super::service::{ExamSessionService, SessionServiceError};

/// Router builder exposing HTTP endpoints for session intake and scoring.
pub fn exam_router<R, A>(service: Arc<ExamSessionService<R, A>>) -> Router
where
    R: SessionRepository + 'static,
    A: EscalationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/exam/sessions", post(open_handler::<R, A>))
        .route(
            "/api/v1/exam/sessions/:session_id",
            get(status_handler::<R, A>),
        )
        .route(
            "/api/v1/exam/sessions/:session_id/findings",
            put(findings_handler::<R, A>),
        )
        .route(
            "/api/v1/exam/sessions/:session_id/assess",
            post(assess_handler::<R, A>),
        )
        .route(
            "/api/v1/exam/sessions/:session_id/reset",
            post(reset_handler::<R, A>),
        )
        .with_state(service)
}

fn default_patient_label() -> String {
    "Untitled".to_string()
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenSessionRequest {
    #[serde(default = "default_patient_label")]
    pub(crate) patient_label: String,
    #[serde(default)]
    pub(crate) findings: ExamSession,
}

pub(crate) async fn open_handler<R, A>(
    State(service): State<Arc<ExamSessionService<R, A>>>,
    axum::Json(request): axum::Json<OpenSessionRequest>,
) -> Response
where
    R: SessionRepository + 'static,
    A: EscalationPublisher + 'static,
{
    match service.open(request.patient_label, request.findings) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(SessionServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "session already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn findings_handler<R, A>(
    State(service): State<Arc<ExamSessionService<R, A>>>,
    Path(session_id): Path<String>,
    axum::Json(findings): axum::Json<ExamSession>,
) -> Response
where
    R: SessionRepository + 'static,
    A: EscalationPublisher + 'static,
{
    let id = SessionId(session_id);
    match service.record_findings(&id, findings) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(SessionServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn assess_handler<R, A>(
    State(service): State<Arc<ExamSessionService<R, A>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    A: EscalationPublisher + 'static,
{
    let id = SessionId(session_id);
    match service.assess(&id) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(SessionServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn reset_handler<R, A>(
    State(service): State<Arc<ExamSessionService<R, A>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    A: EscalationPublisher + 'static,
{
    let id = SessionId(session_id);
    match service.reset(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(SessionServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<ExamSessionService<R, A>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    A: EscalationPublisher + 'static,
{
    let id = SessionId(session_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(SessionServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

fn not_found(id: &SessionId) -> Response {
    let payload = json!({
        "session_id": id.0,
        "error": "session not found",
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn internal_error(error: SessionServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
