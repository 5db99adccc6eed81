use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ocular_triage::exam::{
    exam_router, DifferentialEngine, DifferentialEntry, EngineConfig, EscalationPublisher,
    ExamSession, ExamSessionService, FeatureVector, SessionRepository, UrgencyVerdict,
    ANISOCORIA_THRESHOLD_MM,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// One-shot scoring request; the caller keeps the session, we keep nothing.
#[derive(Debug, Deserialize)]
pub(crate) struct AssessRequest {
    #[serde(default)]
    pub(crate) findings: ExamSession,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessResponse {
    pub(crate) anisocoria_threshold_mm: f64,
    pub(crate) features: FeatureVector,
    pub(crate) differential: Vec<DifferentialEntry>,
    pub(crate) urgency: UrgencyVerdict,
}

pub(crate) fn with_exam_routes<R, A>(service: Arc<ExamSessionService<R, A>>) -> axum::Router
where
    R: SessionRepository + 'static,
    A: EscalationPublisher + 'static,
{
    exam_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/exam/assess",
            axum::routing::post(assess_endpoint),
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

/// Stateless scoring endpoint: echoes the engine's threshold so display
/// layers can label inputs with the same cutoff the rules gate on.
pub(crate) async fn assess_endpoint(Json(payload): Json<AssessRequest>) -> Json<AssessResponse> {
    let engine = DifferentialEngine::new(EngineConfig::default());
    let assessment = engine.assess(&payload.findings);

    Json(AssessResponse {
        anisocoria_threshold_mm: ANISOCORIA_THRESHOLD_MM,
        features: assessment.features,
        differential: assessment.differential,
        urgency: assessment.urgency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocular_triage::exam::{PupilReading, UrgencyLevel};

    fn horner_findings() -> ExamSession {
        let mut session = ExamSession::default();
        session.pupils.od_light = PupilReading::Millimeters(3.5);
        session.pupils.os_light = PupilReading::Millimeters(3.2);
        session.pupils.od_dark = PupilReading::Millimeters(5.5);
        session.pupils.os_dark = PupilReading::Millimeters(4.0);
        session.pupils.dilation_lag = true;
        session.eom.ptosis = true;
        session.triage.acute_onset = true;
        session
    }

    #[tokio::test]
    async fn assess_endpoint_reports_incomplete_pupils() {
        let request = AssessRequest {
            findings: ExamSession::default(),
        };

        let Json(body) = assess_endpoint(Json(request)).await;

        assert_eq!(body.anisocoria_threshold_mm, ANISOCORIA_THRESHOLD_MM);
        assert!(body.differential.is_empty());
        assert_eq!(body.urgency.level, UrgencyLevel::None);
        assert!(body.urgency.text.starts_with("Pupils: enter BOTH"));
    }

    #[tokio::test]
    async fn assess_endpoint_scores_complete_findings() {
        let request = AssessRequest {
            findings: horner_findings(),
        };

        let Json(body) = assess_endpoint(Json(request)).await;

        assert_eq!(body.urgency.level, UrgencyLevel::Warn);
        let top = body.differential.first().expect("entries present");
        assert_eq!(top.name, "Horner syndrome");
        assert_eq!(top.score, 9);
    }
}
