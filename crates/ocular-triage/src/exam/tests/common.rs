use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::exam::domain::{ExamSession, Laterality, PupilReading, Reliability, SessionId};
use crate::exam::evaluation::{DifferentialEngine, EngineConfig};
use crate::exam::repository::{
    AlertError, EscalationPublisher, RepositoryError, SessionRecord, SessionRepository,
    SessionStatus, UrgencyAlert,
};
use crate::exam::service::ExamSessionService;

pub(super) fn engine() -> DifferentialEngine {
    DifferentialEngine::new(EngineConfig::default())
}

pub(super) fn mm(value: f64) -> PupilReading {
    PupilReading::Millimeters(value)
}

pub(super) fn typed(raw: &str) -> PupilReading {
    PupilReading::Text(raw.to_string())
}

pub(super) fn pupil_session(
    od_light: PupilReading,
    os_light: PupilReading,
    od_dark: PupilReading,
    os_dark: PupilReading,
) -> ExamSession {
    let mut session = ExamSession::default();
    session.pupils.od_light = od_light;
    session.pupils.os_light = os_light;
    session.pupils.od_dark = od_dark;
    session.pupils.os_dark = os_dark;
    session
}

pub(super) fn measured_session(
    od_light: f64,
    os_light: f64,
    od_dark: f64,
    os_dark: f64,
) -> ExamSession {
    pupil_session(mm(od_light), mm(os_light), mm(od_dark), mm(os_dark))
}

/// Anisocoria greater in dark plus sympathetic signs and an acute onset.
pub(super) fn horner_session() -> ExamSession {
    let mut session = measured_session(3.5, 3.2, 5.5, 4.0);
    session.pupils.dilation_lag = true;
    session.eom.ptosis = true;
    session.triage.acute_onset = true;
    session
}

/// Bitemporal field defect with good reliability and no pupil data.
pub(super) fn chiasmal_session() -> ExamSession {
    let mut session = ExamSession::default();
    session.visual_fields.bitemporal = true;
    session.visual_fields.respects_vertical_meridian = Some(true);
    session.visual_fields.laterality = Laterality::Binocular;
    session.visual_fields.reliability = Reliability::Good;
    session
}

pub(super) fn build_service() -> (
    ExamSessionService<MemoryRepository, MemoryAlerts>,
    Arc<MemoryRepository>,
    Arc<MemoryAlerts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service =
        ExamSessionService::new(repository.clone(), alerts.clone(), EngineConfig::default());
    (service, repository, alerts)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn escalated(&self, limit: usize) -> Result<Vec<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == SessionStatus::Escalated)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<UrgencyAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<UrgencyAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl EscalationPublisher for MemoryAlerts {
    fn publish(&self, alert: UrgencyAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
