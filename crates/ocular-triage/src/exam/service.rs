use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{ExamSession, SessionId};
use super::evaluation::{DifferentialEngine, EngineConfig, ExamAssessment};
use super::repository::{
    AlertError, EscalationPublisher, RepositoryError, SessionRecord, SessionRepository,
    SessionStatus, UrgencyAlert,
};

/// Service composing the repository, escalation hook, and scoring engine.
pub struct ExamSessionService<R, A> {
    repository: Arc<R>,
    alerts: Arc<A>,
    engine: Arc<DifferentialEngine>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<R, A> ExamSessionService<R, A>
where
    R: SessionRepository + 'static,
    A: EscalationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, alerts: Arc<A>, config: EngineConfig) -> Self {
        Self {
            repository,
            alerts,
            engine: Arc::new(DifferentialEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &DifferentialEngine {
        &self.engine
    }

    /// Open a new session, returning the repository-backed record.
    pub fn open(
        &self,
        patient_label: String,
        session: ExamSession,
    ) -> Result<SessionRecord, SessionServiceError> {
        let record = SessionRecord {
            session_id: next_session_id(),
            patient_label,
            session,
            status: SessionStatus::Draft,
            updated_at: Utc::now(),
            assessment: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Replace the stored findings and re-run the full computation. Each
    /// result fully replaces the previous one; there is no merging.
    pub fn record_findings(
        &self,
        session_id: &SessionId,
        session: ExamSession,
    ) -> Result<ExamAssessment, SessionServiceError> {
        let mut record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;

        record.session = session;
        self.reassess(record)
    }

    /// Re-run the computation on the stored snapshot and persist the result.
    pub fn assess(&self, session_id: &SessionId) -> Result<ExamAssessment, SessionServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;

        self.reassess(record)
    }

    /// Restore the blank session, dropping findings and any assessment.
    pub fn reset(&self, session_id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        let mut record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;

        record.session = ExamSession::default();
        record.status = SessionStatus::Draft;
        record.updated_at = Utc::now();
        record.assessment = None;

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Fetch a session record for API responses.
    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn reassess(&self, mut record: SessionRecord) -> Result<ExamAssessment, SessionServiceError> {
        let assessment = self.engine.assess(&record.session);

        record.status = if assessment.urgency.is_escalation() {
            SessionStatus::Escalated
        } else {
            SessionStatus::Assessed
        };
        record.updated_at = Utc::now();
        record.assessment = Some(assessment.clone());

        let session_id = record.session_id.clone();
        self.repository.update(record)?;

        if assessment.urgency.is_escalation() {
            self.alerts.publish(UrgencyAlert {
                session_id,
                level: assessment.urgency.level,
                message: assessment.urgency.text.clone(),
            })?;
        }

        Ok(assessment)
    }
}

/// Error raised by the session service.
#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Alert(#[from] AlertError),
}
