use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ExamSession, SessionId};
use super::evaluation::{ExamAssessment, UrgencyLevel};

/// Lifecycle of a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Draft,
    Assessed,
    Escalated,
}

impl SessionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Assessed => "assessed",
            SessionStatus::Escalated => "escalated",
        }
    }
}

/// Repository record: the raw session, caller-stamped metadata, and the
/// latest assessment. The engine reads only the session inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub patient_label: String,
    pub session: ExamSession,
    pub status: SessionStatus,
    pub updated_at: DateTime<Utc>,
    pub assessment: Option<ExamAssessment>,
}

impl SessionRecord {
    pub fn banner(&self) -> String {
        match &self.assessment {
            Some(assessment) => assessment.urgency.text.clone(),
            None => "No findings assessed yet.".to_string(),
        }
    }

    pub fn status_view(&self) -> SessionStatusView {
        let top = self
            .assessment
            .as_ref()
            .and_then(|assessment| assessment.differential.first());

        SessionStatusView {
            session_id: self.session_id.clone(),
            patient_label: self.patient_label.clone(),
            status: self.status.label(),
            urgency_level: self
                .assessment
                .as_ref()
                .map(|assessment| assessment.urgency.level),
            banner: self.banner(),
            top_candidate: top.map(|entry| entry.name.clone()),
            top_score: top.map(|entry| entry.score),
            updated_at: self.updated_at,
        }
    }
}

/// Storage abstraction so the service can be exercised against in-memory
/// fakes in tests and swapped for a real store later.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    fn escalated(&self, limit: usize) -> Result<Vec<SessionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook fired when an assessment lands on a warn or danger
/// verdict (e.g., a paging or messaging adapter).
pub trait EscalationPublisher: Send + Sync {
    fn publish(&self, alert: UrgencyAlert) -> Result<(), AlertError>;
}

/// Alert payload so routes and tests can assert the integration boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyAlert {
    pub session_id: SessionId,
    pub level: UrgencyLevel,
    pub message: String,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a session's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub patient_label: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
    pub banner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_candidate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_score: Option<i32>,
    pub updated_at: DateTime<Utc>,
}
