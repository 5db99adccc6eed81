//! Structured exam intake, feature derivation, and differential scoring.
//!
//! The flow is session snapshot → feature vector → {gated rule scoring,
//! urgency classification} → combined assessment. The engine itself is a
//! pure function; the service and router around it own identifiers,
//! persistence, and escalation side effects.

pub mod domain;
pub(crate) mod evaluation;
pub(crate) mod features;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Congruity, EomFindings, ExamSession, Laterality, LightReaction, PupilFindings, PupilReading,
    Reliability, SessionId, TriageFlags, VisualFieldFindings,
};
pub use evaluation::{
    DifferentialEngine, DifferentialEntry, EngineConfig, ExamAssessment, UrgencyLevel,
    UrgencyVerdict, ANISOCORIA_THRESHOLD_MM, MAX_DIFFERENTIAL_ENTRIES,
};
pub use features::{derive_features, AnisocoriaDominance, Comitance, DeficitFinding, FeatureVector};
pub use repository::{
    AlertError, EscalationPublisher, RepositoryError, SessionRecord, SessionRepository,
    SessionStatus, SessionStatusView, UrgencyAlert,
};
pub use router::exam_router;
pub use service::{ExamSessionService, SessionServiceError};
