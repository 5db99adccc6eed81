mod config;
mod rules;
mod urgency;

pub use config::{EngineConfig, ANISOCORIA_THRESHOLD_MM, MAX_DIFFERENTIAL_ENTRIES};
pub use urgency::{UrgencyLevel, UrgencyVerdict};

use serde::{Deserialize, Serialize};

use super::domain::ExamSession;
use super::features::{derive_features, FeatureVector};
use urgency::classify_urgency;

/// Stateless engine that applies the scoring table to one session snapshot.
///
/// A call owns no state and performs no I/O; callers re-invoke the full
/// computation on every session change and replace the previous result.
pub struct DifferentialEngine {
    config: EngineConfig,
}

impl DifferentialEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Derive features, gate, score, and classify in one pass.
    pub fn assess(&self, session: &ExamSession) -> ExamAssessment {
        let features = derive_features(session, &self.config);
        let pupils_complete = session.pupils.dataset_complete();

        // Pupil-driven scoring stays silent on partial data rather than
        // ranking off half a dataset. EOM and VF findings ride the same
        // gate until those modules can stand on their own.
        let differential = if pupils_complete {
            rules::score_differential(&features, &self.config)
        } else {
            Vec::new()
        };

        let urgency = classify_urgency(&features, pupils_complete);

        ExamAssessment {
            features,
            differential,
            urgency,
        }
    }
}

/// One scored candidate diagnosis with the findings that matched it, in
/// rule evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialEntry {
    pub name: String,
    pub score: i32,
    pub why: Vec<String>,
}

/// Combined engine output for a single session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamAssessment {
    pub features: FeatureVector,
    pub differential: Vec<DifferentialEntry>,
    pub urgency: UrgencyVerdict,
}
