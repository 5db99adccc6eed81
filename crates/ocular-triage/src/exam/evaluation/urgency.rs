use serde::{Deserialize, Serialize};

use crate::exam::domain::Reliability;
use crate::exam::features::{AnisocoriaDominance, FeatureVector};

/// Severity of the single triage banner shown alongside the differential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    None,
    Info,
    Warn,
    Danger,
}

impl UrgencyLevel {
    pub const fn label(self) -> &'static str {
        match self {
            UrgencyLevel::None => "none",
            UrgencyLevel::Info => "info",
            UrgencyLevel::Warn => "warn",
            UrgencyLevel::Danger => "danger",
        }
    }
}

/// Exactly one verdict per computation, never a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyVerdict {
    pub level: UrgencyLevel,
    pub text: String,
}

impl UrgencyVerdict {
    fn new(level: UrgencyLevel, text: &str) -> Self {
        Self {
            level,
            text: text.to_string(),
        }
    }

    /// Whether the verdict should page somebody.
    pub fn is_escalation(&self) -> bool {
        matches!(self.level, UrgencyLevel::Warn | UrgencyLevel::Danger)
    }
}

const NO_FINDINGS_TEXT: &str = "Enter findings to build a live differential.";
const PUPILS_INCOMPLETE_TEXT: &str =
    "Pupils: enter BOTH light and dark measurements to generate pupil-based differentials.";
const LARGE_PATTERN_DANGER_TEXT: &str =
    "High concern: large pupil pattern with acute/pain/neuro + ptosis/diplopia.";
const SMALL_PATTERN_WARN_TEXT: &str =
    "Elevated concern: small pupil pattern with acute/pain/neuro + supportive sympathetic signs.";
const VF_CHIASMAL_TEXT: &str = "VF pattern flagged: bitemporal/vertical-meridian patterns raise \
     chiasmal considerations (confirm reliability and pattern).";
const SYMPTOMS_TEXT: &str =
    "Acute/pain/neuro symptoms selected. Use discriminators across modules to tighten localization.";

/// Pick the one banner for this snapshot.
///
/// The completeness fallback is applied first and the alert chain runs
/// after it, so a called pattern or flagged field can outrank the
/// missing-data banner. That ordering is observable behavior; keep it.
pub(crate) fn classify_urgency(features: &FeatureVector, pupils_complete: bool) -> UrgencyVerdict {
    let mut verdict = UrgencyVerdict::new(UrgencyLevel::None, NO_FINDINGS_TEXT);

    if !pupils_complete {
        verdict = UrgencyVerdict::new(UrgencyLevel::None, PUPILS_INCOMPLETE_TEXT);
    }

    let symptomatic = features.acute || features.painful || features.neuro_sx;

    if features.dominance == Some(AnisocoriaDominance::Light)
        && (features.ptosis || features.diplopia)
        && symptomatic
    {
        verdict = UrgencyVerdict::new(UrgencyLevel::Danger, LARGE_PATTERN_DANGER_TEXT);
    } else if features.dominance == Some(AnisocoriaDominance::Dark)
        && (features.dilation_lag || features.ptosis || features.anhidrosis)
        && symptomatic
    {
        verdict = UrgencyVerdict::new(UrgencyLevel::Warn, SMALL_PATTERN_WARN_TEXT);
    } else if features.vf_bitemporal && features.vf_reliability != Reliability::Poor {
        verdict = UrgencyVerdict::new(UrgencyLevel::Info, VF_CHIASMAL_TEXT);
    } else if symptomatic {
        verdict = UrgencyVerdict::new(UrgencyLevel::Info, SYMPTOMS_TEXT);
    }

    verdict
}
