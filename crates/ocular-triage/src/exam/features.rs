use serde::{Deserialize, Serialize};

use super::domain::{Congruity, ExamSession, Laterality, Reliability};
use super::evaluation::EngineConfig;

/// Which lighting condition produces the larger anisocoria, once the
/// difference clears the significance threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnisocoriaDominance {
    Light,
    Dark,
    Equal,
}

/// Three-valued motility finding. `Absent` means the deficit was looked for
/// and ruled out; `Unassessed` means nobody has looked yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeficitFinding {
    Present,
    Absent,
    Unassessed,
}

impl DeficitFinding {
    pub(crate) fn from_raw(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => DeficitFinding::Present,
            Some(false) => DeficitFinding::Absent,
            None => DeficitFinding::Unassessed,
        }
    }

    pub fn is_present(self) -> bool {
        self == DeficitFinding::Present
    }
}

/// Whether an ocular deviation holds steady across gaze directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comitance {
    Comitant,
    Incomitant,
    Unassessed,
}

impl Comitance {
    pub(crate) fn from_raw(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Comitance::Comitant,
            Some(false) => Comitance::Incomitant,
            None => Comitance::Unassessed,
        }
    }
}

/// Normalized snapshot of everything the scoring rules and urgency
/// classifier read. Derived once per computation, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub acute: bool,
    pub painful: bool,
    pub neuro_sx: bool,
    pub trauma: bool,

    pub anis_light: Option<f64>,
    pub anis_dark: Option<f64>,
    pub dominance: Option<AnisocoriaDominance>,
    pub dilation_lag: bool,
    pub anhidrosis: bool,
    pub light_near_dissociation: bool,
    pub vermiform: bool,
    pub anticholinergic_exposure: bool,
    pub sympathomimetic_exposure: bool,

    pub diplopia: bool,
    pub ptosis: bool,
    pub fatigable: bool,
    pub pain_on_movement: bool,
    pub abduction_deficit: DeficitFinding,
    pub adduction_deficit: DeficitFinding,
    pub vertical_limitation: DeficitFinding,
    pub comitance: Comitance,

    pub vf_complaint: bool,
    pub vf_test_type: String,
    pub vf_reliability: Reliability,
    pub vf_new_defect: bool,
    pub vf_laterality: Laterality,
    pub vf_respects_vertical: bool,
    pub vf_respects_horizontal: bool,
    pub vf_homonymous: bool,
    pub vf_bitemporal: bool,
    pub vf_altitudinal: bool,
    pub vf_central_scotoma: bool,
    pub vf_congruity: Congruity,
}

/// Normalize one session snapshot into the canonical feature set.
///
/// Total over the raw domain: malformed numbers and absent fields collapse
/// to `None`/`false` rather than an error.
pub fn derive_features(session: &ExamSession, config: &EngineConfig) -> FeatureVector {
    let triage = &session.triage;
    let pupils = &session.pupils;
    let eom = &session.eom;
    let vf = &session.visual_fields;

    let od_light = pupils.od_light.millimeters();
    let os_light = pupils.os_light.millimeters();
    let od_dark = pupils.od_dark.millimeters();
    let os_dark = pupils.os_dark.millimeters();

    let anis_light = abs_difference(od_light, os_light);
    let anis_dark = abs_difference(od_dark, os_dark);
    let dominance = resolve_dominance(anis_light, anis_dark, config.anisocoria_threshold_mm);

    FeatureVector {
        acute: triage.acute_onset,
        painful: triage.painful,
        neuro_sx: triage.neuro_sx,
        trauma: triage.trauma,

        anis_light,
        anis_dark,
        dominance,
        dilation_lag: pupils.dilation_lag,
        anhidrosis: pupils.anhidrosis,
        light_near_dissociation: pupils.light_near_dissociation,
        vermiform: pupils.vermiform,
        anticholinergic_exposure: pupils.anticholinergic_exposure,
        sympathomimetic_exposure: pupils.sympathomimetic_exposure,

        diplopia: eom.diplopia,
        ptosis: eom.ptosis,
        fatigable: eom.fatigable,
        pain_on_movement: eom.pain_on_movement,
        abduction_deficit: DeficitFinding::from_raw(eom.abduction_deficit),
        adduction_deficit: DeficitFinding::from_raw(eom.adduction_deficit),
        vertical_limitation: DeficitFinding::from_raw(eom.vertical_limitation),
        comitance: Comitance::from_raw(eom.comitant),

        vf_complaint: vf.complaint,
        vf_test_type: vf.test_type.clone(),
        vf_reliability: vf.reliability,
        vf_new_defect: vf.new_defect,
        vf_laterality: vf.laterality,
        vf_respects_vertical: vf.respects_vertical_meridian == Some(true),
        vf_respects_horizontal: vf.respects_horizontal_meridian == Some(true),
        vf_homonymous: vf.homonymous,
        vf_bitemporal: vf.bitemporal,
        vf_altitudinal: vf.altitudinal,
        vf_central_scotoma: vf.central_scotoma,
        vf_congruity: vf.congruity,
    }
}

fn abs_difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a - b).abs()),
        _ => None,
    }
}

fn resolve_dominance(
    anis_light: Option<f64>,
    anis_dark: Option<f64>,
    threshold: f64,
) -> Option<AnisocoriaDominance> {
    let light_meets = anis_light.map_or(false, |value| value >= threshold);
    let dark_meets = anis_dark.map_or(false, |value| value >= threshold);

    if !light_meets && !dark_meets {
        return None;
    }

    match (anis_light, anis_dark) {
        (Some(light), Some(dark)) => {
            if light > dark {
                Some(AnisocoriaDominance::Light)
            } else if dark > light {
                Some(AnisocoriaDominance::Dark)
            } else {
                Some(AnisocoriaDominance::Equal)
            }
        }
        // A single measured condition can still call the pattern when it
        // meets threshold, even with no comparator on the other side.
        _ if light_meets => Some(AnisocoriaDominance::Light),
        _ => Some(AnisocoriaDominance::Dark),
    }
}
