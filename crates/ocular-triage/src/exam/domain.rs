use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored exam sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// One exam session as the form layer submits it.
///
/// Every namespace is optional on the wire; a missing block deserializes to
/// its empty record so downstream derivation never has to fail on shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamSession {
    pub triage: TriageFlags,
    pub pupils: PupilFindings,
    pub eom: EomFindings,
    pub visual_fields: VisualFieldFindings,
}

/// Patient-level red-flag checkboxes shared by every exam module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageFlags {
    pub acute_onset: bool,
    pub painful: bool,
    pub neuro_sx: bool,
    pub trauma: bool,
}

/// Raw form value for a pupil diameter.
///
/// The form layer submits whatever the input currently holds: a number, a
/// string still being typed, or nothing. Parsing to millimeters happens in
/// feature derivation; recording presence is checked on the raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PupilReading {
    Millimeters(f64),
    Text(String),
    Missing,
}

impl Default for PupilReading {
    fn default() -> Self {
        PupilReading::Missing
    }
}

impl PupilReading {
    /// Whether the field holds anything at all, regardless of parseability.
    pub fn is_recorded(&self) -> bool {
        match self {
            PupilReading::Millimeters(_) => true,
            PupilReading::Text(raw) => !raw.is_empty(),
            PupilReading::Missing => false,
        }
    }

    /// The value as a finite diameter, or `None` for anything malformed.
    pub fn millimeters(&self) -> Option<f64> {
        match self {
            PupilReading::Millimeters(value) if value.is_finite() => Some(*value),
            PupilReading::Millimeters(_) => None,
            PupilReading::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
            }
            PupilReading::Missing => None,
        }
    }
}

/// Qualitative light response recorded per eye. Stored for the chart; the
/// scoring rules never read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum LightReaction {
    Brisk,
    Sluggish,
    Fixed,
    #[default]
    Unspecified,
}

impl From<String> for LightReaction {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "brisk" => LightReaction::Brisk,
            "sluggish" => LightReaction::Sluggish,
            "fixed" => LightReaction::Fixed,
            _ => LightReaction::Unspecified,
        }
    }
}

/// Pupil module findings: four diameters plus associated signs and exposures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PupilFindings {
    pub od_light: PupilReading,
    pub os_light: PupilReading,
    pub od_dark: PupilReading,
    pub os_dark: PupilReading,
    pub od_light_reaction: LightReaction,
    pub os_light_reaction: LightReaction,
    pub dilation_lag: bool,
    pub anhidrosis: bool,
    pub light_near_dissociation: bool,
    pub vermiform: bool,
    pub anticholinergic_exposure: bool,
    pub sympathomimetic_exposure: bool,
}

impl PupilFindings {
    pub fn light_pair_recorded(&self) -> bool {
        self.od_light.is_recorded() && self.os_light.is_recorded()
    }

    pub fn dark_pair_recorded(&self) -> bool {
        self.od_dark.is_recorded() && self.os_dark.is_recorded()
    }

    /// Both eyes measured in both lighting conditions. This gates all
    /// pupil-driven scoring; presence is judged on the raw field, not on
    /// whether it parses.
    pub fn dataset_complete(&self) -> bool {
        self.light_pair_recorded() && self.dark_pair_recorded()
    }
}

/// Extraocular motility findings.
///
/// The deficit flags and comitance are tri-state on the wire: `true`,
/// `false`, or `null` for "not assessed". Notes are chart text only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EomFindings {
    pub diplopia: bool,
    pub ptosis: bool,
    pub fatigable: bool,
    pub pain_on_movement: bool,
    pub abduction_deficit: Option<bool>,
    pub adduction_deficit: Option<bool>,
    pub vertical_limitation: Option<bool>,
    pub comitant: Option<bool>,
    pub notes: String,
}

/// Reliability grade reported by the perimetry device or examiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Reliability {
    Good,
    Borderline,
    Poor,
    #[default]
    Unspecified,
}

impl From<String> for Reliability {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "good" => Reliability::Good,
            "borderline" => Reliability::Borderline,
            "poor" => Reliability::Poor,
            _ => Reliability::Unspecified,
        }
    }
}

/// Which eye(s) the field defect involves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Laterality {
    Mono,
    Binocular,
    Unknown,
    #[default]
    Unspecified,
}

impl From<String> for Laterality {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mono" => Laterality::Mono,
            "binocular" => Laterality::Binocular,
            "unknown" => Laterality::Unknown,
            _ => Laterality::Unspecified,
        }
    }
}

/// Defect shape similarity between the two eyes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Congruity {
    Low,
    Moderate,
    High,
    #[default]
    Unspecified,
}

impl From<String> for Congruity {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Congruity::Low,
            "moderate" => Congruity::Moderate,
            "high" => Congruity::High,
            _ => Congruity::Unspecified,
        }
    }
}

/// Visual-field module findings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualFieldFindings {
    pub test_type: String,
    pub reliability: Reliability,
    pub complaint: bool,
    pub new_defect: bool,
    pub homonymous: bool,
    pub bitemporal: bool,
    pub altitudinal: bool,
    pub central_scotoma: bool,
    pub laterality: Laterality,
    pub respects_vertical_meridian: Option<bool>,
    pub respects_horizontal_meridian: Option<bool>,
    pub congruity: Congruity,
    pub notes: String,
}
