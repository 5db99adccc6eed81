use super::config::EngineConfig;
use super::DifferentialEntry;
use crate::exam::domain::{Congruity, Laterality, Reliability};
use crate::exam::features::{AnisocoriaDominance, Comitance, FeatureVector};

const POOR_RELIABILITY_NOTE: &str = "Poor reliability reduces weight";

/// Booleans shared by more than one rule, resolved once per invocation so
/// every rule reads the same call.
pub(crate) struct RuleSignals {
    pub(crate) large_pattern: bool,
    pub(crate) small_pattern: bool,
    pub(crate) has_anisocoria_measurement: bool,
    pub(crate) reliability_penalty: i32,
}

impl RuleSignals {
    pub(crate) fn from_features(features: &FeatureVector) -> Self {
        Self {
            // Larger in light means the big pupil is the sick one; larger in
            // dark points at the small pupil.
            large_pattern: features.dominance == Some(AnisocoriaDominance::Light),
            small_pattern: features.dominance == Some(AnisocoriaDominance::Dark),
            has_anisocoria_measurement: features.anis_light.is_some()
                || features.anis_dark.is_some(),
            reliability_penalty: if features.vf_reliability == Reliability::Poor {
                -2
            } else {
                0
            },
        }
    }
}

struct RuleTally {
    score: i32,
    why: Vec<String>,
}

impl RuleTally {
    fn new() -> Self {
        Self {
            score: 0,
            why: Vec::new(),
        }
    }

    fn add(&mut self, points: i32, reason: impl Into<String>) {
        self.score += points;
        self.why.push(reason.into());
    }

    fn apply_reliability(&mut self, signals: &RuleSignals) {
        if signals.reliability_penalty != 0 {
            self.score += signals.reliability_penalty;
            self.why.push(POOR_RELIABILITY_NOTE.to_string());
        }
    }
}

type RuleFn = fn(&FeatureVector, &RuleSignals, &EngineConfig) -> RuleTally;

struct ScoringRule {
    name: &'static str,
    evaluate: RuleFn,
}

/// The fixed rule set, in table order. Ties in the ranked output keep this
/// order, so position here is part of the contract.
const RULE_TABLE: &[ScoringRule] = &[
    ScoringRule {
        name: "Physiologic anisocoria",
        evaluate: physiologic_anisocoria,
    },
    ScoringRule {
        name: "Horner syndrome",
        evaluate: horner_syndrome,
    },
    ScoringRule {
        name: "Compressive 3rd nerve palsy concern",
        evaluate: compressive_third_nerve,
    },
    ScoringRule {
        name: "Adie / tonic pupil",
        evaluate: adie_tonic_pupil,
    },
    ScoringRule {
        name: "Pharmacologic mydriasis",
        evaluate: pharmacologic_mydriasis,
    },
    ScoringRule {
        name: "CN VI palsy pattern",
        evaluate: sixth_nerve_pattern,
    },
    ScoringRule {
        name: "Chiasmal / sellar compression pattern",
        evaluate: chiasmal_pattern,
    },
    ScoringRule {
        name: "Retrochiasmal lesion pattern",
        evaluate: retrochiasmal_pattern,
    },
    ScoringRule {
        name: "Optic nerve / anterior pathway pattern",
        evaluate: anterior_pathway_pattern,
    },
    ScoringRule {
        name: "Central scotoma pattern",
        evaluate: central_scotoma_pattern,
    },
];

/// Run every rule, keep the positive scorers, rank them, cap the list.
///
/// The sort is stable, so equal scores stay in table order; the positive
/// filter is the only floor applied to penalized scores.
pub(crate) fn score_differential(
    features: &FeatureVector,
    config: &EngineConfig,
) -> Vec<DifferentialEntry> {
    let signals = RuleSignals::from_features(features);

    let mut entries: Vec<DifferentialEntry> = RULE_TABLE
        .iter()
        .filter_map(|rule| {
            let tally = (rule.evaluate)(features, &signals, config);
            (tally.score > 0).then(|| DifferentialEntry {
                name: rule.name.to_string(),
                score: tally.score,
                why: tally.why,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(config.max_differential_entries);
    entries
}

/// Scores only when a measurement exists and no threshold pattern was
/// called, which keeps it mutually exclusive with the pattern rules.
fn physiologic_anisocoria(
    features: &FeatureVector,
    signals: &RuleSignals,
    config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if signals.has_anisocoria_measurement && features.dominance.is_none() {
        tally.add(
            3,
            format!(
                "Anisocoria does not meet {:.1} mm threshold-based pattern criteria",
                config.anisocoria_threshold_mm
            ),
        );

        if !features.acute
            && !features.painful
            && !features.neuro_sx
            && !features.diplopia
            && !features.ptosis
        {
            tally.add(1, "No acute/pain/neuro/EOM flags");
        }
    }

    tally
}

fn horner_syndrome(
    features: &FeatureVector,
    signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if signals.small_pattern {
        tally.add(4, "Greater in dark → small pupil abnormal pattern");
    }
    if features.dilation_lag {
        tally.add(2, "Dilation lag");
    }
    if features.ptosis {
        tally.add(2, "Ptosis");
    }
    if features.anhidrosis {
        tally.add(1, "Anhidrosis");
    }
    if features.acute || features.painful {
        tally.add(1, "Acute/painful context");
    }

    tally
}

fn compressive_third_nerve(
    features: &FeatureVector,
    signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if signals.large_pattern {
        tally.add(4, "Greater in light → large pupil abnormal pattern");
    }
    if features.ptosis {
        tally.add(2, "Ptosis");
    }
    if features.diplopia {
        tally.add(2, "Diplopia/EOM concern");
    }
    if features.acute {
        tally.add(2, "Acute onset");
    }
    if features.painful {
        tally.add(2, "Pain/headache");
    }
    if features.neuro_sx {
        tally.add(2, "Other neuro symptoms");
    }

    tally
}

fn adie_tonic_pupil(
    features: &FeatureVector,
    signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if signals.large_pattern {
        tally.add(2, "Large pupil pattern");
    }
    if features.light_near_dissociation {
        tally.add(3, "Light–near dissociation");
    }
    if features.vermiform {
        tally.add(2, "Segmental/vermiform movement");
    }

    tally
}

fn pharmacologic_mydriasis(
    features: &FeatureVector,
    signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if signals.large_pattern {
        tally.add(2, "Large pupil pattern");
    }
    if features.anticholinergic_exposure {
        tally.add(4, "Anticholinergic exposure");
    }
    if features.sympathomimetic_exposure {
        tally.add(2, "Sympathomimetic exposure");
    }

    tally
}

fn sixth_nerve_pattern(
    features: &FeatureVector,
    _signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if features.diplopia && features.abduction_deficit.is_present() {
        tally.add(3, "Diplopia + abduction deficit");
    }
    if features.comitance == Comitance::Incomitant {
        tally.add(1, "Incomitant deviation");
    }

    tally
}

fn chiasmal_pattern(
    features: &FeatureVector,
    signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if features.vf_bitemporal {
        tally.add(6, "Bitemporal field pattern");
    }
    if features.vf_respects_vertical {
        tally.add(2, "Respects vertical meridian");
    }
    if features.vf_laterality == Laterality::Binocular {
        tally.add(1, "Binocular / both eyes");
    }
    tally.apply_reliability(signals);

    tally
}

fn retrochiasmal_pattern(
    features: &FeatureVector,
    signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if features.vf_homonymous {
        tally.add(6, "Homonymous pattern");
    }
    if features.vf_respects_vertical {
        tally.add(2, "Respects vertical meridian");
    }
    if features.vf_congruity == Congruity::High {
        tally.add(2, "High congruity");
    }
    if features.vf_congruity == Congruity::Low {
        tally.add(1, "Lower congruity");
    }
    tally.apply_reliability(signals);

    tally
}

fn anterior_pathway_pattern(
    features: &FeatureVector,
    signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if features.vf_altitudinal && features.vf_respects_horizontal {
        tally.add(6, "Altitudinal + respects horizontal meridian");
    } else if features.vf_altitudinal {
        tally.add(4, "Altitudinal pattern");
    }
    if features.vf_laterality == Laterality::Mono {
        tally.add(1, "Monocular pattern");
    }
    tally.apply_reliability(signals);

    tally
}

fn central_scotoma_pattern(
    features: &FeatureVector,
    signals: &RuleSignals,
    _config: &EngineConfig,
) -> RuleTally {
    let mut tally = RuleTally::new();

    if features.vf_central_scotoma {
        tally.add(6, "Central scotoma");
    }
    if features.vf_laterality == Laterality::Mono {
        tally.add(1, "Monocular pattern");
    }
    if features.vf_complaint {
        tally.add(1, "Visual complaint present");
    }
    if features.vf_new_defect {
        tally.add(1, "New vs baseline");
    }
    tally.apply_reliability(signals);

    tally
}
