use super::common::*;
use crate::exam::domain::{Congruity, Laterality, Reliability};

const RELIABILITY_NOTE: &str = "Poor reliability reduces weight";

#[test]
fn horner_pattern_ranks_first() {
    let assessment = engine().assess(&horner_session());

    let top = assessment
        .differential
        .first()
        .expect("ranked list is non-empty");
    assert_eq!(top.name, "Horner syndrome");
    assert_eq!(top.score, 9);
    assert_eq!(top.why.len(), 4);
    assert_eq!(top.why[0], "Greater in dark → small pupil abnormal pattern");

    assert!(assessment
        .differential
        .iter()
        .any(|entry| entry.name == "Compressive 3rd nerve palsy concern" && entry.score == 4));
}

#[test]
fn physiologic_scores_only_when_no_pattern_called() {
    let assessment = engine().assess(&measured_session(3.0, 2.9, 4.0, 3.9));

    assert_eq!(assessment.differential.len(), 1);
    let entry = &assessment.differential[0];
    assert_eq!(entry.name, "Physiologic anisocoria");
    assert_eq!(entry.score, 4);
    assert!(entry.why[0].contains("0.5 mm"));
    assert_eq!(entry.why[1], "No acute/pain/neuro/EOM flags");
}

#[test]
fn physiologic_excluded_once_pattern_called() {
    let assessment = engine().assess(&horner_session());

    assert!(assessment
        .differential
        .iter()
        .all(|entry| entry.name != "Physiologic anisocoria"));
}

#[test]
fn red_flags_suppress_physiologic_bonus() {
    let mut session = measured_session(3.0, 2.9, 4.0, 3.9);
    session.triage.acute_onset = true;

    let assessment = engine().assess(&session);

    let physiologic = assessment
        .differential
        .iter()
        .find(|entry| entry.name == "Physiologic anisocoria")
        .expect("physiologic entry present");
    assert_eq!(physiologic.score, 3);
    assert_eq!(physiologic.why.len(), 1);
}

#[test]
fn large_pattern_feeds_every_mydriatic_rule() {
    let mut session = measured_session(5.0, 3.0, 4.0, 3.9);
    session.pupils.anticholinergic_exposure = true;

    let assessment = engine().assess(&session);

    let names: Vec<&str> = assessment
        .differential
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    let scores: Vec<i32> = assessment
        .differential
        .iter()
        .map(|entry| entry.score)
        .collect();

    assert_eq!(
        names,
        vec![
            "Pharmacologic mydriasis",
            "Compressive 3rd nerve palsy concern",
            "Adie / tonic pupil",
        ]
    );
    assert_eq!(scores, vec![6, 4, 2]);
}

#[test]
fn sixth_nerve_pattern_needs_a_positive_score() {
    let mut session = measured_session(4.0, 4.0, 4.0, 4.0);
    session.eom.diplopia = true;
    session.eom.abduction_deficit = Some(true);
    session.eom.comitant = Some(false);

    let assessment = engine().assess(&session);

    let cn6 = assessment
        .differential
        .iter()
        .find(|entry| entry.name == "CN VI palsy pattern")
        .expect("CN VI entry present");
    assert_eq!(cn6.score, 4);

    // An assessed-absent deficit contributes nothing; only the comitance
    // point remains once the deficit is ruled out.
    let mut ruled_out = measured_session(4.0, 4.0, 4.0, 4.0);
    ruled_out.eom.diplopia = true;
    ruled_out.eom.abduction_deficit = Some(false);
    ruled_out.eom.comitant = Some(false);

    let assessment = engine().assess(&ruled_out);
    let cn6 = assessment
        .differential
        .iter()
        .find(|entry| entry.name == "CN VI palsy pattern")
        .expect("CN VI entry present");
    assert_eq!(cn6.score, 1);
}

#[test]
fn reliability_penalty_lands_once_per_rule() {
    let mut session = measured_session(4.0, 4.0, 4.0, 4.0);
    session.visual_fields.bitemporal = true;
    session.visual_fields.respects_vertical_meridian = Some(true);
    session.visual_fields.reliability = Reliability::Poor;

    let assessment = engine().assess(&session);

    let chiasmal = assessment
        .differential
        .iter()
        .find(|entry| entry.name == "Chiasmal / sellar compression pattern")
        .expect("chiasmal entry present");
    assert_eq!(chiasmal.score, 6);
    let notes = chiasmal
        .why
        .iter()
        .filter(|reason| reason.as_str() == RELIABILITY_NOTE)
        .count();
    assert_eq!(notes, 1);

    assert!(assessment
        .differential
        .iter()
        .all(|entry| entry.name != "Retrochiasmal lesion pattern"));
}

#[test]
fn penalized_rules_never_surface_non_positive_entries() {
    let mut session = measured_session(4.0, 4.0, 4.0, 4.0);
    session.visual_fields.laterality = Laterality::Mono;
    session.visual_fields.reliability = Reliability::Poor;

    let assessment = engine().assess(&session);

    // Mono laterality alone tallies +1 against a -2 penalty in two VF
    // rules; neither may surface at zero or below. Only the physiologic
    // entry for the equal pupils remains.
    assert_eq!(assessment.differential.len(), 1);
    assert_eq!(assessment.differential[0].name, "Physiologic anisocoria");
    assert!(assessment.differential.iter().all(|entry| entry.score > 0));
}

#[test]
fn differential_is_capped_and_sorted() {
    let mut session = measured_session(5.0, 3.0, 4.0, 3.9);
    session.triage.acute_onset = true;
    session.triage.painful = true;
    session.triage.neuro_sx = true;
    session.pupils.dilation_lag = true;
    session.pupils.anhidrosis = true;
    session.pupils.light_near_dissociation = true;
    session.pupils.vermiform = true;
    session.pupils.anticholinergic_exposure = true;
    session.pupils.sympathomimetic_exposure = true;
    session.eom.diplopia = true;
    session.eom.ptosis = true;
    session.eom.abduction_deficit = Some(true);
    session.eom.comitant = Some(false);
    session.visual_fields.homonymous = true;
    session.visual_fields.bitemporal = true;
    session.visual_fields.altitudinal = true;
    session.visual_fields.central_scotoma = true;
    session.visual_fields.respects_vertical_meridian = Some(true);
    session.visual_fields.respects_horizontal_meridian = Some(true);
    session.visual_fields.laterality = Laterality::Binocular;
    session.visual_fields.congruity = Congruity::High;
    session.visual_fields.complaint = true;
    session.visual_fields.new_defect = true;

    let assessment = engine().assess(&session);

    assert_eq!(assessment.differential.len(), 8);
    assert_eq!(
        assessment.differential[0].name,
        "Compressive 3rd nerve palsy concern"
    );
    for pair in assessment.differential.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    // Nine rules fire on this session; the lowest scorer falls off the cap.
    assert!(assessment
        .differential
        .iter()
        .all(|entry| entry.name != "CN VI palsy pattern"));
}

#[test]
fn tied_scores_keep_table_order() {
    let mut session = measured_session(4.0, 4.0, 4.0, 4.0);
    session.visual_fields.bitemporal = true;
    session.visual_fields.homonymous = true;
    session.visual_fields.respects_vertical_meridian = Some(true);
    session.visual_fields.congruity = Congruity::Moderate;

    let assessment = engine().assess(&session);

    let names: Vec<&str> = assessment
        .differential
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Chiasmal / sellar compression pattern",
            "Retrochiasmal lesion pattern",
            "Physiologic anisocoria",
        ]
    );
    assert_eq!(assessment.differential[0].score, 8);
    assert_eq!(assessment.differential[1].score, 8);
}

#[test]
fn engine_output_is_deterministic() {
    let session = horner_session();
    let engine = engine();

    let first = engine.assess(&session);
    let second = engine.assess(&session);

    assert_eq!(first, second);
}

#[test]
fn incomplete_pupils_suppress_differential_even_with_vf_findings() {
    let assessment = engine().assess(&chiasmal_session());

    assert!(assessment.differential.is_empty());
}
