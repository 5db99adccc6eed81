use crate::infra::{
    default_engine_config, InMemoryEscalationPublisher, InMemorySessionRepository,
};
use clap::Args;
use ocular_triage::error::AppError;
use ocular_triage::exam::{
    AnisocoriaDominance, DifferentialEngine, ExamAssessment, ExamSession, ExamSessionService,
    Laterality, PupilReading, Reliability, ANISOCORIA_THRESHOLD_MM,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Path to a JSON file holding one session's exam findings
    #[arg(long)]
    pub(crate) findings: PathBuf,
    /// Emit the raw assessment JSON instead of the rendered report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Run a single named case (physiologic, horner, chiasmal)
    #[arg(long)]
    pub(crate) case: Option<String>,
}

pub(crate) fn run_exam_assess(args: AssessArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.findings)?;
    let session: ExamSession = serde_json::from_str(&raw)?;

    let engine = DifferentialEngine::new(default_engine_config());
    let assessment = engine.assess(&session);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        render_assessment(&assessment);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Exam triage demo");

    let repository = Arc::new(InMemorySessionRepository::default());
    let alerts = Arc::new(InMemoryEscalationPublisher::default());
    let service = ExamSessionService::new(repository, alerts.clone(), default_engine_config());

    for (label, session) in demo_cases() {
        if let Some(filter) = &args.case {
            if !label.eq_ignore_ascii_case(filter) {
                continue;
            }
        }

        println!("\nCase: {label}");
        let record = match service.open(label.to_string(), ExamSession::default()) {
            Ok(record) => record,
            Err(err) => {
                println!("  Session rejected: {}", err);
                continue;
            }
        };

        let assessment = match service.record_findings(&record.session_id, session) {
            Ok(assessment) => assessment,
            Err(err) => {
                println!("  Assessment unavailable: {}", err);
                continue;
            }
        };

        render_assessment(&assessment);

        match service.get(&record.session_id) {
            Ok(stored) => println!(
                "  Session {} -> {} (updated {})",
                stored.session_id.0,
                stored.status.label(),
                stored.updated_at.format("%Y-%m-%d %H:%M UTC")
            ),
            Err(err) => println!("  Session lookup unavailable: {}", err),
        }
    }

    let events = alerts.events();
    if events.is_empty() {
        println!("\nEscalations: none dispatched");
    } else {
        println!("\nEscalations:");
        for alert in events {
            println!("  - {} -> {}", alert.session_id.0, alert.message);
        }
    }

    Ok(())
}

fn demo_cases() -> Vec<(&'static str, ExamSession)> {
    vec![
        ("physiologic", physiologic_case()),
        ("horner", horner_case()),
        ("chiasmal", chiasmal_case()),
    ]
}

/// Small anisocoria, stable across lighting, no red flags.
fn physiologic_case() -> ExamSession {
    let mut session = ExamSession::default();
    session.pupils.od_light = PupilReading::Millimeters(3.2);
    session.pupils.os_light = PupilReading::Millimeters(3.0);
    session.pupils.od_dark = PupilReading::Millimeters(4.3);
    session.pupils.os_dark = PupilReading::Millimeters(4.1);
    session
}

/// Anisocoria greater in dark with dilation lag, ptosis, and acute onset.
fn horner_case() -> ExamSession {
    let mut session = ExamSession::default();
    session.pupils.od_light = PupilReading::Millimeters(3.5);
    session.pupils.os_light = PupilReading::Millimeters(3.2);
    session.pupils.od_dark = PupilReading::Millimeters(5.5);
    session.pupils.os_dark = PupilReading::Millimeters(4.0);
    session.pupils.dilation_lag = true;
    session.eom.ptosis = true;
    session.triage.acute_onset = true;
    session
}

/// Bitemporal field loss on a reliable test, pupils not yet measured.
fn chiasmal_case() -> ExamSession {
    let mut session = ExamSession::default();
    session.visual_fields.bitemporal = true;
    session.visual_fields.respects_vertical_meridian = Some(true);
    session.visual_fields.laterality = Laterality::Binocular;
    session.visual_fields.reliability = Reliability::Good;
    session.visual_fields.complaint = true;
    session
}

fn render_assessment(assessment: &ExamAssessment) {
    let features = &assessment.features;

    println!(
        "  Anisocoria: light {} | dark {} | {}",
        fmt_mm(features.anis_light),
        fmt_mm(features.anis_dark),
        dominance_label(features.dominance)
    );
    println!(
        "  Urgency [{}]: {}",
        assessment.urgency.level.label(),
        assessment.urgency.text
    );

    if assessment.differential.is_empty() {
        println!("  No scored differentials yet.");
        return;
    }

    println!("  Differential:");
    for (rank, entry) in assessment.differential.iter().enumerate() {
        println!("    {}. {} (score {})", rank + 1, entry.name, entry.score);
        for reason in &entry.why {
            println!("       - {reason}");
        }
    }
}

fn fmt_mm(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1} mm"),
        None => "—".to_string(),
    }
}

fn dominance_label(dominance: Option<AnisocoriaDominance>) -> String {
    match dominance {
        Some(AnisocoriaDominance::Light) => {
            format!("Light-dominant (≥{ANISOCORIA_THRESHOLD_MM} mm)")
        }
        Some(AnisocoriaDominance::Dark) => {
            format!("Dark-dominant (≥{ANISOCORIA_THRESHOLD_MM} mm)")
        }
        Some(AnisocoriaDominance::Equal) => {
            format!("Equal in light/dark (≥{ANISOCORIA_THRESHOLD_MM} mm)")
        }
        None => format!("Not called (<{ANISOCORIA_THRESHOLD_MM} mm or missing)"),
    }
}
