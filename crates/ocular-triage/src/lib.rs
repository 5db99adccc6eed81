//! Clinical feature derivation and differential scoring for neuro-ophthalmic
//! exam findings.
//!
//! The heart of the crate is [`exam::DifferentialEngine`], a pure transform
//! from one session snapshot to a ranked, explained differential plus a
//! single urgency banner. Everything around it (repository, service, router)
//! is collaborator scaffolding so the engine can be hosted behind HTTP.

pub mod config;
pub mod error;
pub mod exam;
pub mod telemetry;
