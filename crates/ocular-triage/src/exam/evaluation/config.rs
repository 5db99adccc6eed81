use serde::{Deserialize, Serialize};

/// Anisocoria significance threshold in millimeters. Exported so display
/// layers can label inputs with the same cutoff the engine gates on.
pub const ANISOCORIA_THRESHOLD_MM: f64 = 0.5;

/// How many scored candidates the ranked differential may carry.
pub const MAX_DIFFERENTIAL_ENTRIES: usize = 8;

/// Tunable weights of the scoring pass. The defaults reproduce the
/// documented rule configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub anisocoria_threshold_mm: f64,
    pub max_differential_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anisocoria_threshold_mm: ANISOCORIA_THRESHOLD_MM,
            max_differential_entries: MAX_DIFFERENTIAL_ENTRIES,
        }
    }
}
