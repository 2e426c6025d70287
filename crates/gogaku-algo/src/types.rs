//! Shared parameter types and constants.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Lowest SRS level.
pub const SRS_MIN_LEVEL: i64 = 0;

/// Highest SRS level.
pub const SRS_MAX_LEVEL: i64 = 9;

/// Number of entries in an interval table (one per SRS level).
pub const SRS_LEVEL_COUNT: usize = 10;

// ==================== BKT Types ====================

/// Calibrated per-item BKT parameters, all probabilities in [0, 1].
///
/// Fitted offline per item from historical answer logs; every item of a
/// mastery-tracked family carries its own set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BktParams {
    /// P(L0) - probability the learner already knows the item before
    /// the first observation.
    pub prior_knowledge: f64,
    /// P(T) - probability of transitioning to the known state after an
    /// observation.
    pub learning_rate: f64,
    /// P(S) - probability of answering incorrectly despite knowing.
    pub slip_rate: f64,
    /// P(G) - probability of answering correctly despite not knowing.
    pub guess_rate: f64,
}

impl Default for BktParams {
    fn default() -> Self {
        Self {
            prior_knowledge: 0.1,
            learning_rate: 0.3,
            slip_rate: 0.1,
            guess_rate: 0.25,
        }
    }
}
