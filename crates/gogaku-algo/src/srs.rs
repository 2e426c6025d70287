//! SRS level transitions and interval lookup.
//!
//! The scheduler is a fixed ladder: level 0..=9, one step up per correct
//! answer, one step down per miss, clamped at both ends. The level
//! indexes a per-family table of wait durations in minutes. Tables are a
//! calibration choice per content family, not a derivable formula, so
//! they are passed in as data rather than hard-coded here.

use serde::{Deserialize, Serialize};

use crate::types::{SRS_LEVEL_COUNT, SRS_MAX_LEVEL, SRS_MIN_LEVEL};

/// Fixed ascending wait-duration table, one entry per SRS level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTable {
    minutes: [i64; SRS_LEVEL_COUNT],
}

impl IntervalTable {
    pub const fn new(minutes: [i64; SRS_LEVEL_COUNT]) -> Self {
        Self { minutes }
    }

    /// Wait duration in minutes for `level`. The level is clamped to
    /// [0, 9] before lookup; indexing beyond the table is never possible.
    pub fn minutes(&self, level: i64) -> i64 {
        let clamped = level.clamp(SRS_MIN_LEVEL, SRS_MAX_LEVEL);
        self.minutes[clamped as usize]
    }
}

/// Next SRS level after an answer: +1 on correct, -1 on incorrect,
/// clamped into [0, 9] at both ends.
pub fn advance_level(level: i64, is_correct: bool) -> i64 {
    if is_correct {
        (level + 1).min(SRS_MAX_LEVEL)
    } else {
        (level - 1).max(SRS_MIN_LEVEL)
    }
}

/// Running mean of response times in milliseconds.
///
/// The first observation sets the average to itself. Subsequent
/// observations fold in as `(avg * prior_attempts + value) /
/// (prior_attempts + 1)`, where `prior_attempts` is the attempt count
/// *before* the current answer is tallied. Passing the post-increment
/// count skews the mean toward old values, so callers must capture the
/// count first.
pub fn updated_average_response_time(
    average_ms: Option<i64>,
    prior_attempts: i64,
    response_time_ms: i64,
) -> i64 {
    match average_ms {
        None => response_time_ms,
        Some(avg) => {
            let prior = prior_attempts.max(0);
            let total = avg as f64 * prior as f64 + response_time_ms as f64;
            (total / (prior + 1) as f64).round() as i64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: IntervalTable =
        IntervalTable::new([1, 240, 480, 1440, 2880, 5760, 10080, 20160, 43200, 129600]);

    #[test]
    fn correct_climbs_one_level() {
        assert_eq!(advance_level(0, true), 1);
        assert_eq!(advance_level(4, true), 5);
    }

    #[test]
    fn incorrect_drops_one_level() {
        assert_eq!(advance_level(5, false), 4);
        assert_eq!(advance_level(1, false), 0);
    }

    #[test]
    fn level_clamps_at_both_ends() {
        assert_eq!(advance_level(9, true), 9);
        assert_eq!(advance_level(0, false), 0);
    }

    #[test]
    fn interval_lookup_clamps_out_of_range_levels() {
        assert_eq!(TABLE.minutes(-3), 1);
        assert_eq!(TABLE.minutes(0), 1);
        assert_eq!(TABLE.minutes(9), 129600);
        assert_eq!(TABLE.minutes(42), 129600);
    }

    #[test]
    fn first_response_time_sets_average() {
        assert_eq!(updated_average_response_time(None, 0, 2500), 2500);
    }

    #[test]
    fn average_weights_by_prior_attempt_count() {
        // one prior attempt at 1000ms, new answer at 2000ms
        assert_eq!(updated_average_response_time(Some(1000), 1, 2000), 1500);
        // three prior attempts at 1200ms, new answer at 2000ms
        assert_eq!(updated_average_response_time(Some(1200), 3, 2000), 1400);
    }

    #[test]
    fn average_rounds_to_whole_milliseconds() {
        // (1000 * 2 + 1001) / 3 = 1000.33 -> 1000
        assert_eq!(updated_average_response_time(Some(1000), 2, 1001), 1000);
        // (1000 * 1 + 1001) / 2 = 1000.5 -> 1001
        assert_eq!(updated_average_response_time(Some(1000), 1, 1001), 1001);
    }
}
