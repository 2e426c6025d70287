use gogaku_algo::IntervalTable;

use crate::models::ItemFamily;

/// Wait-duration ladder for word flashcards; questions reuse the same
/// calibration.
pub const WORD_INTERVALS: IntervalTable =
    IntervalTable::new([1, 240, 480, 1440, 2880, 5760, 10080, 20160, 43200, 129600]);

pub const QUESTION_INTERVALS: IntervalTable = WORD_INTERVALS;

/// Grammar drills ramp up faster in the early levels before converging
/// with the word ladder from one week on.
pub const GRAMMAR_INTERVALS: IntervalTable =
    IntervalTable::new([1, 10, 60, 360, 1440, 4320, 10080, 20160, 43200, 129600]);

/// Share of a session reserved for never-seen items in flashcard-style
/// families.
pub const FLASHCARD_NEW_RATIO: f64 = 0.7;

/// Share of a session reserved for never-seen items in the question
/// family. Kept distinct from the flashcard ratio on purpose; the two
/// values are separate calibrations per content type.
pub const QUESTION_NEW_RATIO: f64 = 0.8;

/// Per-family scheduling calibration: the SRS interval ladder and the
/// new/due split used by the session composer.
#[derive(Debug, Clone, Copy)]
pub struct FamilyScheduling {
    pub intervals: IntervalTable,
    /// Fraction of `total_limit` allotted to never-seen items, in (0, 1).
    /// The new-pool cap is `floor(total * new_ratio)`; the due pool gets
    /// the remainder.
    pub new_ratio: f64,
}

impl FamilyScheduling {
    /// Split a session size into `(due_limit, new_limit)`.
    pub fn split(&self, total_limit: usize) -> (usize, usize) {
        let new_limit = (total_limit as f64 * self.new_ratio).floor() as usize;
        (total_limit - new_limit, new_limit)
    }
}

/// Scheduling configuration for all item families, passed into the
/// services at construction so tests can substitute deterministic
/// tables.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub words: FamilyScheduling,
    pub questions: FamilyScheduling,
    pub grammar_points: FamilyScheduling,
}

impl SchedulerConfig {
    pub fn family(&self, family: ItemFamily) -> &FamilyScheduling {
        match family {
            ItemFamily::Words => &self.words,
            ItemFamily::Questions => &self.questions,
            ItemFamily::GrammarPoints => &self.grammar_points,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            words: FamilyScheduling {
                intervals: WORD_INTERVALS,
                new_ratio: FLASHCARD_NEW_RATIO,
            },
            questions: FamilyScheduling {
                intervals: QUESTION_INTERVALS,
                new_ratio: QUESTION_NEW_RATIO,
            },
            grammar_points: FamilyScheduling {
                intervals: GRAMMAR_INTERVALS,
                new_ratio: FLASHCARD_NEW_RATIO,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flashcard_split_uses_floor_for_new() {
        let cfg = SchedulerConfig::default();
        let (due, new) = cfg.words.split(10);
        assert_eq!((due, new), (3, 7));
        let (due, new) = cfg.words.split(15);
        // floor(15 * 0.7) = 10 new, remainder 5 due
        assert_eq!((due, new), (5, 10));
    }

    #[test]
    fn question_split_is_eighty_twenty() {
        let cfg = SchedulerConfig::default();
        let (due, new) = cfg.questions.split(50);
        assert_eq!((due, new), (10, 40));
    }

    #[test]
    fn splits_always_sum_to_total() {
        let cfg = SchedulerConfig::default();
        for total in 0..200 {
            let (due, new) = cfg.questions.split(total);
            assert_eq!(due + new, total);
        }
    }
}
