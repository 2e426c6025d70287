//! SRS state transition applied to a progress record.

use chrono::{DateTime, Duration, Utc};
use gogaku_algo::{advance_level, updated_average_response_time, IntervalTable};

use crate::models::ProgressRecord;

/// Apply one review outcome to a record: level step, counter increment,
/// timestamps, and next-due time from the family's interval table. Pure
/// state transition with no error paths.
///
/// `response_time_ms` participates only for families that track it; the
/// running average is weighted by the attempt count *before* this
/// answer's increment.
pub fn apply_review(
    record: &mut ProgressRecord,
    is_correct: bool,
    response_time_ms: Option<i64>,
    table: &IntervalTable,
    now: DateTime<Utc>,
) {
    let prior_attempts = record.attempt_count();

    record.srs_level = advance_level(record.srs_level, is_correct);
    if is_correct {
        record.success_count += 1;
    } else {
        record.failure_count += 1;
    }

    record.last_reviewed = Some(now);
    record.next_review = now + Duration::minutes(table.minutes(record.srs_level));

    if let Some(rt) = response_time_ms {
        record.average_response_time_ms = Some(updated_average_response_time(
            record.average_response_time_ms,
            prior_attempts,
            rt,
        ));
        record.response_time_ms = Some(rt);
    }

    record.updated_at = now;
}
