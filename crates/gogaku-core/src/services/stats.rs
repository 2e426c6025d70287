//! Per-learner question statistics, aggregated in-core from the
//! learner's fetched records rather than pushed down into the store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ItemFamily, ProgressRecord};
use crate::store::{ItemCatalog, ProgressStore, StoreError};

/// SRS level at or above which a record counts as mastered.
const MASTERY_SRS_LEVEL: i64 = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionTypeStats {
    pub question_type: String,
    pub attempted: i64,
    pub due: i64,
    pub total_success: i64,
    pub total_failure: i64,
    pub avg_srs_level: f64,
    pub questions_at_level0: i64,
    pub accuracy: f64,
    pub mastery_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub total_attempted: i64,
    pub currently_due: i64,
    pub overall_accuracy: f64,
    pub overall_mastery_rate: f64,
    pub average_srs_level: f64,
    pub by_type: Vec<QuestionTypeStats>,
}

#[derive(Debug, Default)]
struct Bucket {
    attempted: i64,
    due: i64,
    success: i64,
    failure: i64,
    level_sum: i64,
    at_level0: i64,
    mastered: i64,
}

impl Bucket {
    fn tally(&mut self, record: &ProgressRecord, now: DateTime<Utc>) {
        self.attempted += 1;
        self.success += record.success_count;
        self.failure += record.failure_count;
        self.level_sum += record.srs_level;
        if record.is_due(now) {
            self.due += 1;
        }
        if record.srs_level == 0 {
            self.at_level0 += 1;
        }
        if record.srs_level >= MASTERY_SRS_LEVEL {
            self.mastered += 1;
        }
    }

    fn accuracy(&self) -> f64 {
        let total = self.success + self.failure;
        if total == 0 {
            return 0.0;
        }
        self.success as f64 / total as f64
    }

    fn mastery_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.mastered as f64 / self.attempted as f64
    }

    fn avg_level(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.level_sum as f64 / self.attempted as f64
    }
}

pub async fn question_stats<S>(store: &S, user_id: &str) -> Result<QuestionStats, StoreError>
where
    S: ProgressStore + ItemCatalog + ?Sized,
{
    let now = Utc::now();
    let records = store.list_for_user(user_id, ItemFamily::Questions).await?;

    let mut overall = Bucket::default();
    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

    for record in &records {
        // a record with no resolvable question still counts toward the
        // overall numbers; it just has no type bucket
        let question_type = store
            .question(&record.item_id)
            .await?
            .map(|q| q.question_type);

        overall.tally(record, now);
        if let Some(question_type) = question_type {
            buckets.entry(question_type).or_default().tally(record, now);
        }
    }

    let by_type = buckets
        .into_iter()
        .map(|(question_type, bucket)| QuestionTypeStats {
            question_type,
            attempted: bucket.attempted,
            due: bucket.due,
            total_success: bucket.success,
            total_failure: bucket.failure,
            avg_srs_level: bucket.avg_level(),
            questions_at_level0: bucket.at_level0,
            accuracy: bucket.accuracy(),
            mastery_rate: bucket.mastery_rate(),
        })
        .collect();

    Ok(QuestionStats {
        total_attempted: overall.attempted,
        currently_due: overall.due,
        overall_accuracy: overall.accuracy(),
        overall_mastery_rate: overall.mastery_rate(),
        average_srs_level: overall.avg_level(),
        by_type,
    })
}
