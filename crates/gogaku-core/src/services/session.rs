//! Study session composition: blend due-for-review and never-seen
//! items into a bounded, shuffled session, backfilling from the other
//! pool when one side runs short.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::models::{
    ItemFamily, ItemPayload, JlptLevel, ProgressRecord, Question, QuestionWithReading,
    ReadingGroup, SessionItem,
};
use crate::store::{DueEntry, ItemCatalog, ProgressStore, StoreError};

/// Stand-in for "uncapped" when a pool is re-fetched to backfill; keeps
/// a degenerate store from returning unbounded result sets.
const BACKFILL_FETCH_LIMIT: usize = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SessionComposer<S> {
    store: Arc<S>,
    config: SchedulerConfig,
}

impl<S> SessionComposer<S>
where
    S: ProgressStore + ItemCatalog,
{
    pub fn new(store: Arc<S>, config: SchedulerConfig) -> Self {
        Self { store, config }
    }

    /// Word flashcard session, 70% new / 30% due.
    pub async fn word_session<R: Rng>(
        &self,
        rng: &mut R,
        user_id: &str,
        level: Option<JlptLevel>,
        total_limit: usize,
    ) -> Result<Vec<SessionItem>, SessionError> {
        self.compose(rng, user_id, ItemFamily::Words, level, total_limit)
            .await
    }

    /// Grammar drill session, 70% new / 30% due.
    pub async fn grammar_session<R: Rng>(
        &self,
        rng: &mut R,
        user_id: &str,
        level: Option<JlptLevel>,
        total_limit: usize,
    ) -> Result<Vec<SessionItem>, SessionError> {
        self.compose(rng, user_id, ItemFamily::GrammarPoints, level, total_limit)
            .await
    }

    /// Question session, 80% new / 20% due. Questions that carry a
    /// passage come back with the reading joined in.
    pub async fn question_session<R: Rng>(
        &self,
        rng: &mut R,
        user_id: &str,
        level: Option<JlptLevel>,
        total_limit: usize,
    ) -> Result<Vec<SessionItem>, SessionError> {
        self.compose(rng, user_id, ItemFamily::Questions, level, total_limit)
            .await
    }

    /// Reading-grouped question session: select up to `max_readings`
    /// passages that still have studyable questions for this learner,
    /// then compose a standard session per passage group.
    pub async fn reading_session<R: Rng>(
        &self,
        rng: &mut R,
        user_id: &str,
        level: Option<JlptLevel>,
        max_readings: usize,
        per_reading_limit: usize,
    ) -> Result<Vec<ReadingGroup>, SessionError> {
        if max_readings == 0 || per_reading_limit == 0 {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let questions = self.store.questions(level, None).await?;
        let records = self
            .store
            .list_for_user(user_id, ItemFamily::Questions)
            .await?;
        let by_item: HashMap<&str, &ProgressRecord> =
            records.iter().map(|r| (r.item_id.as_str(), r)).collect();

        // group passage-backed questions, preserving catalog order
        let mut reading_ids: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, Vec<&Question>> = HashMap::new();
        for question in &questions {
            if let Some(rid) = &question.reading_content_id {
                if !grouped.contains_key(rid) {
                    reading_ids.push(rid.clone());
                }
                grouped.entry(rid.clone()).or_default().push(question);
            }
        }

        let mut groups = Vec::new();
        for rid in reading_ids {
            if groups.len() >= max_readings {
                break;
            }
            let Some(reading) = self.store.reading_content(&rid).await? else {
                warn!(reading_id = %rid, "questions reference missing reading content; skipping group");
                continue;
            };

            let mut due: Vec<SessionItem> = Vec::new();
            let mut unseen: Vec<SessionItem> = Vec::new();
            for question in &grouped[&rid] {
                let payload = ItemPayload::Questions(QuestionWithReading {
                    question: (*question).clone(),
                    reading: Some(reading.clone()),
                });
                match by_item.get(question.id.as_str()) {
                    Some(record) if record.is_due(now) => {
                        due.push(SessionItem::seen(record, payload));
                    }
                    Some(_) => {} // seen but not due yet
                    None => unseen.push(SessionItem::unseen(payload)),
                }
            }

            let items = blend(rng, due, unseen, self.config.questions.split(per_reading_limit));
            if items.is_empty() {
                continue;
            }
            groups.push(ReadingGroup { reading, items });
        }

        Ok(groups)
    }

    async fn compose<R: Rng>(
        &self,
        rng: &mut R,
        user_id: &str,
        family: ItemFamily,
        level: Option<JlptLevel>,
        total_limit: usize,
    ) -> Result<Vec<SessionItem>, SessionError> {
        if total_limit == 0 {
            return Ok(Vec::new());
        }

        let (due_limit, new_limit) = self.config.family(family).split(total_limit);
        let now = Utc::now();

        // independent reads; a failure of either half fails the whole
        // composition rather than returning a partial session
        let (due_entries, mut unseen) = tokio::try_join!(
            self.store.find_due(user_id, family, level, now, due_limit),
            self.store.find_unseen(user_id, family, level, new_limit),
        )?;

        let mut due = resolve_due(due_entries);

        // backfill: only the side that met its own limit is re-queried
        if due.len() + unseen.len() < total_limit {
            if due.len() < due_limit && unseen.len() >= new_limit {
                unseen = self
                    .store
                    .find_unseen(user_id, family, level, BACKFILL_FETCH_LIMIT)
                    .await?;
            } else if unseen.len() < new_limit && due.len() >= due_limit {
                due = resolve_due(
                    self.store
                        .find_due(user_id, family, level, now, BACKFILL_FETCH_LIMIT)
                        .await?,
                );
            }
        }

        let unseen_items: Vec<SessionItem> = unseen.into_iter().map(SessionItem::unseen).collect();

        let mut combined = due;
        combined.extend(unseen_items);
        combined.truncate(total_limit);
        combined.shuffle(rng);

        debug!(
            user_id,
            family = family.as_str(),
            size = combined.len(),
            "composed study session"
        );
        Ok(combined)
    }
}

/// Join due rows into session items, dropping rows whose item payload
/// did not resolve.
fn resolve_due(entries: Vec<DueEntry>) -> Vec<SessionItem> {
    entries
        .into_iter()
        .filter_map(|entry| match entry.item {
            Some(item) => Some(SessionItem::seen(&entry.record, item)),
            None => {
                warn!(
                    item_id = %entry.record.item_id,
                    user_id = %entry.record.user_id,
                    "due record lost its item in the join; dropping from session"
                );
                None
            }
        })
        .collect()
}

/// Blend fully-materialized due and unseen pools: apply the per-side
/// caps, backfill a short side from the other pool's surplus, truncate
/// to the total, shuffle.
fn blend<R: Rng>(
    rng: &mut R,
    due: Vec<SessionItem>,
    unseen: Vec<SessionItem>,
    (due_limit, new_limit): (usize, usize),
) -> Vec<SessionItem> {
    let total_limit = due_limit + new_limit;
    let mut due = due;
    let mut unseen = unseen;

    let due_take = if unseen.len() < new_limit {
        due_limit + (new_limit - unseen.len())
    } else {
        due_limit
    };
    let new_take = if due.len() < due_limit {
        new_limit + (due_limit - due.len())
    } else {
        new_limit
    };

    due.truncate(due_take);
    unseen.truncate(new_take);

    let mut combined = due;
    combined.extend(unseen);
    combined.truncate(total_limit);
    combined.shuffle(rng);
    combined
}
