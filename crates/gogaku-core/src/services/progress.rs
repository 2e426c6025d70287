//! Answer recording: the SRS transition and the BKT mastery update for
//! one outcome event.
//!
//! The two updates are independent read-modify-write sequences against
//! the same progress record; each runs under the per-(learner, item)
//! key lock so concurrent duplicate submissions cannot drop an update.
//! The record is settled for an event only once both have completed.

use std::sync::Arc;

use chrono::Utc;
use gogaku_algo::{update_mastery, BktParams};
use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::locks::UpdateLocks;
use crate::models::{ItemFamily, ProgressRecord};
use crate::srs::apply_review;
use crate::store::{ItemCatalog, ProgressStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ProgressService<S> {
    store: Arc<S>,
    config: SchedulerConfig,
    locks: UpdateLocks,
}

impl<S> ProgressService<S>
where
    S: ProgressStore + ItemCatalog,
{
    pub fn new(store: Arc<S>, config: SchedulerConfig) -> Self {
        Self {
            store,
            config,
            locks: UpdateLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Record a flashcard answer for a word: SRS transition on the
    /// Words record (created on first answer), then the BKT mastery
    /// update on the same record.
    pub async fn record_flashcard_answer(
        &self,
        user_id: &str,
        word_id: &str,
        is_correct: bool,
    ) -> Result<ProgressRecord, ProgressError> {
        let word = self
            .store
            .word(word_id)
            .await?
            .ok_or_else(|| ProgressError::NotFound(format!("word not found: {word_id}")))?;

        self.apply_srs(
            user_id,
            ItemFamily::Words,
            &word.id,
            is_correct,
            None,
            Some(word.bkt.prior_knowledge),
        )
        .await?;
        self.apply_bkt(user_id, ItemFamily::Words, &word.id, is_correct, &word.bkt)
            .await
    }

    /// Record a word answer by its kanji (the natural key quiz
    /// submissions carry).
    pub async fn record_word_answer(
        &self,
        user_id: &str,
        kanji: &str,
        is_correct: bool,
    ) -> Result<ProgressRecord, ProgressError> {
        let word = self
            .store
            .word_by_kanji(kanji)
            .await?
            .ok_or_else(|| ProgressError::NotFound(format!("word not found with kanji: {kanji}")))?;

        self.apply_srs(
            user_id,
            ItemFamily::Words,
            &word.id,
            is_correct,
            None,
            Some(word.bkt.prior_knowledge),
        )
        .await?;
        self.apply_bkt(user_id, ItemFamily::Words, &word.id, is_correct, &word.bkt)
            .await
    }

    /// Record a grammar point answer by its name.
    pub async fn record_grammar_answer(
        &self,
        user_id: &str,
        name: &str,
        is_correct: bool,
    ) -> Result<ProgressRecord, ProgressError> {
        let grammar = self.store.grammar_point_by_name(name).await?.ok_or_else(|| {
            ProgressError::NotFound(format!("grammar point not found with name: {name}"))
        })?;

        self.apply_srs(
            user_id,
            ItemFamily::GrammarPoints,
            &grammar.id,
            is_correct,
            None,
            Some(grammar.bkt.prior_knowledge),
        )
        .await?;
        self.apply_bkt(
            user_id,
            ItemFamily::GrammarPoints,
            &grammar.id,
            is_correct,
            &grammar.bkt,
        )
        .await
    }

    /// Record a question answer: SRS transition plus response-time
    /// tracking on the Questions record, then fan-out to every word and
    /// grammar point the question exercises (each gets the full
    /// SRS-then-BKT sequence on its own record). Unresolvable
    /// references are skipped, not fatal.
    pub async fn record_question_answer(
        &self,
        user_id: &str,
        question_id: &str,
        is_correct: bool,
        response_time_ms: Option<i64>,
    ) -> Result<ProgressRecord, ProgressError> {
        let question = self.store.question(question_id).await?.ok_or_else(|| {
            ProgressError::NotFound(format!("question not found: {question_id}"))
        })?;

        let record = self
            .apply_srs(
                user_id,
                ItemFamily::Questions,
                &question.id,
                is_correct,
                response_time_ms,
                None,
            )
            .await?;

        for kanji in &question.words {
            match self.store.word_by_kanji(kanji).await? {
                Some(word) => {
                    self.apply_srs(
                        user_id,
                        ItemFamily::Words,
                        &word.id,
                        is_correct,
                        None,
                        Some(word.bkt.prior_knowledge),
                    )
                    .await?;
                    self.apply_bkt(user_id, ItemFamily::Words, &word.id, is_correct, &word.bkt)
                        .await?;
                }
                None => {
                    warn!(
                        question_id,
                        kanji = %kanji,
                        "question references unknown word; skipping fan-out"
                    );
                }
            }
        }

        for name in &question.grammar_points {
            match self.store.grammar_point_by_name(name).await? {
                Some(grammar) => {
                    self.apply_srs(
                        user_id,
                        ItemFamily::GrammarPoints,
                        &grammar.id,
                        is_correct,
                        None,
                        Some(grammar.bkt.prior_knowledge),
                    )
                    .await?;
                    self.apply_bkt(
                        user_id,
                        ItemFamily::GrammarPoints,
                        &grammar.id,
                        is_correct,
                        &grammar.bkt,
                    )
                    .await?;
                }
                None => {
                    warn!(
                        question_id,
                        name = %name,
                        "question references unknown grammar point; skipping fan-out"
                    );
                }
            }
        }

        Ok(record)
    }

    /// Standalone BKT update for a word. Fails with NotFound when the
    /// progress record is absent: mastery updates always follow an SRS
    /// update that creates the record.
    pub async fn update_word_mastery(
        &self,
        user_id: &str,
        word_id: &str,
        is_correct: bool,
    ) -> Result<ProgressRecord, ProgressError> {
        let word = self
            .store
            .word(word_id)
            .await?
            .ok_or_else(|| ProgressError::NotFound(format!("word not found: {word_id}")))?;
        self.apply_bkt(user_id, ItemFamily::Words, &word.id, is_correct, &word.bkt)
            .await
    }

    /// Standalone BKT update for a grammar point.
    pub async fn update_grammar_mastery(
        &self,
        user_id: &str,
        grammar_point_id: &str,
        is_correct: bool,
    ) -> Result<ProgressRecord, ProgressError> {
        let grammar = self.store.grammar_point(grammar_point_id).await?.ok_or_else(|| {
            ProgressError::NotFound(format!("grammar point not found: {grammar_point_id}"))
        })?;
        self.apply_bkt(
            user_id,
            ItemFamily::GrammarPoints,
            &grammar.id,
            is_correct,
            &grammar.bkt,
        )
        .await
    }

    pub async fn user_progress(
        &self,
        user_id: &str,
        family: ItemFamily,
    ) -> Result<Vec<ProgressRecord>, ProgressError> {
        Ok(self.store.list_for_user(user_id, family).await?)
    }

    pub async fn item_progress(
        &self,
        user_id: &str,
        family: ItemFamily,
        item_id: &str,
    ) -> Result<Option<ProgressRecord>, ProgressError> {
        Ok(self.store.get(user_id, family, item_id).await?)
    }

    /// SRS read-modify-write under the key lock. Creates the record on
    /// the learner's first answer for the item; the same answer event
    /// mutates it immediately, so no empty state is ever persisted.
    async fn apply_srs(
        &self,
        user_id: &str,
        family: ItemFamily,
        item_id: &str,
        is_correct: bool,
        response_time_ms: Option<i64>,
        initial_mastery: Option<f64>,
    ) -> Result<ProgressRecord, ProgressError> {
        let lock = self.locks.key_lock(user_id, family, item_id);
        let _guard = lock.lock().await;

        let now = Utc::now();
        let mut record = match self.store.get(user_id, family, item_id).await? {
            Some(existing) => existing,
            None => ProgressRecord::new(user_id, item_id, family, now, initial_mastery),
        };

        apply_review(
            &mut record,
            is_correct,
            response_time_ms,
            &self.config.family(family).intervals,
            now,
        );

        debug!(
            user_id,
            item_id,
            family = family.as_str(),
            srs_level = record.srs_level,
            "applied review"
        );
        Ok(self.store.upsert(record).await?)
    }

    /// BKT read-modify-write under the key lock, on the record the SRS
    /// engine writes. Only the mastery field is recomputed.
    async fn apply_bkt(
        &self,
        user_id: &str,
        family: ItemFamily,
        item_id: &str,
        is_correct: bool,
        params: &BktParams,
    ) -> Result<ProgressRecord, ProgressError> {
        let lock = self.locks.key_lock(user_id, family, item_id);
        let _guard = lock.lock().await;

        let mut record = self.store.get(user_id, family, item_id).await?.ok_or_else(|| {
            ProgressError::NotFound(format!(
                "progress record not found for user {user_id} and {} {item_id}",
                family.as_str()
            ))
        })?;

        let current = record.mastery_score.unwrap_or(params.prior_knowledge);
        record.mastery_score = Some(update_mastery(current, is_correct, params));
        record.updated_at = Utc::now();

        Ok(self.store.upsert(record).await?)
    }
}
