//! Storage boundary: the content catalog and the progress store are
//! external collaborators; this core depends only on the joined shapes
//! they return, never on how a backend executes the joins.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    GrammarPoint, ItemFamily, ItemPayload, JlptLevel, ProgressRecord, Question, ReadingContent,
    Word,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A due-query row: the progress record joined with its content item.
/// `item` is `None` when the join could not resolve the item (content
/// deleted out from under the record); callers drop such rows.
#[derive(Debug, Clone)]
pub struct DueEntry {
    pub record: ProgressRecord,
    pub item: Option<ItemPayload>,
}

/// Read access to the content collections, one per item family.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn word(&self, id: &str) -> Result<Option<Word>, StoreError>;
    async fn word_by_kanji(&self, kanji: &str) -> Result<Option<Word>, StoreError>;
    async fn words(&self, level: Option<JlptLevel>) -> Result<Vec<Word>, StoreError>;

    async fn grammar_point(&self, id: &str) -> Result<Option<GrammarPoint>, StoreError>;
    async fn grammar_point_by_name(&self, name: &str) -> Result<Option<GrammarPoint>, StoreError>;
    async fn grammar_points(&self) -> Result<Vec<GrammarPoint>, StoreError>;

    async fn question(&self, id: &str) -> Result<Option<Question>, StoreError>;
    async fn questions(
        &self,
        level: Option<JlptLevel>,
        question_type: Option<&str>,
    ) -> Result<Vec<Question>, StoreError>;

    async fn reading_content(&self, id: &str) -> Result<Option<ReadingContent>, StoreError>;
}

/// Persistence for one record per (learner, item) pair.
///
/// `upsert` must support both create-if-absent and update-existing,
/// keyed by (user, family, item). Backends are expected to keep a
/// uniqueness constraint on that key and a secondary index on
/// (user, next_review) so due-queries stay cheap.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get(
        &self,
        user_id: &str,
        family: ItemFamily,
        item_id: &str,
    ) -> Result<Option<ProgressRecord>, StoreError>;

    async fn upsert(&self, record: ProgressRecord) -> Result<ProgressRecord, StoreError>;

    async fn list_for_user(
        &self,
        user_id: &str,
        family: ItemFamily,
    ) -> Result<Vec<ProgressRecord>, StoreError>;

    /// Records with `next_review <= cutoff`, joined with their items,
    /// optionally filtered by the item's level, capped at `limit`.
    /// Ordering before the composer's final shuffle is unspecified.
    async fn find_due(
        &self,
        user_id: &str,
        family: ItemFamily,
        level: Option<JlptLevel>,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DueEntry>, StoreError>;

    /// Items of the family for which the learner has no progress record
    /// yet, capped at `limit`.
    async fn find_unseen(
        &self,
        user_id: &str,
        family: ItemFamily,
        level: Option<JlptLevel>,
        limit: usize,
    ) -> Result<Vec<ItemPayload>, StoreError>;

    async fn count_unseen(
        &self,
        user_id: &str,
        family: ItemFamily,
        level: Option<JlptLevel>,
    ) -> Result<usize, StoreError>;
}
