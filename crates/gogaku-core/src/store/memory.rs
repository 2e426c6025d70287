//! In-memory reference implementation of the store traits.
//!
//! Linear scans over insertion-ordered vectors; good enough for tests,
//! tools, and single-user embedding. A database-backed store replaces
//! this behind the same traits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::models::{
    GrammarPoint, ItemFamily, ItemPayload, JlptLevel, ProgressRecord, Question,
    QuestionWithReading, ReadingContent, Word,
};
use crate::store::{DueEntry, ItemCatalog, ProgressStore, StoreError};

type ProgressKey = (String, ItemFamily, String);

#[derive(Default)]
pub struct MemoryStore {
    words: RwLock<Vec<Word>>,
    grammar_points: RwLock<Vec<GrammarPoint>>,
    questions: RwLock<Vec<Question>>,
    readings: RwLock<Vec<ReadingContent>>,
    progress: RwLock<HashMap<ProgressKey, ProgressRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_word(&self, word: Word) {
        self.words.write().push(word);
    }

    pub fn add_grammar_point(&self, grammar_point: GrammarPoint) {
        self.grammar_points.write().push(grammar_point);
    }

    pub fn add_question(&self, question: Question) {
        self.questions.write().push(question);
    }

    pub fn add_reading(&self, reading: ReadingContent) {
        self.readings.write().push(reading);
    }

    /// Insert a record directly, bypassing the answer-recording flow.
    /// Test seam for pre-seeding review histories.
    pub fn put_progress(&self, record: ProgressRecord) {
        let key = (
            record.user_id.clone(),
            record.family,
            record.item_id.clone(),
        );
        self.progress.write().insert(key, record);
    }

    fn payload(&self, family: ItemFamily, item_id: &str) -> Option<ItemPayload> {
        match family {
            ItemFamily::Words => self
                .words
                .read()
                .iter()
                .find(|w| w.id == item_id)
                .cloned()
                .map(ItemPayload::Words),
            ItemFamily::GrammarPoints => self
                .grammar_points
                .read()
                .iter()
                .find(|g| g.id == item_id)
                .cloned()
                .map(ItemPayload::GrammarPoints),
            ItemFamily::Questions => {
                let question = self
                    .questions
                    .read()
                    .iter()
                    .find(|q| q.id == item_id)
                    .cloned()?;
                let reading = question.reading_content_id.as_ref().and_then(|rid| {
                    self.readings
                        .read()
                        .iter()
                        .find(|r| &r.id == rid)
                        .cloned()
                });
                Some(ItemPayload::Questions(QuestionWithReading {
                    question,
                    reading,
                }))
            }
        }
    }

    fn family_payloads(&self, family: ItemFamily, level: Option<JlptLevel>) -> Vec<ItemPayload> {
        let ids: Vec<String> = match family {
            ItemFamily::Words => self.words.read().iter().map(|w| w.id.clone()).collect(),
            ItemFamily::GrammarPoints => self
                .grammar_points
                .read()
                .iter()
                .map(|g| g.id.clone())
                .collect(),
            ItemFamily::Questions => self
                .questions
                .read()
                .iter()
                .map(|q| q.id.clone())
                .collect(),
        };
        ids.iter()
            .filter_map(|id| self.payload(family, id))
            .filter(|payload| level.map_or(true, |l| payload.level() == l))
            .collect()
    }
}

#[async_trait]
impl ItemCatalog for MemoryStore {
    async fn word(&self, id: &str) -> Result<Option<Word>, StoreError> {
        Ok(self.words.read().iter().find(|w| w.id == id).cloned())
    }

    async fn word_by_kanji(&self, kanji: &str) -> Result<Option<Word>, StoreError> {
        Ok(self.words.read().iter().find(|w| w.kanji == kanji).cloned())
    }

    async fn words(&self, level: Option<JlptLevel>) -> Result<Vec<Word>, StoreError> {
        Ok(self
            .words
            .read()
            .iter()
            .filter(|w| level.map_or(true, |l| w.level == l))
            .cloned()
            .collect())
    }

    async fn grammar_point(&self, id: &str) -> Result<Option<GrammarPoint>, StoreError> {
        Ok(self
            .grammar_points
            .read()
            .iter()
            .find(|g| g.id == id)
            .cloned())
    }

    async fn grammar_point_by_name(&self, name: &str) -> Result<Option<GrammarPoint>, StoreError> {
        Ok(self
            .grammar_points
            .read()
            .iter()
            .find(|g| g.name == name)
            .cloned())
    }

    async fn grammar_points(&self) -> Result<Vec<GrammarPoint>, StoreError> {
        Ok(self.grammar_points.read().clone())
    }

    async fn question(&self, id: &str) -> Result<Option<Question>, StoreError> {
        Ok(self.questions.read().iter().find(|q| q.id == id).cloned())
    }

    async fn questions(
        &self,
        level: Option<JlptLevel>,
        question_type: Option<&str>,
    ) -> Result<Vec<Question>, StoreError> {
        Ok(self
            .questions
            .read()
            .iter()
            .filter(|q| level.map_or(true, |l| q.level == l))
            .filter(|q| question_type.map_or(true, |t| q.question_type == t))
            .cloned()
            .collect())
    }

    async fn reading_content(&self, id: &str) -> Result<Option<ReadingContent>, StoreError> {
        Ok(self.readings.read().iter().find(|r| r.id == id).cloned())
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn get(
        &self,
        user_id: &str,
        family: ItemFamily,
        item_id: &str,
    ) -> Result<Option<ProgressRecord>, StoreError> {
        let key = (user_id.to_string(), family, item_id.to_string());
        Ok(self.progress.read().get(&key).cloned())
    }

    async fn upsert(&self, record: ProgressRecord) -> Result<ProgressRecord, StoreError> {
        let key = (
            record.user_id.clone(),
            record.family,
            record.item_id.clone(),
        );
        self.progress.write().insert(key, record.clone());
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        family: ItemFamily,
    ) -> Result<Vec<ProgressRecord>, StoreError> {
        let mut records: Vec<ProgressRecord> = self
            .progress
            .read()
            .values()
            .filter(|r| r.user_id == user_id && r.family == family)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        Ok(records)
    }

    async fn find_due(
        &self,
        user_id: &str,
        family: ItemFamily,
        level: Option<JlptLevel>,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DueEntry>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut due: Vec<ProgressRecord> = self
            .progress
            .read()
            .values()
            .filter(|r| r.user_id == user_id && r.family == family && r.next_review <= cutoff)
            .cloned()
            .collect();
        due.sort_by(|a, b| {
            a.next_review
                .cmp(&b.next_review)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        let mut entries = Vec::new();
        for record in due {
            let item = self.payload(family, &record.item_id);
            // a level filter can only match through the joined item
            if let Some(wanted) = level {
                match &item {
                    Some(payload) if payload.level() == wanted => {}
                    _ => continue,
                }
            }
            entries.push(DueEntry { record, item });
            if entries.len() >= limit {
                break;
            }
        }
        Ok(entries)
    }

    async fn find_unseen(
        &self,
        user_id: &str,
        family: ItemFamily,
        level: Option<JlptLevel>,
        limit: usize,
    ) -> Result<Vec<ItemPayload>, StoreError> {
        let progress = self.progress.read();
        Ok(self
            .family_payloads(family, level)
            .into_iter()
            .filter(|payload| {
                let key = (user_id.to_string(), family, payload.id().to_string());
                !progress.contains_key(&key)
            })
            .take(limit)
            .collect())
    }

    async fn count_unseen(
        &self,
        user_id: &str,
        family: ItemFamily,
        level: Option<JlptLevel>,
    ) -> Result<usize, StoreError> {
        let progress = self.progress.read();
        Ok(self
            .family_payloads(family, level)
            .into_iter()
            .filter(|payload| {
                let key = (user_id.to_string(), family, payload.id().to_string());
                !progress.contains_key(&key)
            })
            .count())
    }
}
