use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use gogaku_algo::BktParams;

/// JLPT proficiency level tag carried by every content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JlptLevel {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl JlptLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            JlptLevel::N5 => "N5",
            JlptLevel::N4 => "N4",
            JlptLevel::N3 => "N3",
            JlptLevel::N2 => "N2",
            JlptLevel::N1 => "N1",
        }
    }
}

impl fmt::Display for JlptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JlptLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N5" => Ok(JlptLevel::N5),
            "N4" => Ok(JlptLevel::N4),
            "N3" => Ok(JlptLevel::N3),
            "N2" => Ok(JlptLevel::N2),
            "N1" => Ok(JlptLevel::N1),
            other => Err(format!("unknown JLPT level: {other}")),
        }
    }
}

/// Item family. Content and progress are stored per family; scheduling
/// tables and session ratios are configured per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemFamily {
    Words,
    Questions,
    GrammarPoints,
}

impl ItemFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemFamily::Words => "words",
            ItemFamily::Questions => "questions",
            ItemFamily::GrammarPoints => "grammarPoints",
        }
    }

    /// Whether records of this family carry a BKT mastery score.
    pub fn tracks_mastery(&self) -> bool {
        matches!(self, ItemFamily::Words | ItemFamily::GrammarPoints)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub kanji: String,
    pub hiragana: String,
    pub english: Vec<String>,
    pub level: JlptLevel,
    pub word_type: String,
    pub bkt: BktParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarPoint {
    pub id: String,
    /// Natural key used by answer submissions and question fan-out.
    pub name: String,
    pub title: String,
    pub explanation: String,
    pub structure: String,
    pub examples: Vec<String>,
    pub level: JlptLevel,
    pub bkt: BktParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question_text: String,
    pub answers: Vec<String>,
    pub correct_answer: usize,
    pub level: JlptLevel,
    pub question_type: String,
    /// Passage shared by several questions, if any.
    pub reading_content_id: Option<String>,
    /// Kanji of words this question exercises; answering the question
    /// fans progress updates out to them.
    pub words: Vec<String>,
    /// Names of grammar points this question exercises.
    pub grammar_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingContent {
    pub id: String,
    pub content: String,
    pub content_type: String,
    pub question_type: String,
    pub level: JlptLevel,
}

/// A question with its reading passage joined in. Questions without a
/// passage have `reading: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionWithReading {
    pub question: Question,
    pub reading: Option<ReadingContent>,
}

/// The joined content unit a store query resolves an item id into.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "family", content = "item")]
pub enum ItemPayload {
    Words(Word),
    Questions(QuestionWithReading),
    GrammarPoints(GrammarPoint),
}

impl ItemPayload {
    pub fn family(&self) -> ItemFamily {
        match self {
            ItemPayload::Words(_) => ItemFamily::Words,
            ItemPayload::Questions(_) => ItemFamily::Questions,
            ItemPayload::GrammarPoints(_) => ItemFamily::GrammarPoints,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ItemPayload::Words(w) => &w.id,
            ItemPayload::Questions(q) => &q.question.id,
            ItemPayload::GrammarPoints(g) => &g.id,
        }
    }

    pub fn level(&self) -> JlptLevel {
        match self {
            ItemPayload::Words(w) => w.level,
            ItemPayload::Questions(q) => q.question.level,
            ItemPayload::GrammarPoints(g) => g.level,
        }
    }
}

/// One learner's review state for one item. A record does not exist
/// until the learner's first answer for the item; it is then mutated on
/// every subsequent answer and never deleted.
///
/// `srs_level` and `mastery_score` are updated by independent
/// algorithms over this shared record: a wrong answer lowers the level
/// while the mastery follows its own Bayesian recursion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub family: ItemFamily,
    pub srs_level: i64,
    pub success_count: i64,
    pub failure_count: i64,
    /// BKT mastery in [0, 1]. Present for mastery-tracked families only.
    pub mastery_score: Option<f64>,
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Defaults to the creation instant, so a brand-new record is
    /// immediately due.
    pub next_review: DateTime<Utc>,
    pub response_time_ms: Option<i64>,
    pub average_response_time_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        family: ItemFamily,
        now: DateTime<Utc>,
        initial_mastery: Option<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            item_id: item_id.into(),
            family,
            srs_level: 0,
            success_count: 0,
            failure_count: 0,
            mastery_score: initial_mastery,
            last_reviewed: None,
            next_review: now,
            response_time_ms: None,
            average_response_time_ms: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    pub fn attempt_count(&self) -> i64 {
        self.success_count + self.failure_count
    }

    pub fn failure_rate(&self) -> f64 {
        let attempts = self.attempt_count();
        if attempts == 0 {
            return 0.0;
        }
        self.failure_count as f64 / attempts as f64
    }
}

/// Ephemeral study entry returned by the session composer. Either a
/// persisted record joined with its item, or a synthetic zero-state
/// stand-in for an item the learner has never seen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    /// Progress record id; `None` for unseen items.
    pub progress_id: Option<String>,
    pub item: ItemPayload,
    pub srs_level: i64,
    pub success_count: i64,
    pub failure_count: i64,
    pub is_new: bool,
}

impl SessionItem {
    pub fn seen(record: &ProgressRecord, item: ItemPayload) -> Self {
        Self {
            progress_id: Some(record.id.clone()),
            item,
            srs_level: record.srs_level,
            success_count: record.success_count,
            failure_count: record.failure_count,
            is_new: false,
        }
    }

    pub fn unseen(item: ItemPayload) -> Self {
        Self {
            progress_id: None,
            item,
            srs_level: 0,
            success_count: 0,
            failure_count: 0,
            is_new: true,
        }
    }
}

/// One passage with its composed question session, as returned by the
/// reading-grouped composer entry point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingGroup {
    pub reading: ReadingContent,
    pub items: Vec<SessionItem>,
}
