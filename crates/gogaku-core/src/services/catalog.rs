//! Content catalog queries: listings and parameterized search.
//!
//! Search operations require at least one parameter; an all-empty
//! filter is an input error, never an implicit list-everything.

use crate::models::{GrammarPoint, ItemFamily, JlptLevel, QuestionWithReading, Word};
use crate::store::{ItemCatalog, ProgressStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default)]
pub struct WordQuery {
    /// Exact kanji match.
    pub kanji: Option<String>,
    /// Exact hiragana match.
    pub hiragana: Option<String>,
    /// Case-insensitive substring over the english glosses.
    pub english: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
    pub level: Option<JlptLevel>,
    pub question_type: Option<String>,
    /// Kanji of a word the question must exercise.
    pub word: Option<String>,
    /// Name of a grammar point the question must exercise.
    pub grammar_point: Option<String>,
    /// Case-insensitive substring over the question text.
    pub question_text: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GrammarPointQuery {
    /// Exact name match.
    pub name: Option<String>,
    /// Case-insensitive substring over the title.
    pub title: Option<String>,
}

pub async fn find_words<S>(store: &S, query: &WordQuery) -> Result<Vec<Word>, CatalogError>
where
    S: ItemCatalog + ?Sized,
{
    if query.kanji.is_none() && query.hiragana.is_none() && query.english.is_none() {
        return Err(CatalogError::InvalidInput(
            "must provide kanji, hiragana, or english search term".to_string(),
        ));
    }

    let needle = query.english.as_ref().map(|e| e.to_lowercase());
    Ok(store
        .words(None)
        .await?
        .into_iter()
        .filter(|w| query.kanji.as_ref().map_or(true, |k| &w.kanji == k))
        .filter(|w| query.hiragana.as_ref().map_or(true, |h| &w.hiragana == h))
        .filter(|w| {
            needle.as_ref().map_or(true, |n| {
                w.english.iter().any(|gloss| gloss.to_lowercase().contains(n))
            })
        })
        .collect())
}

pub async fn find_questions<S>(
    store: &S,
    query: &QuestionQuery,
) -> Result<Vec<QuestionWithReading>, CatalogError>
where
    S: ItemCatalog + ?Sized,
{
    if query.level.is_none()
        && query.question_type.is_none()
        && query.word.is_none()
        && query.grammar_point.is_none()
        && query.question_text.is_none()
    {
        return Err(CatalogError::InvalidInput(
            "must provide at least one search parameter".to_string(),
        ));
    }

    let needle = query.question_text.as_ref().map(|t| t.to_lowercase());
    let questions = store
        .questions(query.level, query.question_type.as_deref())
        .await?;

    let mut out = Vec::new();
    for question in questions {
        if let Some(word) = &query.word {
            if !question.words.contains(word) {
                continue;
            }
        }
        if let Some(grammar) = &query.grammar_point {
            if !question.grammar_points.contains(grammar) {
                continue;
            }
        }
        if let Some(n) = &needle {
            if !question.question_text.to_lowercase().contains(n) {
                continue;
            }
        }
        let reading = match &question.reading_content_id {
            Some(rid) => store.reading_content(rid).await?,
            None => None,
        };
        out.push(QuestionWithReading { question, reading });
    }
    Ok(out)
}

pub async fn find_grammar_points<S>(
    store: &S,
    query: &GrammarPointQuery,
) -> Result<Vec<GrammarPoint>, CatalogError>
where
    S: ItemCatalog + ?Sized,
{
    if query.name.is_none() && query.title.is_none() {
        return Err(CatalogError::InvalidInput(
            "must provide name or title".to_string(),
        ));
    }

    let needle = query.title.as_ref().map(|t| t.to_lowercase());
    Ok(store
        .grammar_points()
        .await?
        .into_iter()
        .filter(|g| query.name.as_ref().map_or(true, |n| &g.name == n))
        .filter(|g| {
            needle
                .as_ref()
                .map_or(true, |n| g.title.to_lowercase().contains(n))
        })
        .collect())
}

/// Items of a family the learner has not answered yet; clients use this
/// to decide whether to offer a "learn new" entry point.
pub async fn unseen_count<S>(
    store: &S,
    user_id: &str,
    family: ItemFamily,
    level: Option<JlptLevel>,
) -> Result<usize, StoreError>
where
    S: ProgressStore + ?Sized,
{
    store.count_unseen(user_id, family, level).await
}
