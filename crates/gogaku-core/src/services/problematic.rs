//! Problematic-item ranking: items the learner keeps getting wrong.
//!
//! Only items with a progress record participate; an unseen item is not
//! "problematic", it is unseen. Progress numbers drive the filter and
//! the ordering but are not part of the returned projection.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{GrammarPoint, ItemFamily, ProgressRecord, Word};
use crate::store::{ItemCatalog, ProgressStore, StoreError};

/// Words where the learner's failures outnumber successes, ordered by
/// failure rate descending, kanji ascending on ties.
pub async fn problematic_words<S>(store: &S, user_id: &str) -> Result<Vec<Word>, StoreError>
where
    S: ProgressStore + ItemCatalog + ?Sized,
{
    let words = store.words(None).await?;
    let records = store.list_for_user(user_id, ItemFamily::Words).await?;
    let by_item: HashMap<&str, &ProgressRecord> =
        records.iter().map(|r| (r.item_id.as_str(), r)).collect();

    let mut ranked: Vec<(f64, Word)> = words
        .into_iter()
        .filter_map(|word| {
            let record = by_item.get(word.id.as_str())?;
            if record.failure_count > record.success_count {
                Some((record.failure_rate(), word))
            } else {
                None
            }
        })
        .collect();

    ranked.sort_by(|(rate_a, word_a), (rate_b, word_b)| {
        rate_b
            .partial_cmp(rate_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| word_a.kanji.cmp(&word_b.kanji))
    });

    Ok(ranked.into_iter().map(|(_, word)| word).collect())
}

/// Grammar points where failures outnumber successes, ordered by
/// failure rate descending, name ascending on ties.
pub async fn problematic_grammar_points<S>(
    store: &S,
    user_id: &str,
) -> Result<Vec<GrammarPoint>, StoreError>
where
    S: ProgressStore + ItemCatalog + ?Sized,
{
    let grammar_points = store.grammar_points().await?;
    let records = store
        .list_for_user(user_id, ItemFamily::GrammarPoints)
        .await?;
    let by_item: HashMap<&str, &ProgressRecord> =
        records.iter().map(|r| (r.item_id.as_str(), r)).collect();

    let mut ranked: Vec<(f64, GrammarPoint)> = grammar_points
        .into_iter()
        .filter_map(|grammar| {
            let record = by_item.get(grammar.id.as_str())?;
            if record.failure_count > record.success_count {
                Some((record.failure_rate(), grammar))
            } else {
                None
            }
        })
        .collect();

    ranked.sort_by(|(rate_a, gp_a), (rate_b, gp_b)| {
        rate_b
            .partial_cmp(rate_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| gp_a.name.cmp(&gp_b.name))
    });

    Ok(ranked.into_iter().map(|(_, grammar)| grammar).collect())
}
