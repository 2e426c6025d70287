//! Problematic-item ranking, per-learner statistics, and catalog
//! search.

mod common;

use gogaku_core::services::{
    find_grammar_points, find_questions, find_words, problematic_grammar_points,
    problematic_words, question_stats, unseen_count, CatalogError, GrammarPointQuery,
    QuestionQuery, WordQuery,
};
use gogaku_core::{ItemFamily, JlptLevel};

use common::{put_record, seeded_store};

#[tokio::test]
async fn problematic_words_filter_and_order() {
    let store = seeded_store();
    // w1: 0.8 failure rate, w2: 0.6, w3: mostly right, w5: 50/50 tie
    put_record(&store, "u1", ItemFamily::Words, "w1", 0, 1, 4, true);
    put_record(&store, "u1", ItemFamily::Words, "w2", 0, 2, 3, true);
    put_record(&store, "u1", ItemFamily::Words, "w3", 4, 5, 1, false);
    put_record(&store, "u1", ItemFamily::Words, "w5", 1, 2, 2, true);

    let ranked = problematic_words(store.as_ref(), "u1").await.unwrap();

    let ids: Vec<&str> = ranked.iter().map(|w| w.id.as_str()).collect();
    // w3 (succeeding), w5 (failures == successes), and every word
    // without a record are all excluded
    assert_eq!(ids, vec!["w1", "w2"]);
}

#[tokio::test]
async fn problematic_words_tie_breaks_on_kanji() {
    let store = seeded_store();
    // 犬 (w1) and 猫 (w2) both at 0.8; 犬 U+72AC < 猫 U+732B
    put_record(&store, "u1", ItemFamily::Words, "w1", 0, 1, 4, true);
    put_record(&store, "u1", ItemFamily::Words, "w2", 0, 1, 4, true);

    let ranked = problematic_words(store.as_ref(), "u1").await.unwrap();

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].kanji, "犬");
    assert_eq!(ranked[1].kanji, "猫");
}

#[tokio::test]
async fn problematic_grammar_points_rank_by_failure_rate() {
    let store = seeded_store();
    put_record(&store, "u1", ItemFamily::GrammarPoints, "g1", 0, 2, 3, true);
    put_record(&store, "u1", ItemFamily::GrammarPoints, "g2", 0, 1, 4, true);
    put_record(&store, "u1", ItemFamily::GrammarPoints, "g3", 3, 6, 1, false);

    let ranked = problematic_grammar_points(store.as_ref(), "u1")
        .await
        .unwrap();

    let names: Vec<&str> = ranked.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["particle-wo", "particle-ga"]);
}

#[tokio::test]
async fn question_stats_aggregate_overall_and_by_type() {
    let store = seeded_store();
    put_record(&store, "u1", ItemFamily::Questions, "q7", 5, 3, 1, true);
    put_record(&store, "u1", ItemFamily::Questions, "q8", 0, 1, 3, false);
    put_record(&store, "u1", ItemFamily::Questions, "q1", 2, 2, 2, true);

    let stats = question_stats(store.as_ref(), "u1").await.unwrap();

    assert_eq!(stats.total_attempted, 3);
    assert_eq!(stats.currently_due, 2);
    assert!((stats.overall_accuracy - 0.5).abs() < 1e-9); // 6 of 12
    assert!((stats.overall_mastery_rate - 1.0 / 3.0).abs() < 1e-9); // only q7 at level >= 5
    assert!((stats.average_srs_level - 7.0 / 3.0).abs() < 1e-9);

    assert_eq!(stats.by_type.len(), 2);
    let reading = stats
        .by_type
        .iter()
        .find(|b| b.question_type == "reading")
        .unwrap();
    assert_eq!(reading.attempted, 1);
    assert_eq!(reading.due, 1);
    assert!((reading.accuracy - 0.5).abs() < 1e-9);

    let vocabulary = stats
        .by_type
        .iter()
        .find(|b| b.question_type == "vocabulary")
        .unwrap();
    assert_eq!(vocabulary.attempted, 2);
    assert_eq!(vocabulary.questions_at_level0, 1);
    assert_eq!(vocabulary.total_success, 4);
    assert_eq!(vocabulary.total_failure, 4);
}

#[tokio::test]
async fn question_stats_for_fresh_learner_are_zeroed() {
    let store = seeded_store();

    let stats = question_stats(store.as_ref(), "nobody").await.unwrap();

    assert_eq!(stats.total_attempted, 0);
    assert_eq!(stats.currently_due, 0);
    assert_eq!(stats.overall_accuracy, 0.0);
    assert!(stats.by_type.is_empty());
}

#[tokio::test]
async fn find_words_requires_a_parameter() {
    let store = seeded_store();

    let result = find_words(store.as_ref(), &WordQuery::default()).await;
    assert!(matches!(result, Err(CatalogError::InvalidInput(_))));
}

#[tokio::test]
async fn find_words_matches_kanji_and_english() {
    let store = seeded_store();

    let by_kanji = find_words(
        store.as_ref(),
        &WordQuery {
            kanji: Some("犬".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_kanji.len(), 1);
    assert_eq!(by_kanji[0].id, "w1");

    // glosses are seeded as "<id>-gloss"; substring match is
    // case-insensitive
    let by_english = find_words(
        store.as_ref(),
        &WordQuery {
            english: Some("W3-GLOSS".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_english.len(), 1);
    assert_eq!(by_english[0].id, "w3");
}

#[tokio::test]
async fn find_questions_by_reference_and_text() {
    let store = seeded_store();

    let result = find_questions(store.as_ref(), &QuestionQuery::default()).await;
    assert!(matches!(result, Err(CatalogError::InvalidInput(_))));

    let by_word = find_questions(
        store.as_ref(),
        &QuestionQuery {
            word: Some("犬".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_word.len(), 1);
    assert_eq!(by_word[0].question.id, "q7");

    let by_text = find_questions(
        store.as_ref(),
        &QuestionQuery {
            question_text: Some("QUESTION Q1".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_text.len(), 1);
    // the matching question comes back with its passage joined
    assert!(by_text[0].reading.is_some());

    let by_grammar = find_questions(
        store.as_ref(),
        &QuestionQuery {
            grammar_point: Some("particle-ga".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_grammar.len(), 1);
    assert_eq!(by_grammar[0].question.id, "q7");
}

#[tokio::test]
async fn find_grammar_points_by_name_or_title() {
    let store = seeded_store();

    let result = find_grammar_points(store.as_ref(), &GrammarPointQuery::default()).await;
    assert!(matches!(result, Err(CatalogError::InvalidInput(_))));

    let by_name = find_grammar_points(
        store.as_ref(),
        &GrammarPointQuery {
            name: Some("te-form".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, "g3");

    let by_title = find_grammar_points(
        store.as_ref(),
        &GrammarPointQuery {
            title: Some("PARTICLE".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_title.len(), 2);
}

#[tokio::test]
async fn unseen_count_tracks_remaining_new_items() {
    let store = seeded_store();
    assert_eq!(
        unseen_count(store.as_ref(), "u1", ItemFamily::Words, None)
            .await
            .unwrap(),
        10
    );

    put_record(&store, "u1", ItemFamily::Words, "w1", 1, 1, 0, false);
    assert_eq!(
        unseen_count(store.as_ref(), "u1", ItemFamily::Words, None)
            .await
            .unwrap(),
        9
    );
    assert_eq!(
        unseen_count(store.as_ref(), "u1", ItemFamily::Words, Some(JlptLevel::N4))
            .await
            .unwrap(),
        2
    );
}
