#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use gogaku_core::{
    BktParams, GrammarPoint, ItemFamily, JlptLevel, MemoryStore, ProgressRecord, Question,
    ReadingContent, Word,
};

pub fn init_tracing() {
    gogaku_core::logging::init_tracing("warn");
}

pub fn word(id: &str, kanji: &str, level: JlptLevel) -> Word {
    Word {
        id: id.to_string(),
        kanji: kanji.to_string(),
        hiragana: format!("{kanji}-kana"),
        english: vec![format!("{id}-gloss")],
        level,
        word_type: "noun".to_string(),
        bkt: BktParams::default(),
    }
}

pub fn grammar_point(id: &str, name: &str, level: JlptLevel) -> GrammarPoint {
    GrammarPoint {
        id: id.to_string(),
        name: name.to_string(),
        title: format!("{name} title"),
        explanation: String::new(),
        structure: String::new(),
        examples: vec![],
        level,
        bkt: BktParams::default(),
    }
}

pub fn reading(id: &str, level: JlptLevel) -> ReadingContent {
    ReadingContent {
        id: id.to_string(),
        content: format!("passage {id}"),
        content_type: "passage".to_string(),
        question_type: "reading".to_string(),
        level,
    }
}

pub fn question(
    id: &str,
    level: JlptLevel,
    question_type: &str,
    reading_content_id: Option<&str>,
) -> Question {
    Question {
        id: id.to_string(),
        question_text: format!("question {id}?"),
        answers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer: 0,
        level,
        question_type: question_type.to_string(),
        reading_content_id: reading_content_id.map(str::to_string),
        words: vec![],
        grammar_points: vec![],
    }
}

/// Ten words, four grammar points, two passages with three questions
/// each, plus two standalone questions. q7 fans out to 犬/猫 and
/// particle-ga.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();

    let kanji = ["犬", "猫", "鳥", "魚", "本", "水", "火", "山", "川", "空"];
    for (i, k) in kanji.iter().enumerate() {
        let level = if i < 8 { JlptLevel::N5 } else { JlptLevel::N4 };
        store.add_word(word(&format!("w{}", i + 1), k, level));
    }

    store.add_grammar_point(grammar_point("g1", "particle-ga", JlptLevel::N5));
    store.add_grammar_point(grammar_point("g2", "particle-wo", JlptLevel::N5));
    store.add_grammar_point(grammar_point("g3", "te-form", JlptLevel::N5));
    store.add_grammar_point(grammar_point("g4", "masu-form", JlptLevel::N4));

    store.add_reading(reading("r1", JlptLevel::N5));
    store.add_reading(reading("r2", JlptLevel::N5));
    for i in 1..=3 {
        store.add_question(question(&format!("q{i}"), JlptLevel::N5, "reading", Some("r1")));
    }
    for i in 4..=6 {
        store.add_question(question(&format!("q{i}"), JlptLevel::N5, "reading", Some("r2")));
    }

    let mut q7 = question("q7", JlptLevel::N5, "vocabulary", None);
    q7.words = vec!["犬".to_string(), "猫".to_string()];
    q7.grammar_points = vec!["particle-ga".to_string()];
    store.add_question(q7);
    store.add_question(question("q8", JlptLevel::N5, "vocabulary", None));

    Arc::new(store)
}

/// Seed a progress record with explicit counters and due-state.
pub fn put_record(
    store: &MemoryStore,
    user_id: &str,
    family: ItemFamily,
    item_id: &str,
    srs_level: i64,
    success: i64,
    failure: i64,
    due: bool,
) -> ProgressRecord {
    let now = Utc::now();
    let mut record = ProgressRecord::new(user_id, item_id, family, now, None);
    record.srs_level = srs_level;
    record.success_count = success;
    record.failure_count = failure;
    record.last_reviewed = Some(now - Duration::hours(1));
    record.next_review = if due {
        now - Duration::minutes(5)
    } else {
        now + Duration::hours(6)
    };
    store.put_progress(record.clone());
    record
}
