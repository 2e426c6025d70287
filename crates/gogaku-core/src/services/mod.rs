pub mod catalog;
pub mod problematic;
pub mod progress;
pub mod session;
pub mod stats;

pub use catalog::{
    find_grammar_points, find_questions, find_words, unseen_count, CatalogError,
    GrammarPointQuery, QuestionQuery, WordQuery,
};
pub use problematic::{problematic_grammar_points, problematic_words};
pub use progress::{ProgressError, ProgressService};
pub use session::{SessionComposer, SessionError};
pub use stats::{question_stats, QuestionStats, QuestionTypeStats};
