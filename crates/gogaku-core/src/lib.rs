pub mod config;
pub mod locks;
pub mod logging;
pub mod models;
pub mod services;
pub mod srs;
pub mod store;

pub use config::{FamilyScheduling, SchedulerConfig};
pub use models::{
    BktParams, GrammarPoint, ItemFamily, ItemPayload, JlptLevel, ProgressRecord, Question,
    QuestionWithReading, ReadingContent, ReadingGroup, SessionItem, Word,
};
pub use services::{ProgressError, ProgressService, SessionComposer, SessionError};
pub use store::memory::MemoryStore;
pub use store::{DueEntry, ItemCatalog, ProgressStore, StoreError};
