//! Core vocabulary library used by the desktop application.
//!
//! Provides:
//! - Word records and the keyed store with a pluggable repository
//! - Daily review scheduling (forgetting-curve intervals, day-seeded backfill)
//! - The review session and grading
//! - Typed-answer matching against stored meanings
//! - Text import and export

pub mod algorithm;
pub mod book;
pub mod error;
pub mod import;
pub mod matching;
pub mod session;
pub mod store;
pub mod types;

pub use algorithm::{DailyTaskSet, ReviewScheduler};
pub use book::{ImportReport, WordBook};
pub use error::{Result, VocabError};
pub use import::{extract_candidate_words, parse_example_lines, parse_word_meaning_lines};
pub use matching::{compare_answers, matches, MatchResult, MatchRule};
pub use session::{Session, SessionState};
pub use store::{MemoryRepository, WordMap, WordRepository, WordStore};
pub use types::{
    Example, Grade, LookupResult, MasteryStage, ReviewDate, SchedulerConfig, Statistics,
    WordRecord, NO_DEFINITION,
};
