//! Commands exposed to the user interface.
//!
//! Each command takes the shared [`AppState`](crate::state::AppState), holds
//! the word book lock only for its own duration and reports failures as a
//! serializable [`CommandError`].

pub mod backup;
pub mod fetch;
pub mod stats;
pub mod study;
pub mod words;

use crate::state::AppState;
use crate::lookup::DictionaryLookup;
use crate::db::JsonFileRepository;
use std::sync::MutexGuard;
use vocab_core::WordBook;

pub use backup::run_daily_backup;
pub use fetch::{cancel_fetch, start_fetch, start_fetch_words};
pub use stats::get_statistics;
pub use study::{check_answer, due_today, grade_word, next_word, rebuild_tasks};
pub use words::{
    add_word, clear_words, delete_words, export_words, extract_candidates, get_word,
    import_lines, list_words, update_examples, update_meaning,
};

/// Failure of a command: which operation failed and why.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub operation: String,
    pub message: String,
}

impl CommandError {
    pub fn new(operation: &str, message: impl std::fmt::Display) -> Self {
        Self {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}

impl std::error::Error for CommandError {}

type BookGuard<'a> = MutexGuard<'a, WordBook<JsonFileRepository>>;

fn lock_book<'a, L: DictionaryLookup>(
    state: &'a AppState<L>,
    operation: &str,
) -> Result<BookGuard<'a>, CommandError> {
    state
        .book
        .lock()
        .map_err(|_| CommandError::new(operation, "word book lock poisoned"))
}
