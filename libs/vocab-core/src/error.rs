//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using VocabError.
pub type Result<T> = std::result::Result<T, VocabError>;

/// Errors surfaced by word book operations.
#[derive(Debug, Error)]
pub enum VocabError {
    #[error("word not found: {0}")]
    WordNotFound(String),

    #[error("word already exists: {0}")]
    DuplicateWord(String),

    #[error("word is empty")]
    EmptyWord,

    #[error("{operation} failed to persist: {message}")]
    Persistence {
        operation: &'static str,
        message: String,
    },
}

impl VocabError {
    /// Wrap a repository error for the operation that triggered the save.
    pub fn persistence(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Persistence {
            operation,
            message: err.to_string(),
        }
    }
}
