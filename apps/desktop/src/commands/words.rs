//! Word list commands.

use crate::lookup::DictionaryLookup;
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use vocab_core::import::{format_example_lines, parse_example_lines};
use vocab_core::types::{MasteryStage, WordRecord, TIMESTAMP_FORMAT};
use vocab_core::ImportReport;

use super::{lock_book, CommandError};

#[derive(Debug, Deserialize)]
pub struct AddWordRequest {
    pub word: String,
    pub meaning: String,
    /// Example sentences, one per line.
    #[serde(default)]
    pub examples: String,
}

/// One row of the word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordRow {
    pub word: String,
    pub meaning: String,
    pub review_count: u32,
    /// `YYYY-MM-DD HH:MM`, empty when never reviewed.
    pub last_review: String,
    pub stage: MasteryStage,
}

impl WordRow {
    fn from_record(record: &WordRecord, mastered_threshold: u32) -> Self {
        Self {
            word: record.word.clone(),
            meaning: record.meaning.clone(),
            review_count: record.review_count,
            last_review: record
                .last_review_at
                .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
            stage: record.stage(mastered_threshold),
        }
    }
}

/// Full record for the edit view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordDetail {
    pub row: WordRow,
    /// Examples as numbered lines, or the empty-list placeholder.
    pub examples: String,
}

/// Add a word typed in by the user.
pub fn add_word<L: DictionaryLookup>(
    request: AddWordRequest,
    state: &AppState<L>,
) -> Result<(), CommandError> {
    let mut book = lock_book(state, "add_word")?;
    book.add_word(
        &request.word,
        &request.meaning,
        parse_example_lines(&request.examples),
    )
    .map_err(|e| CommandError::new("add_word", e))
}

/// All words in key order.
pub fn list_words<L: DictionaryLookup>(state: &AppState<L>) -> Result<Vec<WordRow>, CommandError> {
    let book = lock_book(state, "list_words")?;
    let threshold = book.config().mastered_threshold;
    Ok(book
        .store()
        .records()
        .map(|record| WordRow::from_record(record, threshold))
        .collect())
}

pub fn get_word<L: DictionaryLookup>(
    word: &str,
    state: &AppState<L>,
) -> Result<WordDetail, CommandError> {
    let book = lock_book(state, "get_word")?;
    let threshold = book.config().mastered_threshold;
    let record = book
        .get(word)
        .ok_or_else(|| CommandError::new("get_word", format!("word not found: {word}")))?;
    Ok(WordDetail {
        row: WordRow::from_record(record, threshold),
        examples: format_example_lines(&record.examples),
    })
}

/// Delete the given words. Returns how many existed.
pub fn delete_words<L: DictionaryLookup>(
    words: &[String],
    state: &AppState<L>,
) -> Result<usize, CommandError> {
    let mut book = lock_book(state, "delete_words")?;
    book.delete_words(words)
        .map_err(|e| CommandError::new("delete_words", e))
}

/// Remove every word. Returns how many were removed.
pub fn clear_words<L: DictionaryLookup>(state: &AppState<L>) -> Result<usize, CommandError> {
    let mut book = lock_book(state, "clear_words")?;
    let removed = book
        .clear()
        .map_err(|e| CommandError::new("clear_words", e))?;
    tracing::info!(removed, "cleared word store");
    Ok(removed)
}

/// Import `word,meaning` lines.
pub fn import_lines<L: DictionaryLookup>(
    text: &str,
    state: &AppState<L>,
) -> Result<ImportReport, CommandError> {
    let mut book = lock_book(state, "import_lines")?;
    let report = book
        .import_lines(text)
        .map_err(|e| CommandError::new("import_lines", e))?;
    tracing::info!(
        added = report.added.len(),
        skipped = report.skipped,
        "imported word lines"
    );
    Ok(report)
}

/// New words and phrases found in free text, for confirmation before a fetch.
pub fn extract_candidates<L: DictionaryLookup>(
    text: &str,
    state: &AppState<L>,
) -> Result<Vec<String>, CommandError> {
    let book = lock_book(state, "extract_candidates")?;
    Ok(book.candidate_words(text))
}

/// The whole store as `word,meaning` text.
pub fn export_words<L: DictionaryLookup>(state: &AppState<L>) -> Result<String, CommandError> {
    let book = lock_book(state, "export_words")?;
    Ok(book.export_text())
}

pub fn update_meaning<L: DictionaryLookup>(
    word: &str,
    meaning: &str,
    state: &AppState<L>,
) -> Result<(), CommandError> {
    let mut book = lock_book(state, "update_meaning")?;
    book.update_meaning(word, meaning)
        .map_err(|e| CommandError::new("update_meaning", e))
}

/// Replace a word's examples from edited text, one sentence per line.
pub fn update_examples<L: DictionaryLookup>(
    word: &str,
    text: &str,
    state: &AppState<L>,
) -> Result<(), CommandError> {
    let mut book = lock_book(state, "update_examples")?;
    book.update_examples(word, parse_example_lines(text))
        .map_err(|e| CommandError::new("update_examples", e))
}
