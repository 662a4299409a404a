//! Review session commands.

use crate::db::date_utils;
use crate::lookup::DictionaryLookup;
use crate::state::AppState;
use serde::Serialize;
use vocab_core::types::{Example, Grade, MasteryStage};
use vocab_core::MatchRule;

use super::{lock_book, CommandError};

/// The word to present next, with today's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextWord {
    pub word: String,
    pub done: usize,
    pub total: usize,
}

/// Verdict on a typed answer, with the reference shown afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub rule: Option<MatchRule>,
    pub meaning: String,
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeResponse {
    pub review_count: u32,
    pub stage: MasteryStage,
}

/// Words still to review today.
pub fn due_today<L: DictionaryLookup>(state: &AppState<L>) -> Result<Vec<String>, CommandError> {
    let mut book = lock_book(state, "due_today")?;
    Ok(book.due_today(date_utils::today()))
}

/// Rebuild today's task list. Returns how many words it holds.
pub fn rebuild_tasks<L: DictionaryLookup>(state: &AppState<L>) -> Result<usize, CommandError> {
    let mut book = lock_book(state, "rebuild_tasks")?;
    let tasks = book.rebuild(date_utils::today());
    tracing::info!(
        tasks = tasks.tasks().len(),
        backfilled = tasks.backfilled().len(),
        "rebuilt daily tasks"
    );
    Ok(tasks.tasks().len())
}

/// Pick the next word to present. `None` means today's review is complete.
pub fn next_word<L: DictionaryLookup>(
    state: &AppState<L>,
) -> Result<Option<NextWord>, CommandError> {
    let mut book = lock_book(state, "next_word")?;
    let today = date_utils::today();
    let Some(word) = book.next_word(today, &mut rand::rng()) else {
        return Ok(None);
    };
    let (done, total) = book.daily_tasks(today).progress();
    Ok(Some(NextWord { word, done, total }))
}

/// Judge a typed answer against the stored meaning. Does not grade.
pub fn check_answer<L: DictionaryLookup>(
    word: &str,
    answer: &str,
    state: &AppState<L>,
) -> Result<AnswerCheck, CommandError> {
    let book = lock_book(state, "check_answer")?;
    let verdict = book
        .check_answer(word, answer)
        .map_err(|e| CommandError::new("check_answer", e))?;
    let record = book
        .get(word)
        .ok_or_else(|| CommandError::new("check_answer", format!("word not found: {word}")))?;
    Ok(AnswerCheck {
        is_correct: verdict.is_correct,
        rule: verdict.rule,
        meaning: record.meaning.clone(),
        examples: record.examples.clone(),
    })
}

/// Record whether the learner knew `word`.
pub fn grade_word<L: DictionaryLookup>(
    word: &str,
    known: bool,
    state: &AppState<L>,
) -> Result<GradeResponse, CommandError> {
    let mut book = lock_book(state, "grade_word")?;
    book.grade(word, Grade::from_known(known), date_utils::now())
        .map_err(|e| CommandError::new("grade_word", e))?;

    let threshold = book.config().mastered_threshold;
    let record = book
        .get(word)
        .ok_or_else(|| CommandError::new("grade_word", format!("word not found: {word}")))?;
    tracing::debug!(word, known, review_count = record.review_count, "graded");
    Ok(GradeResponse {
        review_count: record.review_count,
        stage: record.stage(threshold),
    })
}
