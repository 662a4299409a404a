//! Statistics commands.

use crate::db::date_utils;
use crate::lookup::DictionaryLookup;
use crate::state::AppState;
use vocab_core::types::Statistics;

use super::{lock_book, CommandError};

/// Totals per mastery stage and today's progress.
pub fn get_statistics<L: DictionaryLookup>(
    state: &AppState<L>,
) -> Result<Statistics, CommandError> {
    let mut book = lock_book(state, "get_statistics")?;
    Ok(book.statistics(date_utils::today()))
}
