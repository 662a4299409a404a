//! Bulk lookup commands.

use crate::fetch::{spawn_fetch, FetchHandle};
use crate::lookup::DictionaryLookup;
use crate::state::AppState;
use std::sync::atomic::Ordering;

use super::{lock_book, CommandError};

/// Extract new words from `text` and look them up in the background.
///
/// Must be called from within a tokio runtime. Returns the candidate list and
/// the handle of the running fetch.
pub fn start_fetch<L: DictionaryLookup + 'static>(
    text: &str,
    state: &AppState<L>,
) -> Result<(Vec<String>, FetchHandle), CommandError> {
    let words = lock_book(state, "start_fetch")?.candidate_words(text);
    let handle = start_fetch_words(words.clone(), state)?;
    Ok((words, handle))
}

/// Look up `words` in the background, replacing any previous cancel token.
pub fn start_fetch_words<L: DictionaryLookup + 'static>(
    words: Vec<String>,
    state: &AppState<L>,
) -> Result<FetchHandle, CommandError> {
    let mut slot = state
        .fetch
        .lock()
        .map_err(|_| CommandError::new("start_fetch", "fetch state lock poisoned"))?;
    let handle = spawn_fetch(state.book.clone(), state.lookup.clone(), words);
    *slot = Some(handle.cancel_token());
    Ok(handle)
}

/// Ask the running fetch to stop before its next word. Returns whether a
/// fetch had been started.
pub fn cancel_fetch<L: DictionaryLookup>(state: &AppState<L>) -> Result<bool, CommandError> {
    let slot = state
        .fetch
        .lock()
        .map_err(|_| CommandError::new("cancel_fetch", "fetch state lock poisoned"))?;
    match slot.as_ref() {
        Some(token) => {
            token.store(true, Ordering::Relaxed);
            tracing::info!("bulk lookup cancel requested");
            Ok(true)
        }
        None => Ok(false),
    }
}
