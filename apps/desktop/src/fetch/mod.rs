//! Background bulk lookup of new words.
//!
//! Words are looked up one at a time on a tokio task. The word book lock is
//! only taken to check for and store each word, never across a lookup.
//! Cancellation is checked before each word; a lookup already in flight
//! finishes and its result is kept. Added words join today's tasks once the
//! fetch ends, without interrupting the word under review.

use crate::lookup::DictionaryLookup;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use vocab_core::{VocabError, WordBook, WordRepository};

/// Progress reported by a running fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FetchEvent {
    /// About to handle word `current` of `total` (1-based).
    Progress {
        current: usize,
        total: usize,
        word: String,
    },
    Finished(FetchSummary),
}

/// Outcome of a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    pub added: usize,
    /// `(word, stored meaning)` for every word added, in input order.
    pub results: Vec<(String, String)>,
    pub cancelled: bool,
}

/// Handle to a running fetch task.
pub struct FetchHandle {
    cancel_token: Arc<AtomicBool>,
    events: mpsc::UnboundedReceiver<FetchEvent>,
    join_handle: JoinHandle<FetchSummary>,
}

impl FetchHandle {
    /// Stop before the next word.
    pub fn cancel(&self) {
        self.cancel_token.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.load(Ordering::Relaxed)
    }

    /// Token that cancels this fetch, for holders that do not own the handle.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        self.cancel_token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Next event, or `None` once the task has finished and all events were read.
    pub async fn next_event(&mut self) -> Option<FetchEvent> {
        self.events.recv().await
    }

    /// Wait for the task and return its summary.
    pub async fn wait(self) -> Result<FetchSummary, JoinError> {
        self.join_handle.await
    }
}

/// Look up and add `words` to `book` in the background.
pub fn spawn_fetch<R, L>(
    book: Arc<Mutex<WordBook<R>>>,
    lookup: Arc<L>,
    words: Vec<String>,
) -> FetchHandle
where
    R: WordRepository + Send + 'static,
    L: DictionaryLookup + 'static,
{
    let cancel_token = Arc::new(AtomicBool::new(false));
    let (tx, events) = mpsc::unbounded_channel();
    let token = cancel_token.clone();
    let join_handle =
        tokio::spawn(async move { run_fetch(&book, lookup.as_ref(), words, &token, &tx).await });

    FetchHandle {
        cancel_token,
        events,
        join_handle,
    }
}

async fn run_fetch<R, L>(
    book: &Mutex<WordBook<R>>,
    lookup: &L,
    words: Vec<String>,
    cancel: &AtomicBool,
    events: &mpsc::UnboundedSender<FetchEvent>,
) -> FetchSummary
where
    R: WordRepository,
    L: DictionaryLookup,
{
    let total = words.len();
    let mut summary = FetchSummary::default();
    tracing::info!(total, "starting bulk lookup");

    for (i, word) in words.into_iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            summary.cancelled = true;
            break;
        }
        // The receiver may be gone; the fetch still runs to completion.
        let _ = events.send(FetchEvent::Progress {
            current: i + 1,
            total,
            word: word.clone(),
        });

        let present = match book.lock() {
            Ok(book) => book.store().contains_ignore_case(&word),
            Err(_) => {
                tracing::error!("word book lock poisoned, stopping bulk lookup");
                break;
            }
        };
        if present {
            tracing::debug!(word = %word, "already in store, skipping");
            continue;
        }

        let result = lookup.lookup(&word).await;

        let stored = match book.lock() {
            Ok(mut book) => book.add_looked_up(&word, result),
            Err(_) => {
                tracing::error!("word book lock poisoned, stopping bulk lookup");
                break;
            }
        };
        match stored {
            Ok(meaning) => summary.results.push((word, meaning)),
            Err(VocabError::DuplicateWord(_)) => {
                tracing::debug!(word = %word, "added elsewhere during lookup");
            }
            Err(e) => tracing::warn!(word = %word, error = %e, "could not store looked-up word"),
        }
    }

    summary.added = summary.results.len();
    if summary.added > 0 {
        match book.lock() {
            Ok(mut book) => book.mark_tasks_stale(),
            Err(_) => tracing::error!("word book lock poisoned, tasks not refreshed"),
        }
    }
    tracing::info!(
        added = summary.added,
        cancelled = summary.cancelled,
        "bulk lookup finished"
    );
    let _ = events.send(FetchEvent::Finished(summary.clone()));
    summary
}
