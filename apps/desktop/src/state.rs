//! Application state.

use crate::config::AppConfig;
use crate::db::JsonFileRepository;
use crate::lookup::{DictionaryLookup, HttpDictionary};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use vocab_core::types::SchedulerConfig;
use vocab_core::WordBook;

pub type SharedBook = Arc<Mutex<WordBook<JsonFileRepository>>>;

/// Global application state.
pub struct AppState<L: DictionaryLookup = HttpDictionary> {
    pub config: AppConfig,
    pub book: SharedBook,
    pub lookup: Arc<L>,
    /// Cancel token of the most recently started bulk fetch.
    pub fetch: Mutex<Option<Arc<AtomicBool>>>,
}

impl<L: DictionaryLookup> AppState<L> {
    /// Open the word file in `config.data_dir`, migrating it if needed.
    pub fn open(
        config: AppConfig,
        scheduler: SchedulerConfig,
        lookup: L,
    ) -> vocab_core::Result<Self> {
        let repository = JsonFileRepository::in_dir(&config.data_dir);
        let book = WordBook::open(repository, scheduler)?;
        tracing::info!(
            words = book.store().len(),
            path = %book.repository().path().display(),
            "word store opened"
        );
        Ok(Self {
            config,
            book: Arc::new(Mutex::new(book)),
            lookup: Arc::new(lookup),
            fetch: Mutex::new(None),
        })
    }
}
