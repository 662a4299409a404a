//! Common test utilities for integration tests.
//!
//! Every test gets its own temporary data directory and an in-process
//! dictionary, so nothing touches the network or the real data directory.

pub mod fixtures;

use std::path::Path;
use tempfile::TempDir;
use vocab_core::types::{LookupResult, SchedulerConfig};
use word_review_lib::config::AppConfig;
use word_review_lib::lookup::DictionaryLookup;
use word_review_lib::state::AppState;

/// Dictionary backed by [`fixtures::DICTIONARY`].
pub struct FakeLookup;

impl DictionaryLookup for FakeLookup {
    async fn lookup(&self, word: &str) -> LookupResult {
        fixtures::lookup(word)
    }
}

/// Test context owning the data directory and the application state.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState<FakeLookup>,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let state = Self::open_state(dir.path());
        Self { dir, state }
    }

    /// Context over a data directory seeded with `words_data.json` content.
    pub fn with_data_file(content: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("words_data.json"), content)
            .expect("Failed to write data file");
        let state = Self::open_state(dir.path());
        Self { dir, state }
    }

    fn open_state(dir: &Path) -> AppState<FakeLookup> {
        let config = AppConfig::with_data_dir(dir);
        AppState::open(config, SchedulerConfig::default(), FakeLookup)
            .expect("Failed to open app state")
    }

    /// Re-open the same directory, as a restart would.
    pub fn reopen(&self) -> AppState<FakeLookup> {
        Self::open_state(self.dir.path())
    }

    pub fn data_file(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.dir.path().join("words_data.json"))
            .expect("Failed to read data file");
        serde_json::from_str(&raw).expect("Data file is not JSON")
    }
}
