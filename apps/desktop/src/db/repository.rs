//! JSON file repository for the word store.

use crate::db::error::StorageError;
use crate::db::migrations::{self, CURRENT_VERSION};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use vocab_core::store::{WordMap, WordRepository};

type Result<T> = std::result::Result<T, StorageError>;

/// File name of the word store inside the data directory.
pub const DATA_FILE: &str = "words_data.json";

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    words: &'a WordMap,
}

/// Stores the whole word map as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Repository for [`DATA_FILE`] inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(DATA_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, words: &WordMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(&Envelope {
            version: CURRENT_VERSION,
            words,
        })?;

        // Readers never see a partially written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl WordRepository for JsonFileRepository {
    type Error = StorageError;

    fn load(&self) -> Result<WordMap> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no data file yet, starting empty");
            return Ok(WordMap::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        let upgraded = migrations::upgrade(serde_json::from_str(&raw)?)?;
        if upgraded.was_migrated() {
            tracing::info!(
                from = upgraded.from_version,
                to = CURRENT_VERSION,
                "migrated data file"
            );
            self.write(&upgraded.words)?;
        }
        tracing::debug!(words = upgraded.words.len(), "loaded word store");
        Ok(upgraded.words)
    }

    fn save(&self, words: &WordMap) -> Result<()> {
        self.write(words)?;
        tracing::debug!(words = words.len(), "saved word store");
        Ok(())
    }
}
