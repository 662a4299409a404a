//! In-memory word store and the persistence seam.

use crate::types::WordRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Words keyed by their exact spelling.
pub type WordMap = BTreeMap<String, WordRecord>;

/// Persistence collaborator for the word map.
///
/// `load` runs once at startup and must hand back fully upgraded records;
/// `save` runs synchronously after every mutation.
pub trait WordRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<WordMap, Self::Error>;
    fn save(&self, words: &WordMap) -> Result<(), Self::Error>;
}

/// Mapping of word to learning record. Keys are unique case-sensitively.
#[derive(Debug, Clone, Default)]
pub struct WordStore {
    words: WordMap,
}

impl WordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loaded map, stamping each record with its key.
    pub fn from_map(mut words: WordMap) -> Self {
        for (key, record) in words.iter_mut() {
            record.word.clone_from(key);
        }
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&WordRecord> {
        self.words.get(word)
    }

    pub(crate) fn get_mut(&mut self, word: &str) -> Option<&mut WordRecord> {
        self.words.get_mut(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Whether any key equals `word` ignoring case.
    pub fn contains_ignore_case(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.words.keys().any(|k| k.to_lowercase() == lower)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &WordRecord)> {
        self.words.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &WordRecord> {
        self.words.values()
    }

    pub fn as_map(&self) -> &WordMap {
        &self.words
    }

    /// Insert a new record under its own word. Returns false if the key exists.
    pub(crate) fn insert(&mut self, record: WordRecord) -> bool {
        if self.words.contains_key(&record.word) {
            return false;
        }
        self.words.insert(record.word.clone(), record);
        true
    }

    /// Put back a record regardless of whether the key exists.
    pub(crate) fn restore(&mut self, record: WordRecord) {
        self.words.insert(record.word.clone(), record);
    }

    pub(crate) fn remove(&mut self, word: &str) -> Option<WordRecord> {
        self.words.remove(word)
    }

    pub(crate) fn take_all(&mut self) -> WordMap {
        std::mem::take(&mut self.words)
    }

    pub(crate) fn replace_all(&mut self, words: WordMap) {
        self.words = words;
    }

    /// Recompute `reviewed_today` from the stored date; the flag may be stale
    /// when the calendar day has moved on since the last grading event.
    pub fn refresh_reviewed_today(&mut self, today: NaiveDate) {
        for record in self.words.values_mut() {
            record.reviewed_today = record.last_review_date.is_on(today);
        }
    }
}

/// Error returned by [`MemoryRepository`] when saves are switched off.
#[derive(Debug, thiserror::Error)]
#[error("save rejected by memory repository")]
pub struct SaveRejected;

/// Repository that keeps the last saved map in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    saved: Mutex<WordMap>,
    reject_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words(words: WordMap) -> Self {
        Self {
            saved: Mutex::new(words),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn reject_saves(&self, reject: bool) {
        self.reject_saves.store(reject, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> WordMap {
        self.saved.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl WordRepository for MemoryRepository {
    type Error = SaveRejected;

    fn load(&self) -> Result<WordMap, Self::Error> {
        Ok(self.snapshot())
    }

    fn save(&self, words: &WordMap) -> Result<(), Self::Error> {
        if self.reject_saves.load(Ordering::SeqCst) {
            return Err(SaveRejected);
        }
        if let Ok(mut saved) = self.saved.lock() {
            *saved = words.clone();
        }
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ReviewDate, WordRecord};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_map_stamps_keys() {
        let mut map = WordMap::new();
        map.insert("lucid".to_string(), WordRecord::new("", "clear", vec![]));
        let store = WordStore::from_map(map);
        assert_eq!(store.get("lucid").unwrap().word, "lucid");
    }

    #[test]
    fn keys_are_case_sensitive_but_lookup_can_ignore_case() {
        let mut store = WordStore::new();
        assert!(store.insert(WordRecord::new("Apple", "苹果", vec![])));
        assert!(!store.insert(WordRecord::new("Apple", "again", vec![])));
        assert!(store.insert(WordRecord::new("apple", "苹果", vec![])));
        assert!(store.contains_ignore_case("APPLE"));
        assert!(!store.contains("APPLE"));
    }

    #[test]
    fn refresh_reviewed_today_follows_stored_date() {
        let today = day(2024, 3, 2);
        let mut stale = WordRecord::new("stale", "", vec![]);
        stale.last_review_date = ReviewDate::On(day(2024, 3, 1));
        stale.reviewed_today = true;
        let mut fresh = WordRecord::new("fresh", "", vec![]);
        fresh.last_review_date = ReviewDate::On(today);

        let mut store = WordStore::new();
        store.insert(stale);
        store.insert(fresh);
        store.refresh_reviewed_today(today);

        assert!(!store.get("stale").unwrap().reviewed_today);
        assert!(store.get("fresh").unwrap().reviewed_today);
    }

    #[test]
    fn memory_repository_can_reject_saves() {
        let repo = MemoryRepository::new();
        repo.save(&WordMap::new()).unwrap();
        repo.reject_saves(true);
        assert!(repo.save(&WordMap::new()).is_err());
        assert_eq!(repo.save_count(), 1);
    }
}
