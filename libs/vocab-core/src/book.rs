//! Word book: the store, its repository and today's session behind one API.
//!
//! Every mutation is saved before returning. When the save fails the
//! in-memory change is rolled back and the error is returned, so memory and
//! the durable copy never disagree once an operation has finished.

use crate::algorithm::{DailyTaskSet, ReviewScheduler};
use crate::error::{Result, VocabError};
use crate::import::{self, ParsedLines};
use crate::matching::{compare_answers, MatchResult};
use crate::session::{apply_grade, Session};
use crate::store::{WordRepository, WordStore};
use crate::types::{
    Example, Grade, LookupResult, MasteryStage, SchedulerConfig, Statistics, WordRecord,
    NO_DEFINITION,
};
use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;

/// Report from a `word,meaning` import.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportReport {
    pub added: Vec<(String, String)>,
    pub skipped: usize,
}

pub struct WordBook<R: WordRepository> {
    store: WordStore,
    repository: R,
    scheduler: ReviewScheduler,
    session: Option<Session>,
    /// Set when words arrived without dropping the session.
    stale: bool,
}

impl<R: WordRepository> WordBook<R> {
    /// Load the store from `repository`.
    pub fn open(repository: R, config: SchedulerConfig) -> Result<Self> {
        let words = repository
            .load()
            .map_err(|e| VocabError::persistence("load", e))?;
        Ok(Self {
            store: WordStore::from_map(words),
            repository,
            scheduler: ReviewScheduler::new(config),
            session: None,
            stale: false,
        })
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &SchedulerConfig {
        self.scheduler.config()
    }

    pub fn get(&self, word: &str) -> Option<&WordRecord> {
        self.store.get(word)
    }

    fn save(&self, operation: &'static str) -> Result<()> {
        self.repository
            .save(self.store.as_map())
            .map_err(|e| VocabError::persistence(operation, e))
    }

    fn invalidate(&mut self) {
        self.session = None;
        self.stale = false;
    }

    /// Mark today's tasks for a rebuild on next use. The word being
    /// presented stays current if the rebuilt set still schedules it.
    pub fn mark_tasks_stale(&mut self) {
        self.stale = true;
    }

    fn insert_saved(&mut self, record: WordRecord) -> Result<()> {
        let word = record.word.clone();
        if !self.store.insert(record) {
            return Err(VocabError::DuplicateWord(word));
        }
        if let Err(err) = self.save("add word") {
            self.store.remove(&word);
            return Err(err);
        }
        Ok(())
    }

    /// Add a word with a known meaning.
    pub fn add_word(&mut self, word: &str, meaning: &str, examples: Vec<Example>) -> Result<()> {
        let word = word.trim();
        if word.is_empty() {
            return Err(VocabError::EmptyWord);
        }
        self.insert_saved(WordRecord::new(word, meaning.trim(), examples))?;
        self.invalidate();
        Ok(())
    }

    /// Add a word from a dictionary lookup, substituting a placeholder for an
    /// empty meaning. Returns the stored meaning.
    ///
    /// Rejects any case variant of a stored word. Today's tasks are left
    /// alone; the word is scheduled after [`WordBook::mark_tasks_stale`] or
    /// the next rebuild.
    pub fn add_looked_up(&mut self, word: &str, result: LookupResult) -> Result<String> {
        let word = word.trim();
        if word.is_empty() {
            return Err(VocabError::EmptyWord);
        }
        if self.store.contains_ignore_case(word) {
            return Err(VocabError::DuplicateWord(word.to_string()));
        }
        let meaning = match result.meaning.trim() {
            "" => NO_DEFINITION,
            meaning => meaning,
        }
        .to_string();
        self.insert_saved(WordRecord::new(word, &meaning, result.examples))?;
        Ok(meaning)
    }

    /// Add `word,meaning` lines, skipping words already present ignoring case.
    pub fn import_lines(&mut self, text: &str) -> Result<ImportReport> {
        let ParsedLines { entries, skipped } = import::parse_word_meaning_lines(text, &self.store);
        if entries.is_empty() {
            return Ok(ImportReport { added: entries, skipped });
        }
        for (word, meaning) in &entries {
            self.store.insert(WordRecord::new(word.as_str(), meaning.as_str(), Vec::new()));
        }
        if let Err(err) = self.save("import") {
            for (word, _) in &entries {
                self.store.remove(word);
            }
            return Err(err);
        }
        self.invalidate();
        Ok(ImportReport { added: entries, skipped })
    }

    /// Candidate words in free text that are not yet in the store.
    pub fn candidate_words(&self, text: &str) -> Vec<String> {
        import::extract_candidate_words(text, &self.store)
    }

    pub fn export_text(&self) -> String {
        import::export_text(&self.store)
    }

    /// Delete one word. Returns whether it existed.
    pub fn delete_word(&mut self, word: &str) -> Result<bool> {
        Ok(self.delete_words(&[word])? == 1)
    }

    /// Delete several words. Returns how many existed.
    pub fn delete_words<S: AsRef<str>>(&mut self, words: &[S]) -> Result<usize> {
        let removed: Vec<WordRecord> = words
            .iter()
            .filter_map(|w| self.store.remove(w.as_ref()))
            .collect();
        if removed.is_empty() {
            return Ok(0);
        }
        if let Err(err) = self.save("delete") {
            for record in removed {
                self.store.restore(record);
            }
            return Err(err);
        }
        self.invalidate();
        Ok(removed.len())
    }

    /// Remove every word. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let previous = self.store.take_all();
        if let Err(err) = self.save("clear") {
            self.store.replace_all(previous);
            return Err(err);
        }
        self.invalidate();
        Ok(previous.len())
    }

    fn edit(&mut self, word: &str, change: impl FnOnce(&mut WordRecord)) -> Result<()> {
        let record = self
            .store
            .get_mut(word)
            .ok_or_else(|| VocabError::WordNotFound(word.to_string()))?;
        let before = record.clone();
        change(record);
        if let Err(err) = self.save("edit") {
            self.store.restore(before);
            return Err(err);
        }
        Ok(())
    }

    pub fn update_meaning(&mut self, word: &str, meaning: &str) -> Result<()> {
        let meaning = meaning.to_string();
        self.edit(word, |record| record.meaning = meaning)
    }

    pub fn update_examples(&mut self, word: &str, examples: Vec<Example>) -> Result<()> {
        self.edit(word, |record| record.examples = examples)
    }

    /// Force a rebuild of today's tasks.
    pub fn rebuild(&mut self, today: NaiveDate) -> &DailyTaskSet {
        self.invalidate();
        self.daily_tasks(today)
    }

    /// Today's task set, rebuilt if the store changed or the day moved on.
    pub fn daily_tasks(&mut self, today: NaiveDate) -> &DailyTaskSet {
        current_session(
            &mut self.session,
            &mut self.stale,
            &mut self.store,
            &self.scheduler,
            today,
        )
        .tasks()
    }

    /// Words still due today, in task order.
    pub fn due_today(&mut self, today: NaiveDate) -> Vec<String> {
        let session = current_session(
            &mut self.session,
            &mut self.stale,
            &mut self.store,
            &self.scheduler,
            today,
        );
        session.remaining(&self.store).cloned().collect()
    }

    /// Word currently being presented, if any.
    pub fn current_word(&self) -> Option<&str> {
        self.session.as_ref().and_then(Session::current)
    }

    /// Draw the next word to present. `None` means today's list is done.
    pub fn next_word<G: Rng + ?Sized>(&mut self, today: NaiveDate, rng: &mut G) -> Option<String> {
        let session = current_session(
            &mut self.session,
            &mut self.stale,
            &mut self.store,
            &self.scheduler,
            today,
        );
        session.pick_next(&self.store, rng).map(str::to_string)
    }

    /// Grade `word` at `now`. The word is not presented again today.
    pub fn grade(&mut self, word: &str, grade: Grade, now: NaiveDateTime) -> Result<()> {
        let record = self
            .store
            .get_mut(word)
            .ok_or_else(|| VocabError::WordNotFound(word.to_string()))?;
        let before = record.clone();
        apply_grade(record, grade, now);

        let was_presenting = self.current_word() == Some(word);
        let newly_completed = self
            .session
            .as_mut()
            .filter(|s| s.tasks().day() == now.date())
            .is_some_and(|s| s.complete(word));

        if let Err(err) = self.save("grade") {
            self.store.restore(before);
            if newly_completed {
                if let Some(session) = self.session.as_mut() {
                    session.reopen(word, was_presenting);
                }
            }
            return Err(err);
        }
        Ok(())
    }

    /// Check a typed answer against the stored meaning of `word`.
    pub fn check_answer(&self, word: &str, user_text: &str) -> Result<MatchResult> {
        let record = self
            .store
            .get(word)
            .ok_or_else(|| VocabError::WordNotFound(word.to_string()))?;
        Ok(compare_answers(user_text, &record.meaning))
    }

    pub fn statistics(&mut self, today: NaiveDate) -> Statistics {
        let threshold = self.config().mastered_threshold;
        let mut stats = Statistics {
            total: self.store.len(),
            ..Statistics::default()
        };
        for record in self.store.records() {
            match record.stage(threshold) {
                MasteryStage::Unreviewed => stats.unreviewed += 1,
                MasteryStage::Reviewing => stats.reviewing += 1,
                MasteryStage::Mastered => stats.mastered += 1,
            }
        }
        let (done, total) = self.daily_tasks(today).progress();
        stats.today_done = done;
        stats.today_total = total;
        stats
    }
}

/// Reuse the session built for `today`, or rebuild it from the store.
fn current_session<'a>(
    slot: &'a mut Option<Session>,
    stale: &mut bool,
    store: &mut WordStore,
    scheduler: &ReviewScheduler,
    today: NaiveDate,
) -> &'a mut Session {
    let session = match slot.take() {
        Some(session) if session.tasks().day() == today && !*stale => session,
        previous => {
            let presenting = previous
                .as_ref()
                .filter(|s| s.tasks().day() == today)
                .and_then(Session::current)
                .map(str::to_string);
            store.refresh_reviewed_today(today);
            Session::resume(scheduler.build_for_day(store, today), presenting)
        }
    };
    *stale = false;
    slot.insert(session)
}
