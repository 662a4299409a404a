//! Review session state machine.

use crate::algorithm::DailyTaskSet;
use crate::store::WordStore;
use crate::types::{Grade, WordRecord};
use chrono::NaiveDateTime;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Where the learner is within today's session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Presenting(String),
}

/// Walks a [`DailyTaskSet`], tracking the word currently shown.
#[derive(Debug, Clone)]
pub struct Session {
    tasks: DailyTaskSet,
    state: SessionState,
}

impl Session {
    pub fn new(tasks: DailyTaskSet) -> Self {
        Self {
            tasks,
            state: SessionState::Idle,
        }
    }

    /// Session over rebuilt `tasks` that keeps presenting `word` when the
    /// new set still has it open.
    pub fn resume(tasks: DailyTaskSet, word: Option<String>) -> Self {
        let state = match word {
            Some(word) if tasks.contains(&word) && !tasks.is_completed(&word) => {
                SessionState::Presenting(word)
            }
            _ => SessionState::Idle,
        };
        Self { tasks, state }
    }

    pub fn tasks(&self) -> &DailyTaskSet {
        &self.tasks
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&str> {
        match &self.state {
            SessionState::Presenting(word) => Some(word),
            SessionState::Idle => None,
        }
    }

    /// Words still to grade today that exist in `store`, in task order.
    pub fn remaining<'a>(&'a self, store: &'a WordStore) -> impl Iterator<Item = &'a String> {
        self.tasks.remaining().filter(|w| store.contains(w))
    }

    /// Draw the next word uniformly from what remains. Scheduled words that
    /// have since left the store are skipped. Goes idle when nothing remains.
    pub fn pick_next<R: Rng + ?Sized>(&mut self, store: &WordStore, rng: &mut R) -> Option<&str> {
        let remaining: Vec<&String> = self.remaining(store).collect();
        let picked = remaining.choose(rng).map(|w| w.to_string());
        self.state = match picked {
            Some(word) => SessionState::Presenting(word),
            None => SessionState::Idle,
        };
        self.current()
    }

    /// Record that `word` was graded today.
    pub(crate) fn complete(&mut self, word: &str) -> bool {
        if self.current() == Some(word) {
            self.state = SessionState::Idle;
        }
        self.tasks.mark_completed(word)
    }

    /// Undo [`Session::complete`] after a failed save.
    pub(crate) fn reopen(&mut self, word: &str, was_presenting: bool) {
        self.tasks.unmark_completed(word);
        if was_presenting {
            self.state = SessionState::Presenting(word.to_string());
        }
    }
}

/// Apply a grading decision to a record.
///
/// Both grades stamp the review time, so the word is not shown again today.
/// Only `Known` advances the mastery level.
pub fn apply_grade(record: &mut WordRecord, grade: Grade, now: NaiveDateTime) {
    if grade == Grade::Known {
        record.review_count += 1;
    }
    record.touch(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::ReviewScheduler;
    use crate::store::WordMap;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap()
    }

    fn store_of(words: &[&str]) -> WordStore {
        WordStore::from_map(
            words
                .iter()
                .map(|w| (w.to_string(), WordRecord::new(*w, "m", vec![])))
                .collect::<WordMap>(),
        )
    }

    fn session_for(store: &WordStore) -> Session {
        Session::new(ReviewScheduler::default().build_for_day(store, now().date()))
    }

    #[test]
    fn known_advances_mastery() {
        let mut record = WordRecord::new("w", "m", vec![]);
        record.review_count = 2;
        apply_grade(&mut record, Grade::Known, now());
        assert_eq!(record.review_count, 3);
        assert_eq!(record.last_review_at, Some(now()));
        assert!(record.last_review_date.is_on(now().date()));
        assert!(record.reviewed_today);
    }

    #[test]
    fn unknown_stamps_time_without_credit() {
        let mut record = WordRecord::new("w", "m", vec![]);
        record.review_count = 2;
        apply_grade(&mut record, Grade::Unknown, now());
        assert_eq!(record.review_count, 2);
        assert!(record.last_review_date.is_on(now().date()));
        assert!(record.reviewed_today);
    }

    #[test]
    fn pick_next_walks_until_idle() {
        let store = store_of(&["a", "b", "c"]);
        let mut session = session_for(&store);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = vec![];
        while let Some(word) = session.pick_next(&store, &mut rng).map(str::to_string) {
            assert_eq!(session.state(), &SessionState::Presenting(word.clone()));
            assert!(session.complete(&word));
            seen.push(word);
        }
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn pick_next_skips_words_removed_from_store() {
        let store = store_of(&["a", "b"]);
        let mut session = session_for(&store);
        let shrunk = store_of(&["b"]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(session.pick_next(&shrunk, &mut rng), Some("b"));
        }
    }

    #[test]
    fn completing_current_word_goes_idle() {
        let store = store_of(&["a"]);
        let mut session = session_for(&store);
        let mut rng = StdRng::seed_from_u64(1);
        session.pick_next(&store, &mut rng);
        session.complete("a");
        assert_eq!(session.current(), None);
        assert_eq!(session.pick_next(&store, &mut rng), None);
    }

    #[test]
    fn resume_keeps_word_only_while_scheduled() {
        let store = store_of(&["a", "b"]);
        let session = Session::resume(session_for(&store).tasks().clone(), Some("a".into()));
        assert_eq!(session.current(), Some("a"));

        let session = Session::resume(session_for(&store).tasks().clone(), Some("z".into()));
        assert_eq!(session.state(), &SessionState::Idle);

        let mut tasks = session_for(&store).tasks().clone();
        tasks.mark_completed("a");
        assert_eq!(Session::resume(tasks, Some("a".into())).current(), None);
    }

    #[test]
    fn reopen_restores_presenting_word() {
        let store = store_of(&["a"]);
        let mut session = session_for(&store);
        let mut rng = StdRng::seed_from_u64(1);
        session.pick_next(&store, &mut rng);
        session.complete("a");
        session.reopen("a", true);
        assert_eq!(session.current(), Some("a"));
        assert!(!session.tasks().is_completed("a"));
    }
}
