//! Daily review scheduling.
//!
//! Unreviewed and reviewing words are always scheduled. Mastered words are
//! scheduled when their forgetting-curve interval has elapsed, and when fewer
//! than the daily floor are due the list is padded with a day-seeded draw of
//! the least-reviewed mastered words that are not yet due.

pub mod backfill;
pub mod intervals;

use crate::store::WordStore;
use crate::types::SchedulerConfig;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub use backfill::{day_rng, day_seed};
pub use intervals::{is_due, Buckets};

/// Words scheduled for one day. Derived state, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTaskSet {
    day: NaiveDate,
    tasks: Vec<String>,
    completed: HashSet<String>,
    backfilled: Vec<String>,
}

impl DailyTaskSet {
    /// The day this set was built for.
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Scheduled words in presentation order.
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn completed(&self) -> &HashSet<String> {
        &self.completed
    }

    /// Not-yet-due mastered words added by the backfill draw.
    pub fn backfilled(&self) -> &[String] {
        &self.backfilled
    }

    pub fn contains(&self, word: &str) -> bool {
        self.tasks.iter().any(|w| w == word)
    }

    pub fn is_completed(&self, word: &str) -> bool {
        self.completed.contains(word)
    }

    /// Mark a scheduled word as done. Words outside the set are ignored.
    pub fn mark_completed(&mut self, word: &str) -> bool {
        if !self.contains(word) {
            return false;
        }
        self.completed.insert(word.to_string())
    }

    pub(crate) fn unmark_completed(&mut self, word: &str) {
        self.completed.remove(word);
    }

    /// Scheduled words not yet graded, in task order.
    pub fn remaining(&self) -> impl Iterator<Item = &String> {
        self.tasks.iter().filter(|w| !self.completed.contains(*w))
    }

    /// `(done, total)` for today's progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.completed.len(), self.tasks.len())
    }
}

/// Builds [`DailyTaskSet`]s from a store.
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
}

impl ReviewScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build today's tasks with the day-seeded backfill draw and a thread-local
    /// shuffle.
    pub fn build_for_day(&self, store: &WordStore, today: NaiveDate) -> DailyTaskSet {
        self.build_daily_tasks(store, today, &mut day_rng(today), &mut rand::rng())
    }

    /// Build today's tasks.
    ///
    /// `backfill_rng` decides which not-due mastered words pad the list and
    /// should be seeded from `today` so membership is stable within a day.
    /// `shuffle_rng` only decides presentation order.
    pub fn build_daily_tasks<B, S>(
        &self,
        store: &WordStore,
        today: NaiveDate,
        backfill_rng: &mut B,
        shuffle_rng: &mut S,
    ) -> DailyTaskSet
    where
        B: Rng + ?Sized,
        S: Rng + ?Sized,
    {
        let Buckets {
            unreviewed,
            reviewing,
            mut mastered_due,
            mut mastered_not_due,
        } = intervals::partition(store, today, &self.config);

        let mut tasks = unreviewed;
        tasks.extend(reviewing);

        intervals::sort_by_mastery(&mut mastered_due, store);
        let due_count = mastered_due.len();
        tasks.extend(mastered_due);

        let floor = self.config.daily_mastered_floor;
        let backfilled = if due_count < floor {
            intervals::sort_by_mastery(&mut mastered_not_due, store);
            backfill::sample_backfill(
                &mastered_not_due,
                floor - due_count,
                floor,
                self.config.candidate_divisor,
                backfill_rng,
            )
        } else {
            Vec::new()
        };
        tasks.extend(backfilled.iter().cloned());

        let completed = tasks
            .iter()
            .filter(|w| {
                store
                    .get(w)
                    .is_some_and(|r| r.last_review_date.is_on(today))
            })
            .cloned()
            .collect();

        tasks.shuffle(shuffle_rng);

        DailyTaskSet {
            day: today,
            tasks,
            completed,
            backfilled,
        }
    }
}
