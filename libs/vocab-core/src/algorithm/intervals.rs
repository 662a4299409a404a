//! Forgetting-curve due test and bucket partition.

use crate::store::WordStore;
use crate::types::{MasteryStage, ReviewDate, SchedulerConfig, WordRecord};
use chrono::NaiveDate;

/// Whether a mastered word is due on `today`.
///
/// Never-reviewed words are due. A stored date that does not parse is due
/// unless the config says otherwise.
pub fn is_due(record: &WordRecord, today: NaiveDate, config: &SchedulerConfig) -> bool {
    match &record.last_review_date {
        ReviewDate::Never => true,
        ReviewDate::Malformed(_) => config.malformed_date_is_due,
        ReviewDate::On(last) => {
            (today - *last).num_days() >= config.interval_for(record.review_count)
        }
    }
}

/// Words split by mastery and due state. Each list is in store order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buckets {
    pub unreviewed: Vec<String>,
    pub reviewing: Vec<String>,
    pub mastered_due: Vec<String>,
    pub mastered_not_due: Vec<String>,
}

pub fn partition(store: &WordStore, today: NaiveDate, config: &SchedulerConfig) -> Buckets {
    let mut buckets = Buckets::default();
    for (word, record) in store.iter() {
        let target = match record.stage(config.mastered_threshold) {
            MasteryStage::Unreviewed => &mut buckets.unreviewed,
            MasteryStage::Reviewing => &mut buckets.reviewing,
            MasteryStage::Mastered if is_due(record, today, config) => &mut buckets.mastered_due,
            MasteryStage::Mastered => &mut buckets.mastered_not_due,
        };
        target.push(word.clone());
    }
    buckets
}

/// Sort words by `(review_count, word)` ascending.
pub fn sort_by_mastery(words: &mut [String], store: &WordStore) {
    words.sort_by_cached_key(|w| (store.get(w).map_or(0, |r| r.review_count), w.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn mastered(word: &str, count: u32, days_ago: Option<i64>) -> WordRecord {
        let mut record = WordRecord::new(word, "", vec![]);
        record.review_count = count;
        if let Some(days) = days_ago {
            record.last_review_date = ReviewDate::On(today() - Duration::days(days));
        }
        record
    }

    #[test]
    fn due_exactly_at_interval_boundary() {
        let config = SchedulerConfig::default();
        for (count, interval) in [(3, 2), (4, 4), (5, 7), (6, 15), (7, 30), (12, 30)] {
            assert!(is_due(&mastered("w", count, Some(interval)), today(), &config));
            assert!(is_due(&mastered("w", count, Some(interval + 1)), today(), &config));
            assert!(!is_due(&mastered("w", count, Some(interval - 1)), today(), &config));
        }
    }

    #[test]
    fn never_reviewed_mastered_word_is_due() {
        assert!(is_due(&mastered("w", 5, None), today(), &SchedulerConfig::default()));
    }

    #[test]
    fn malformed_date_follows_config() {
        let mut record = mastered("w", 5, None);
        record.last_review_date = ReviewDate::Malformed("yesterday".to_string());
        let mut config = SchedulerConfig::default();
        assert!(is_due(&record, today(), &config));
        config.malformed_date_is_due = false;
        assert!(!is_due(&record, today(), &config));
    }

    #[test]
    fn partition_puts_each_word_in_one_bucket() {
        let store = WordStore::from_map(
            [
                mastered("new", 0, None),
                mastered("weak", 2, Some(0)),
                mastered("lucid", 6, Some(15)),
                mastered("solid", 7, Some(3)),
            ]
            .into_iter()
            .map(|r| (r.word.clone(), r))
            .collect(),
        );
        let buckets = partition(&store, today(), &SchedulerConfig::default());
        assert_eq!(buckets.unreviewed, vec!["new"]);
        assert_eq!(buckets.reviewing, vec!["weak"]);
        assert_eq!(buckets.mastered_due, vec!["lucid"]);
        assert_eq!(buckets.mastered_not_due, vec!["solid"]);
    }
}
