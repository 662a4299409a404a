//! Core types for the vocabulary trainer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Format of the stored review timestamp (minute precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format of the stored review date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Meaning stored when a dictionary lookup returns nothing.
pub const NO_DEFINITION: &str = "(no definition found)";

/// Example sentence attached to a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    #[serde(rename = "en")]
    pub text: String,
    /// Kept for file compatibility; not used by scheduling or matching.
    #[serde(rename = "cn", default)]
    pub translation: String,
}

impl Example {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translation: String::new(),
        }
    }
}

/// Calendar date of the most recent grading event, as it was stored.
///
/// Stored values that are not `YYYY-MM-DD` dates are kept verbatim so the
/// scheduler can decide how to treat them instead of losing them at load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReviewDate {
    #[default]
    Never,
    On(NaiveDate),
    Malformed(String),
}

impl ReviewDate {
    /// Parse a stored date string. Empty means never reviewed.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Never;
        }
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Self::On(date),
            Err(_) => Self::Malformed(raw.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::On(date) => Some(*date),
            _ => None,
        }
    }

    /// True only for a well-formed date equal to `day`.
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date() == Some(day)
    }
}

impl fmt::Display for ReviewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => Ok(()),
            Self::On(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::Malformed(raw) => f.write_str(raw),
        }
    }
}

impl From<NaiveDate> for ReviewDate {
    fn from(date: NaiveDate) -> Self {
        Self::On(date)
    }
}

impl Serialize for ReviewDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReviewDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Self::parse(&s)).unwrap_or_default())
    }
}

/// Serde adapter for the `last_review` timestamp: empty string for none,
/// unparseable values read back as none.
mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.collect_str(&ts.format(TIMESTAMP_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .ok())
    }
}

/// Learning record for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Store key. Not written to the record body; the map key carries it.
    #[serde(default, skip_serializing)]
    pub word: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Mastery level. Only a `Known` grade advances it.
    #[serde(default)]
    pub review_count: u32,
    #[serde(rename = "last_review", default, with = "timestamp_format")]
    pub last_review_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_review_date: ReviewDate,
    #[serde(rename = "today_reviewed", default)]
    pub reviewed_today: bool,
}

impl WordRecord {
    /// Create a never-reviewed record.
    pub fn new(word: impl Into<String>, meaning: impl Into<String>, examples: Vec<Example>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            examples,
            review_count: 0,
            last_review_at: None,
            last_review_date: ReviewDate::Never,
            reviewed_today: false,
        }
    }

    /// Stamp a grading event at `now`, keeping the date in step with the timestamp.
    pub fn touch(&mut self, now: NaiveDateTime) {
        self.last_review_at = Some(now);
        self.last_review_date = ReviewDate::On(now.date());
        self.reviewed_today = true;
    }

    pub fn stage(&self, mastered_threshold: u32) -> MasteryStage {
        MasteryStage::of(self.review_count, mastered_threshold)
    }
}

/// Grading decision for the word under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Known,
    Unknown,
}

impl Grade {
    pub fn from_known(known: bool) -> Self {
        if known { Self::Known } else { Self::Unknown }
    }
}

/// Bucket a word falls into by mastery level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryStage {
    Unreviewed,
    Reviewing,
    Mastered,
}

impl MasteryStage {
    pub fn of(review_count: u32, mastered_threshold: u32) -> Self {
        if review_count == 0 {
            Self::Unreviewed
        } else if review_count < mastered_threshold {
            Self::Reviewing
        } else {
            Self::Mastered
        }
    }
}

/// Result handed back by a dictionary lookup. Failures arrive as empty results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub meaning: String,
    pub examples: Vec<Example>,
}

impl LookupResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.meaning.trim().is_empty() && self.examples.is_empty()
    }
}

/// Scheduler tuning. Defaults reproduce the forgetting-curve table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Required days since last review, keyed by review count.
    pub intervals: BTreeMap<u32, i64>,
    /// Interval for review counts missing from `intervals`.
    pub default_interval_days: i64,
    /// Review count at which a word counts as mastered.
    pub mastered_threshold: u32,
    /// Mastered words aimed for per day when few are due.
    pub daily_mastered_floor: usize,
    /// Backfill candidates are the first `len / candidate_divisor` not-due words
    /// (never fewer than the floor).
    pub candidate_divisor: usize,
    /// Whether an unparseable stored date makes a word due.
    pub malformed_date_is_due: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            intervals: BTreeMap::from([(3, 2), (4, 4), (5, 7), (6, 15)]),
            default_interval_days: 30,
            mastered_threshold: 3,
            daily_mastered_floor: 10,
            candidate_divisor: 3,
            malformed_date_is_due: true,
        }
    }
}

impl SchedulerConfig {
    /// Required interval in days for a mastered word at `review_count`.
    pub fn interval_for(&self, review_count: u32) -> i64 {
        self.intervals
            .get(&review_count)
            .copied()
            .unwrap_or(self.default_interval_days)
    }
}

/// Counts shown on the statistics view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub unreviewed: usize,
    pub reviewing: usize,
    pub mastered: usize,
    pub today_done: usize,
    pub today_total: usize,
}
