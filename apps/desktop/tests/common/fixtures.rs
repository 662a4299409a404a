//! Test fixtures.

use chrono::{Duration, Local};
use vocab_core::types::{Example, LookupResult, DATE_FORMAT};

/// Words the fake dictionary knows.
pub const DICTIONARY: &[(&str, &str, &str)] = &[
    ("lucid", "adj. 清楚的; 明晰的", "A lucid account."),
    ("vivid", "adj. 生动的", "Vivid colours."),
    ("apple", "n. 苹果", ""),
];

pub fn lookup(word: &str) -> LookupResult {
    DICTIONARY
        .iter()
        .find(|(w, _, _)| *w == word)
        .map(|(_, meaning, example)| LookupResult {
            meaning: meaning.to_string(),
            examples: if example.is_empty() {
                vec![]
            } else {
                vec![Example::new(*example)]
            },
        })
        .unwrap_or_default()
}

/// `YYYY-MM-DD` for `days` ago, local time.
pub fn days_ago(days: i64) -> String {
    (Local::now().date_naive() - Duration::days(days))
        .format(DATE_FORMAT)
        .to_string()
}

/// A version 2 data file with one record per `(word, review_count, days_ago)`.
pub fn data_file(records: &[(&str, u32, Option<i64>)]) -> String {
    let words: serde_json::Map<String, serde_json::Value> = records
        .iter()
        .map(|(word, count, ago)| {
            let date = ago.map(days_ago).unwrap_or_default();
            let last_review = if date.is_empty() {
                String::new()
            } else {
                format!("{date} 08:00")
            };
            (
                word.to_string(),
                serde_json::json!({
                    "meaning": format!("meaning of {word}"),
                    "examples": [],
                    "review_count": count,
                    "last_review": last_review,
                    "last_review_date": date,
                    "today_reviewed": false
                }),
            )
        })
        .collect();
    serde_json::json!({"version": 2, "words": words}).to_string()
}
