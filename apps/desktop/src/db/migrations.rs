//! Versioned upgrades of the word data file.
//!
//! Version 1 files are a bare `{ word: record }` map. Version 2 wraps the map
//! in `{ "version": 2, "words": { ... } }` and guarantees every record carries
//! `last_review_date` and `today_reviewed`.

use serde_json::{Map, Value};
use vocab_core::store::WordMap;

use super::error::StorageError;

/// Version written by this build.
pub const CURRENT_VERSION: u32 = 2;

type Migration = fn(&mut Map<String, Value>);

/// `MIGRATIONS[n]` upgrades version `n + 1` to `n + 2`.
const MIGRATIONS: &[Migration] = &[backfill_review_date];

/// Word map decoded from a data file, with the version it was stored at.
#[derive(Debug)]
pub struct Upgraded {
    pub words: WordMap,
    pub from_version: u32,
}

impl Upgraded {
    pub fn was_migrated(&self) -> bool {
        self.from_version < CURRENT_VERSION
    }
}

/// Split a parsed data file into its version and word map.
fn unwrap_envelope(value: Value) -> Result<(u32, Map<String, Value>), StorageError> {
    let Value::Object(mut root) = value else {
        return Err(StorageError::InvalidData(
            "data file must contain a JSON object".to_string(),
        ));
    };

    let is_envelope = root.get("version").is_some_and(Value::is_u64)
        && root.get("words").is_some_and(Value::is_object);
    if !is_envelope {
        return Ok((1, root));
    }

    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| StorageError::InvalidData("bad version number".to_string()))?;
    match root.remove("words") {
        Some(Value::Object(words)) => Ok((version, words)),
        _ => Err(StorageError::InvalidData("missing words map".to_string())),
    }
}

/// Bring a parsed data file up to [`CURRENT_VERSION`].
pub fn upgrade(value: Value) -> Result<Upgraded, StorageError> {
    let (from_version, mut words) = unwrap_envelope(value)?;
    if from_version == 0 {
        return Err(StorageError::InvalidData("version 0 is not valid".to_string()));
    }
    if from_version > CURRENT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }

    for migration in &MIGRATIONS[(from_version - 1) as usize..] {
        migration(&mut words);
    }

    let mut words: WordMap = serde_json::from_value(Value::Object(words))?;
    for (key, record) in words.iter_mut() {
        record.word = key.clone();
    }
    Ok(Upgraded {
        words,
        from_version,
    })
}

/// 1 -> 2: derive `last_review_date` from the `last_review` timestamp and
/// default `today_reviewed` to false.
fn backfill_review_date(words: &mut Map<String, Value>) {
    for record in words.values_mut() {
        let Value::Object(fields) = record else {
            continue;
        };
        if !fields.contains_key("last_review_date") {
            let last_review = fields
                .get("last_review")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let date = if last_review.chars().count() >= 10 {
                last_review.chars().take(10).collect()
            } else {
                String::new()
            };
            fields.insert("last_review_date".to_string(), Value::String(date));
        }
        fields
            .entry("today_reviewed")
            .or_insert(Value::Bool(false));
    }
}
