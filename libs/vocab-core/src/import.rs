//! Text import and export.
//!
//! Two input shapes are accepted:
//! - free text, from which candidate words and phrases are extracted and later
//!   filled in by a dictionary lookup
//! - `word,meaning` lines
//!
//! ```text
//! apple, 苹果
//! next of kin; take care of | lucid
//! ```

use crate::store::WordStore;
use crate::types::Example;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Header line written by [`export_text`].
pub const EXPORT_HEADER: &str = "word,meaning";

/// Placeholder shown in place of an empty example list.
pub const NO_EXAMPLES: &str = "(no examples)";

static DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;，；\t、/|／｜]+").expect("delimiter pattern"));
static PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(?:\s+[A-Za-z]+)+$").expect("phrase pattern"));
static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]+(?:[-'][A-Za-z]+)*").expect("word pattern"));
static NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("numbering pattern"));

/// Tokens that are column headings or labels rather than vocabulary.
const STOP_WORDS: &[&str] = &[
    "单词",
    "word",
    "words",
    "词汇",
    "英语",
    "english",
    "vocabulary",
    "详细含义",
    "含义",
    "意思",
    "meaning",
    "definition",
];

fn is_stop_word(token: &str) -> bool {
    let lower = token.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// Case-insensitive de-duplication against the store and the current batch.
struct Batch<'a> {
    store: &'a WordStore,
    seen: HashSet<String>,
    words: Vec<String>,
}

impl<'a> Batch<'a> {
    fn new(store: &'a WordStore) -> Self {
        Self {
            store,
            seen: HashSet::new(),
            words: Vec::new(),
        }
    }

    fn is_known(&self, token: &str) -> bool {
        self.seen.contains(&token.to_lowercase()) || self.store.contains_ignore_case(token)
    }

    fn push(&mut self, token: &str) -> bool {
        if !self.seen.insert(token.to_lowercase()) {
            return false;
        }
        self.words.push(token.to_string());
        true
    }
}

/// Extract distinct new words and phrases from free text.
///
/// Each line is split on comma, semicolon, tab, slash, pipe and their
/// full-width forms. A token made of two or more alphabetic runs separated by
/// spaces is kept whole as a phrase; anything else yields its alphabetic runs
/// (inner hyphens and apostrophes allowed). Stop words, one-letter tokens and
/// words already in the store (ignoring case) are dropped. The result holds
/// each word once, ignoring case, in first-seen order.
pub fn extract_candidate_words(raw_text: &str, store: &WordStore) -> Vec<String> {
    let text = raw_text.replace("\r\n", "\n").replace('\r', "\n");
    let mut batch = Batch::new(store);

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        for part in DELIMITERS.split(line).map(str::trim).filter(|p| !p.is_empty()) {
            if PHRASE.is_match(part) {
                if part.chars().count() >= 3 && !is_stop_word(part) && !batch.is_known(part) {
                    batch.push(part);
                }
                continue;
            }

            for found in WORD.find_iter(part) {
                let word = found.as_str().trim_matches(|c| c == '-' || c == '\'');
                if word.chars().count() < 2
                    || word.chars().all(|c| c.is_ascii_digit())
                    || is_stop_word(word)
                    || batch.is_known(word)
                {
                    continue;
                }
                batch.push(word);
            }
        }
    }

    batch.words
}

/// Outcome of parsing `word,meaning` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLines {
    /// New `(word, meaning)` pairs in input order.
    pub entries: Vec<(String, String)>,
    /// Lines naming a word the store or batch already has (ignoring case).
    pub skipped: usize,
}

/// Parse `word,meaning` lines, splitting each on its first comma.
///
/// Lines without a comma, header lines and lines with an empty word are
/// ignored.
pub fn parse_word_meaning_lines(text: &str, store: &WordStore) -> ParsedLines {
    let mut batch = Batch::new(store);
    let mut parsed = ParsedLines::default();

    for line in text.trim().lines() {
        let Some((word, meaning)) = line.split_once(',') else {
            continue;
        };
        let word = word.trim();
        if word.is_empty() || word == "单词" || word.eq_ignore_ascii_case("word") {
            continue;
        }
        if batch.is_known(word) {
            parsed.skipped += 1;
            continue;
        }
        batch.push(word);
        parsed
            .entries
            .push((word.to_string(), meaning.trim().to_string()));
    }

    parsed
}

/// Render the store as `word,meaning` lines under [`EXPORT_HEADER`].
pub fn export_text(store: &WordStore) -> String {
    let mut lines = vec![EXPORT_HEADER.to_string()];
    lines.extend(
        store
            .iter()
            .map(|(word, record)| format!("{},{}", word, record.meaning)),
    );
    lines.join("\n")
}

/// Parse edited example text: one sentence per line, leading `N.` removed.
pub fn parse_example_lines(text: &str) -> Vec<Example> {
    let text = text.trim();
    if text.is_empty() || text == NO_EXAMPLES {
        return Vec::new();
    }
    text.lines()
        .map(|line| NUMBERING.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .map(Example::new)
        .collect()
}

/// Render examples as numbered lines, the inverse of [`parse_example_lines`].
pub fn format_example_lines(examples: &[Example]) -> String {
    if examples.is_empty() {
        return NO_EXAMPLES.to_string();
    }
    examples
        .iter()
        .enumerate()
        .map(|(i, ex)| format!("{}. {}", i + 1, ex.text))
        .collect::<Vec<_>>()
        .join("\n")
}
