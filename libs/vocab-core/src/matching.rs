//! Answer matching for typed meanings.
//!
//! A typed answer passes as soon as any [`MatchRule`] accepts it, checked in
//! declaration order.

use serde::{Deserialize, Serialize};

/// Separators that end the primary sense of a meaning, highest priority first.
pub const PRIMARY_SENSE_SEPARATORS: [char; 4] = ['；', '，', '、', ';'];

/// Which rule accepted an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// One normalized string contains the other.
    Substring,
    /// Substring test against the text before the first separator.
    PrimarySense,
    /// Some two-character slice of the meaning occurs in the answer.
    Bigram,
}

/// Result of checking a typed answer, with both sides normalized for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub is_correct: bool,
    pub rule: Option<MatchRule>,
    pub typed_normalized: String,
    pub reference_normalized: String,
}

/// Case- and whitespace-insensitive check of `user_text` against `reference`.
pub fn matches(user_text: &str, reference: &str) -> bool {
    judge(user_text, reference).is_some()
}

/// Same as [`matches`], reporting the first rule that accepted the answer.
pub fn judge(user_text: &str, reference: &str) -> Option<MatchRule> {
    let typed = normalize(user_text);
    let full = normalize(reference);

    if typed.is_empty() {
        return full.is_empty().then_some(MatchRule::Substring);
    }

    if overlaps(&typed, &full) {
        return Some(MatchRule::Substring);
    }

    if overlaps(&typed, &normalize(primary_sense(reference))) {
        return Some(MatchRule::PrimarySense);
    }

    if has_shared_bigram(&typed, &full) {
        return Some(MatchRule::Bigram);
    }

    None
}

/// Check an answer and keep the normalized forms for display.
pub fn compare_answers(user_text: &str, reference: &str) -> MatchResult {
    let rule = judge(user_text, reference);
    MatchResult {
        is_correct: rule.is_some(),
        rule,
        typed_normalized: normalize(user_text),
        reference_normalized: normalize(reference),
    }
}

/// Lowercase and drop every whitespace character.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Text before the first primary-sense separator (the whole text if none).
pub fn primary_sense(reference: &str) -> &str {
    reference
        .split(|c| PRIMARY_SENSE_SEPARATORS.contains(&c))
        .next()
        .unwrap_or(reference)
}

/// Substring test in either direction. An empty side never counts.
fn overlaps(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

fn has_shared_bigram(typed: &str, reference: &str) -> bool {
    if typed.chars().count() < 2 {
        return false;
    }
    let chars: Vec<char> = reference.chars().collect();
    chars
        .windows(2)
        .any(|pair| typed.contains(&pair.iter().collect::<String>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  A Shade\tof Blue "), "ashadeofblue");
        assert_eq!(normalize("清\u{3000}楚"), "清楚");
    }

    #[test]
    fn test_identical_answer_matches() {
        assert!(matches("clear", "clear"));
        assert!(matches("清楚的；明晰的", "清楚的；明晰的"));
    }

    #[test]
    fn test_case_and_whitespace_ignored() {
        assert_eq!(judge("Shade Of", "a shade of blue"), Some(MatchRule::Substring));
    }

    #[test]
    fn test_answer_containing_reference() {
        assert_eq!(judge("it means clear", "clear"), Some(MatchRule::Substring));
    }

    #[test]
    fn test_primary_sense_before_semicolon() {
        assert!(matches("blue color", "a shade of blue; color term"));
    }

    #[test]
    fn test_primary_sense_rule_reported() {
        assert_eq!(
            judge("xyz明亮的xyz", "明亮的，清晰的"),
            Some(MatchRule::PrimarySense)
        );
    }

    #[test]
    fn test_primary_sense_takes_earliest_separator() {
        assert_eq!(primary_sense("明亮的，清晰的；透明的"), "明亮的");
        assert_eq!(primary_sense("a; b，c"), "a");
        assert_eq!(primary_sense("no separator"), "no separator");
    }

    #[test]
    fn test_bigram_overlap() {
        assert_eq!(judge("楚的了", "清楚的"), Some(MatchRule::Bigram));
        assert_eq!(judge("abzz", "xaby"), Some(MatchRule::Bigram));
        assert_eq!(judge("xx楚的", "清楚明了"), None);
    }

    #[test]
    fn test_single_char_answer_skips_bigram_rule() {
        assert_eq!(judge("z", "xaby"), None);
        assert_eq!(judge("a", "xaby"), Some(MatchRule::Substring));
    }

    #[test]
    fn test_unrelated_answer_rejected() {
        assert!(!matches("dog", "猫"));
        assert!(!matches("xyz", "abc; def"));
    }

    #[test]
    fn test_empty_answer() {
        assert!(!matches("", "clear"));
        assert!(!matches("   ", "clear"));
        assert!(matches("", "  "));
    }

    #[test]
    fn test_empty_primary_sense_does_not_match_everything() {
        assert!(!matches("zzz", "；abc"));
    }

    #[test]
    fn test_compare_answers_reports_normalized_forms() {
        let result = compare_answers(" Blue Color ", "a shade of blue; color term");
        assert!(result.is_correct);
        // Neither sense contains "bluecolor"; the shared "bl" slice accepts it.
        assert_eq!(result.rule, Some(MatchRule::Bigram));
        assert_eq!(result.typed_normalized, "bluecolor");
        assert_eq!(result.reference_normalized, "ashadeofblue;colorterm");
    }
}
