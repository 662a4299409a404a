//! Online dictionary lookup.
//!
//! Sources are tried in order and each one only fills what is still missing:
//! Youdao's JSON API, Youdao suggest, the Free Dictionary API and Tatoeba.
//! A failing source contributes nothing; a lookup never returns an error.

use reqwest::{Client, Url};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use vocab_core::types::{Example, LookupResult};

/// Examples kept per word.
pub const MAX_EXAMPLES: usize = 3;

const YOUDAO_URL: &str = "https://dict.youdao.com/jsonapi";
const YOUDAO_SUGGEST_URL: &str = "https://dict.youdao.com/suggest";
const FREE_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
const TATOEBA_URL: &str = "https://tatoeba.org/en/api_v0/search";
const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend error: {status}")]
    Backend { status: u16 },
}

/// Resolves a word to a meaning and example sentences.
pub trait DictionaryLookup: Send + Sync {
    fn lookup(&self, word: &str) -> impl Future<Output = LookupResult> + Send;
}

/// [`DictionaryLookup`] over public HTTP dictionaries.
#[derive(Clone)]
pub struct HttpDictionary {
    client: Client,
}

impl HttpDictionary {
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, LookupError> {
        let resp = self.client.get(url).query(query).send().await?;
        if !resp.status().is_success() {
            return Err(LookupError::Backend {
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    async fn source(&self, name: &str, url: &str, query: &[(&str, &str)]) -> Option<Value> {
        match self.fetch_json(url, query).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(source = name, error = %e, "dictionary source failed");
                None
            }
        }
    }
}

impl DictionaryLookup for HttpDictionary {
    async fn lookup(&self, word: &str) -> LookupResult {
        let mut result = LookupResult::empty();

        if let Some(data) = self.source("youdao", YOUDAO_URL, &[("q", word)]).await {
            let parsed = parse_youdao(&data);
            result.meaning = parsed.meaning;
            result.examples = parsed.examples;
        }

        if result.meaning.is_empty() {
            let query = [("num", "1"), ("doctype", "json"), ("q", word)];
            if let Some(data) = self.source("youdao-suggest", YOUDAO_SUGGEST_URL, &query).await {
                if let Some(meaning) = parse_youdao_suggest(&data) {
                    result.meaning = meaning;
                }
            }
        }

        if result.meaning.is_empty() || result.examples.is_empty() {
            let url = free_dictionary_url(word);
            let data = match &url {
                Some(url) => self.source("dictionaryapi", url.as_str(), &[]).await,
                None => None,
            };
            if let Some(data) = data {
                let parsed = parse_free_dictionary(&data);
                if result.meaning.is_empty() {
                    result.meaning = parsed.meaning;
                }
                merge_examples(&mut result.examples, parsed.examples);
            }
        }

        if result.examples.len() < MAX_EXAMPLES {
            let query = [("from", "eng"), ("to", "zho"), ("query", word)];
            if let Some(data) = self.source("tatoeba", TATOEBA_URL, &query).await {
                merge_examples(&mut result.examples, parse_tatoeba(&data));
            }
        }

        result
    }
}

/// Entry URL with `word` percent-encoded as the last path segment.
fn free_dictionary_url(word: &str) -> Option<Url> {
    let mut url = Url::parse(FREE_DICTIONARY_URL).ok()?;
    url.path_segments_mut().ok()?.push(word);
    Some(url)
}

fn merge_examples(into: &mut Vec<Example>, more: Vec<Example>) {
    let room = MAX_EXAMPLES.saturating_sub(into.len());
    into.extend(more.into_iter().take(room));
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

fn array_at<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Youdao `jsonapi`: senses from `ec.word[0].trs[*].tr[*].l.i[0]` joined by
/// `; `, English sentences from the bilingual corpus.
pub fn parse_youdao(data: &Value) -> LookupResult {
    let meaning = array_at(data, "/ec/word/0/trs")
        .iter()
        .flat_map(|tr| array_at(tr, "/tr"))
        .filter_map(|t| str_at(t, "/l/i/0"))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    let examples = array_at(data, "/blng/blng_sents_part/sentence-pair")
        .iter()
        .take(MAX_EXAMPLES)
        .filter_map(|pair| str_at(pair, "/sentence"))
        .filter(|s| !s.is_empty())
        .map(Example::new)
        .collect();

    LookupResult { meaning, examples }
}

/// Youdao `suggest`: `data.entries[0].explain` when `result.code` is 200.
pub fn parse_youdao_suggest(data: &Value) -> Option<String> {
    if data.pointer("/result/code").and_then(Value::as_i64) != Some(200) {
        return None;
    }
    str_at(data, "/data/entries/0/explain")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Free Dictionary API: first definition, then example sentences across all
/// senses.
pub fn parse_free_dictionary(data: &Value) -> LookupResult {
    let meanings = array_at(data, "/0/meanings");
    let meaning = meanings
        .first()
        .and_then(|m| str_at(m, "/definitions/0/definition"))
        .unwrap_or_default()
        .to_string();

    let examples = meanings
        .iter()
        .flat_map(|m| array_at(m, "/definitions"))
        .filter_map(|d| str_at(d, "/example"))
        .filter(|s| !s.is_empty())
        .take(MAX_EXAMPLES)
        .map(Example::new)
        .collect();

    LookupResult { meaning, examples }
}

/// Tatoeba search: short English sentences from the first five results.
pub fn parse_tatoeba(data: &Value) -> Vec<Example> {
    array_at(data, "/results")
        .iter()
        .take(5)
        .filter_map(|item| str_at(item, "/text"))
        .filter(|s| !s.is_empty() && s.chars().count() < 200)
        .take(MAX_EXAMPLES)
        .map(Example::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn texts(examples: &[Example]) -> Vec<&str> {
        examples.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_youdao_senses_and_sentences() {
        let data = json!({
            "ec": {"word": [{"trs": [
                {"tr": [{"l": {"i": ["adj. 清楚的"]}}]},
                {"tr": [{"l": {"i": ["明晰的"]}}, {"l": {}}]}
            ]}]},
            "blng": {"blng_sents_part": {"sentence-pair": [
                {"sentence": "One.", "sentence-translation": "一。"},
                {"sentence": ""},
                {"sentence": "Three."},
                {"sentence": "Four."}
            ]}}
        });
        let parsed = parse_youdao(&data);
        assert_eq!(parsed.meaning, "adj. 清楚的; 明晰的");
        assert_eq!(texts(&parsed.examples), vec!["One.", "Three."]);
        assert!(parsed.examples.iter().all(|e| e.translation.is_empty()));
    }

    #[test]
    fn test_youdao_without_ec_is_empty() {
        assert!(parse_youdao(&json!({"input": "zzz"})).is_empty());
    }

    #[test]
    fn test_suggest_requires_ok_code() {
        let ok = json!({"result": {"code": 200}, "data": {"entries": [{"explain": "n. 苹果"}]}});
        assert_eq!(parse_youdao_suggest(&ok).as_deref(), Some("n. 苹果"));

        let bad = json!({"result": {"code": 404}, "data": {"entries": [{"explain": "n. 苹果"}]}});
        assert_eq!(parse_youdao_suggest(&bad), None);
        assert_eq!(parse_youdao_suggest(&json!({"result": {"code": 200}})), None);
    }

    #[test]
    fn test_free_dictionary_first_definition_and_examples() {
        let data = json!([{
            "meanings": [
                {"definitions": [
                    {"definition": "Expressed clearly.", "example": "a lucid explanation"},
                    {"definition": "Bright.", "example": "lucid skies"}
                ]},
                {"definitions": [
                    {"definition": "x", "example": "a lucid moment"},
                    {"definition": "y", "example": "a fourth one"}
                ]}
            ]
        }]);
        let parsed = parse_free_dictionary(&data);
        assert_eq!(parsed.meaning, "Expressed clearly.");
        assert_eq!(
            texts(&parsed.examples),
            vec!["a lucid explanation", "lucid skies", "a lucid moment"]
        );
    }

    #[test]
    fn test_free_dictionary_not_found_shape() {
        let data = json!({"title": "No Definitions Found"});
        assert!(parse_free_dictionary(&data).is_empty());
    }

    #[test]
    fn test_tatoeba_skips_long_sentences() {
        let long = "x".repeat(250);
        let data = json!({"results": [
            {"text": long},
            {"text": "Short one."},
            {"text": ""},
            {"text": "Another."}
        ]});
        assert_eq!(texts(&parse_tatoeba(&data)), vec!["Short one.", "Another."]);
    }

    #[test]
    fn test_free_dictionary_url_encodes_word() {
        let url = free_dictionary_url("next of kin").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/next%20of%20kin"
        );
    }

    #[test]
    fn test_merge_respects_cap() {
        let mut examples = vec![Example::new("a"), Example::new("b")];
        merge_examples(&mut examples, vec![Example::new("c"), Example::new("d")]);
        assert_eq!(texts(&examples), vec!["a", "b", "c"]);
    }
}
