//! Model output cleanup: fence stripping → JSON decode → shape check.
//!
//! The three steps are separate functions so each one can be tested alone.
//! Model output is untrusted text; nothing here assumes the prompt was obeyed.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::gateway::models::{MatchResult, PersonalityQuestion};

const REQUIRED_QUESTION_KEYS: [&str; 3] = ["trait", "question", "options"];
const REQUIRED_MATCH_KEYS: [&str; 2] = ["score", "evaluation"];

lazy_static! {
    /// An opening ```json (plus one newline) at the start of a line, or a
    /// closing ``` at the end of a line.
    static ref CODE_FENCE: Regex = Regex::new(r"(?m)^```json\n?|```$").unwrap();
}

/// Removes a Markdown ```json fence wrapped around the model's answer.
pub fn strip_code_fence(text: &str) -> String {
    CODE_FENCE.replace_all(text.trim(), "").trim().to_string()
}

/// Parses cleaned text as JSON. On failure the text is kept for the caller.
pub fn decode_json(cleaned: &str) -> Result<Value, AppError> {
    serde_json::from_str(cleaned).map_err(|e| AppError::MalformedOutput {
        raw: cleaned.to_string(),
        json_error: e.to_string(),
    })
}

/// Checks that the decoded value is a list of objects, each carrying the keys
/// `trait`, `question` and `options` with `options` a list. The check is
/// key-level only: field values are not inspected.
pub fn validate_questions(value: Value, raw: &str) -> Result<Vec<PersonalityQuestion>, AppError> {
    let Value::Array(items) = value else {
        return Err(schema_violation(raw, "expected a JSON array of questions"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Some(object) = item.as_object() else {
                return Err(schema_violation(
                    raw,
                    format!("question {index} is not an object"),
                ));
            };

            if let Some(missing) = missing_key(object, &REQUIRED_QUESTION_KEYS) {
                return Err(schema_violation(
                    raw,
                    format!("question {index} is missing '{missing}'"),
                ));
            }

            if !object["options"].is_array() {
                return Err(schema_violation(
                    raw,
                    format!("question {index}: 'options' is not a list"),
                ));
            }

            from_value(item, raw, &format!("question {index}"))
        })
        .collect()
}

/// Checks that the decoded value is an object carrying `score` and
/// `evaluation`. Values are not inspected.
pub fn validate_match_result(value: Value, raw: &str) -> Result<MatchResult, AppError> {
    let Some(object) = value.as_object() else {
        return Err(schema_violation(raw, "expected a JSON object"));
    };

    if let Some(missing) = missing_key(object, &REQUIRED_MATCH_KEYS) {
        return Err(schema_violation(
            raw,
            format!("match result is missing '{missing}'"),
        ));
    }

    from_value(value, raw, "match result")
}

fn missing_key<'a>(object: &Map<String, Value>, keys: &[&'a str]) -> Option<&'a str> {
    keys.iter().copied().find(|key| !object.contains_key(*key))
}

fn from_value<T: DeserializeOwned>(value: Value, raw: &str, what: &str) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| schema_violation(raw, format!("{what}: {e}")))
}

fn schema_violation(raw: &str, reason: impl Into<String>) -> AppError {
    AppError::SchemaViolation {
        raw: raw.to_string(),
        reason: reason.into(),
    }
}
