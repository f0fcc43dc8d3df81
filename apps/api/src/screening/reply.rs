//! Defensive interpretation of free-form model replies.
//!
//! The provider returns arbitrary nested JSON; nothing upstream validates
//! it. Everything here is an explicit chain of optional lookups with a
//! named fallback at each step, so the exact degradation order is visible
//! in the code rather than hidden behind silent `Option` suppression.
//!
//! Two distinct sentinel scores exist and must never be collapsed:
//! `SCORE_MISSING` (0) when a structurally valid reply lacks the `score`
//! field, and `SCORE_FALLBACK` (5) when the whole reply is unparsable.

use serde_json::Value;

use crate::models::screening::Question;

/// Sentinel for a valid score object whose `score` field is absent.
pub const SCORE_MISSING: i64 = 0;
/// Neutral sentinel for a reply that could not be parsed at all.
pub const SCORE_FALLBACK: i64 = 5;
/// How much of the raw reply survives as the fallback rationale.
pub const FALLBACK_RATIONALE_CHARS: usize = 200;

/// Pulls the text payload out of a raw model response.
///
/// Navigates `candidates[0].content.text`; if the expected shape is absent
/// at any level, the entire raw response is stringified instead so the
/// parse ladders downstream still get something to chew on.
pub fn candidate_text(raw: &Value) -> String {
    raw.get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|first| first.get("content"))
        .and_then(|content| content.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}

/// Parse ladder for a question-generation reply.
///
/// - JSON array  → one `Question` per element, order preserved
/// - JSON object → a one-element list wrapping it
/// - JSON scalar → one record with id "q1" and the stringified value
/// - not JSON    → one record `{id: "q1", question: <trimmed text>, area: "general"}`
pub fn parse_questions_reply(text: &str) -> Vec<Question> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| value_to_question(item, i))
            .collect(),
        Ok(obj @ Value::Object(_)) => vec![value_to_question(&obj, 0)],
        Ok(other) => vec![Question {
            id: "q1".to_string(),
            question: stringify(&other),
            area: None,
        }],
        Err(_) => vec![Question {
            id: "q1".to_string(),
            question: text.trim().to_string(),
            area: Some("general".to_string()),
        }],
    }
}

/// Maps one reply element to a `Question`. The model's own `id` wins when
/// present; otherwise a 1-based positional tag is synthesized.
fn value_to_question(value: &Value, index: usize) -> Question {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("q{}", index + 1));
    let question = match value.get("question") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => stringify(value),
    };
    let area = value.get("area").and_then(Value::as_str).map(str::to_string);
    Question { id, question, area }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse ladder for a scoring reply. Returns `(score, rationale)`.
///
/// A structurally valid object with no `score` field yields `SCORE_MISSING`;
/// anything unparsable (bad JSON, non-object, uncoercible score value)
/// yields `SCORE_FALLBACK` with the head of the raw text as the rationale.
/// The score is never clamped to a range.
pub fn parse_score_reply(text: &str) -> (i64, String) {
    match try_parse_score(text) {
        Some(pair) => pair,
        None => (
            SCORE_FALLBACK,
            text.chars().take(FALLBACK_RATIONALE_CHARS).collect(),
        ),
    }
}

fn try_parse_score(text: &str) -> Option<(i64, String)> {
    let parsed: Value = serde_json::from_str(text).ok()?;
    let obj = parsed.as_object()?;

    // Field-missing sentinel, NOT the unparsable-reply fallback.
    let score = match obj.get("score") {
        None => SCORE_MISSING,
        Some(value) => coerce_score(value)?,
    };
    let rationale = match obj.get("rationale") {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    Some((score, rationale))
}

/// Integer coercion for a present `score` value. Floats truncate toward
/// zero, numeric strings parse, booleans map to 1/0; anything else fails
/// coercion and sends the whole reply down the fallback path.
fn coerce_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
