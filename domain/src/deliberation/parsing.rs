//! Reviewer output parsing for Stage 2.
//!
//! Reviewers are instructed to emit raw JSON, but models frequently wrap it
//! in a markdown fence anyway. These functions are pure: no I/O, just
//! fence stripping, JSON decoding and score validation.
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`strip_code_fence`] | Remove a leading ```` ``` ```` / ```` ```json ```` and trailing ```` ``` ```` |
//! | [`parse_review_payload`] | Decode and validate a reviewer's verdict |

use super::fallback::is_fallback;
use super::value_objects::{DetailedScore, RankingItem};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const FENCE: &str = "```";

/// Reasons a reviewer's output could not be used
#[derive(Error, Debug)]
pub enum ReviewParseError {
    #[error("reviewer returned a failure marker")]
    UpstreamFailure,

    #[error("invalid review JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("review JSON must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("response #{response_id}: {criterion} score {value} is outside 0-10")]
    ScoreOutOfRange {
        response_id: u32,
        criterion: &'static str,
        value: u8,
    },
}

/// Structured verdict decoded from one reviewer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReviewPayload {
    #[serde(default)]
    pub rankings: Vec<RankingItem>,
    #[serde(default)]
    pub detailed_scores: Vec<DetailedScore>,
}

/// Strip one surrounding markdown code fence, with or without a `json` tag.
///
/// Unfenced input is returned trimmed and otherwise untouched.
///
/// ```
/// use council_domain::deliberation::parsing::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
/// assert_eq!(strip_code_fence("  {}  "), "{}");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        body = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }

    if let Some(rest) = body.strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

/// Decode a reviewer's raw text into rankings and detailed scores.
///
/// Missing `rankings` / `detailed_scores` arrays decode as empty. Malformed
/// JSON, a top level that is not an object, items with missing or mistyped
/// fields, and sub-scores above 10 are all rejected.
pub fn parse_review_payload(raw: &str) -> Result<ReviewPayload, ReviewParseError> {
    if is_fallback(raw) {
        return Err(ReviewParseError::UpstreamFailure);
    }

    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    if !value.is_object() {
        return Err(ReviewParseError::NotAnObject(json_kind(&value)));
    }
    // Derived struct decoding also accepts arrays, so items are checked by shape first
    for key in ["rankings", "detailed_scores"] {
        if let Some(Value::Array(items)) = value.get(key)
            && let Some(item) = items.iter().find(|item| !item.is_object())
        {
            return Err(ReviewParseError::NotAnObject(json_kind(item)));
        }
    }
    let payload: ReviewPayload = serde_json::from_value(value)?;

    if let Some((score, (criterion, value))) = payload
        .detailed_scores
        .iter()
        .find_map(|s| s.out_of_range().map(|range| (s, range)))
    {
        return Err(ReviewParseError::ScoreOutOfRange {
            response_id: score.response_id,
            criterion,
            value,
        });
    }

    Ok(payload)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
