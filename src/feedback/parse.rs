//! Tolerant parsing of model output into a [`FeedbackAnalysis`].
//!
//! Models are asked for a bare JSON object but frequently wrap it in a
//! markdown code fence. Parsing tries the text as-is first, then once more
//! with a recognized fence removed.

use super::models::{FeedbackAnalysis, Sentiment};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("response JSON is not an object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Remove a surrounding ```` ``` ```` fence (with optional language tag).
///
/// Returns `None` when the text does not start with a fence.
pub fn strip_code_fence(text: &str) -> Option<&str> {
    let inner = text.trim().strip_prefix("```")?;
    let inner = inner.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let inner = inner.trim_end();
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    Some(inner.trim())
}

/// Parse a JSON object, retrying once without a code fence.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, ParseError> {
    let value = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => value,
        Err(first) => {
            let unfenced = strip_code_fence(text).ok_or_else(|| ParseError::NotJson(first.to_string()))?;
            serde_json::from_str::<Value>(unfenced).map_err(|e| ParseError::NotJson(e.to_string()))?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject),
    }
}

/// Parse and normalize a model response.
///
/// `rating`, `sentiment` and `summary` must be present; out-of-range values
/// are normalized rather than rejected.
pub fn parse_analysis(text: &str) -> Result<FeedbackAnalysis, ParseError> {
    let object = parse_json_object(text)?;

    let rating = present(&object, "rating").ok_or(ParseError::MissingField("rating"))?;
    let sentiment = present(&object, "sentiment").ok_or(ParseError::MissingField("sentiment"))?;
    let summary = object
        .get("summary")
        .and_then(non_empty_str)
        .ok_or(ParseError::MissingField("summary"))?;

    Ok(FeedbackAnalysis {
        rating: normalize_rating(rating),
        sentiment: normalize_sentiment(sentiment),
        summary: summary.to_string(),
        improvement_suggestions: object
            .get("improvementSuggestions")
            .and_then(non_empty_str)
            .map(str::to_string),
    })
}

// A field counts as present unless absent, null or an empty string
fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    match object.get(field)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        value => Some(value),
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Numbers and numeric strings within `[1, 5]` are rounded to the nearest
/// integer; anything else, including values just outside the range, becomes
/// the neutral rating.
pub fn normalize_rating(value: &Value) -> u8 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if (1.0..=5.0).contains(&n) => n.round() as u8,
        _ => FeedbackAnalysis::NEUTRAL_RATING,
    }
}

pub fn normalize_sentiment(value: &Value) -> Sentiment {
    value
        .as_str()
        .and_then(Sentiment::from_label)
        .unwrap_or(Sentiment::Neutral)
}
