//! JSON parsing helpers for extraction responses
//!
//! Models often wrap the payload in prose or code fences. These helpers find
//! the JSON array of stop records and validate its shape before anything
//! reaches the itinerary.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::itinerary::ExtractedStop;

/// Keys accepted when a model wraps the array in an object
const WRAPPER_KEYS: &[&str] = &["itinerary", "stops", "destinations"];

/// Parse the stop records out of a raw model response
///
/// The payload must be a JSON array of objects. A single wrapping object with
/// an `itinerary`/`stops`/`destinations` array is also accepted.
pub fn parse_itinerary_response(response: &str) -> Result<Vec<ExtractedStop>> {
    let value = find_payload(response.trim())?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                Error::Extraction("Extraction response is an object, expected an array".into())
            })?,
        other => {
            return Err(Error::Extraction(format!(
                "Extraction response must be an array, got {}",
                type_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            if !item.is_object() {
                return Err(Error::Extraction(format!(
                    "Extraction record #{} is {}, expected an object",
                    idx + 1,
                    type_name(&item)
                )));
            }
            serde_json::from_value::<ExtractedStop>(item).map_err(|e| {
                Error::Extraction(format!("Extraction record #{} is malformed: {}", idx + 1, e))
            })
        })
        .collect()
}

/// Pick the JSON payload out of a response
///
/// Every `[` or `{` is a candidate start, tried left to right, so brackets in
/// a prose preamble do not hide the payload after them. The first candidate
/// shaped like stop records wins; failing that, the first one that parses at
/// all is returned so the caller can say what is wrong with it.
fn find_payload(response: &str) -> Result<Value> {
    let mut fallback: Option<Value> = None;
    let mut first_error: Option<(serde_json::Error, &str)> = None;

    let starts = response
        .char_indices()
        .filter(|(_, c)| matches!(c, '[' | '{'));
    for (start, open) in starts {
        let Some(json_str) = balanced_span(response, start, open) else {
            continue;
        };
        match serde_json::from_str::<Value>(json_str) {
            Ok(value) if looks_like_records(&value) => return Ok(value),
            Ok(value) => {
                fallback.get_or_insert(value);
            }
            Err(e) => {
                first_error.get_or_insert((e, json_str));
            }
        }
    }

    if let Some(value) = fallback {
        return Ok(value);
    }
    Err(match first_error {
        Some((e, json_str)) => Error::Extraction(format!(
            "Invalid JSON from extraction service: {} | Raw: {}",
            e,
            truncate(json_str)
        )),
        None => Error::Extraction(format!(
            "No JSON found in extraction response | Raw: {}",
            truncate(response)
        )),
    })
}

/// Non-empty array of objects, or an object wrapping an array
fn looks_like_records(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        Value::Object(map) => WRAPPER_KEYS
            .iter()
            .any(|key| map.get(*key).is_some_and(Value::is_array)),
        _ => false,
    }
}

/// Text from the bracket at `start` to its matching close, if any
fn balanced_span(response: &str, start: usize, open: char) -> Option<&str> {
    let close = if open == '[' { ']' } else { '}' };

    // Match brackets, ignoring those inside strings
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in response[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(raw: &str) -> String {
    if raw.chars().count() > 200 {
        format!("{}...", raw.chars().take(200).collect::<String>())
    } else {
        raw.to_string()
    }
}
