use serde_json::{Map, Value};

use super::ExtractedRecord;
use crate::error::DecodeError;

/// Parse a completion reply. It must be exactly a JSON array of objects; no
/// surrounding prose or code fences are stripped. Missing or non-string
/// fields become empty strings.
pub fn decode_reply(raw: &str) -> Result<Vec<ExtractedRecord>, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(|source| DecodeError::InvalidJson {
        raw: raw.to_string(),
        source,
    })?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DecodeError::UnexpectedShape {
                raw: raw.to_string(),
                found: kind(&other).to_string(),
            })
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(fields) => Ok(record_from(fields)),
            other => Err(DecodeError::UnexpectedShape {
                raw: raw.to_string(),
                found: format!("{} at index {}", kind(other), i),
            }),
        })
        .collect()
}

fn record_from(fields: &Map<String, Value>) -> ExtractedRecord {
    let get = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    ExtractedRecord {
        name: get("Name"),
        location: get("Location"),
        website: get("Website"),
        focus: get("Focus"),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
