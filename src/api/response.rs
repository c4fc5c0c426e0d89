//! Shape validation of a decoded status answer.

use serde_json::Value;

use crate::error::ShapeError;

/// A status answer whose envelope has been checked.
///
/// Records are kept as raw JSON: each one is only interpreted when it is
/// formatted, and only the first one ever is.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    pub records: Vec<Value>,
    pub watermark: i64,
}

/// Check that `response` is an object with an integer `current_date` and a
/// `homeworks` list.
pub fn validate(response: &Value) -> Result<PollResponse, ShapeError> {
    let object = response
        .as_object()
        .ok_or_else(|| ShapeError::NotAnObject(json_type(response).to_string()))?;

    let watermark = match object.get("current_date") {
        None => return Err(ShapeError::MissingWatermark),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| ShapeError::InvalidWatermark(value.to_string()))?,
    };

    let records = match object.get("homeworks") {
        Some(Value::Array(records)) => records.clone(),
        Some(other) => return Err(ShapeError::InvalidHomeworks(json_type(other).to_string())),
        None => return Err(ShapeError::InvalidHomeworks("missing".to_string())),
    };

    Ok(PollResponse { records, watermark })
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
