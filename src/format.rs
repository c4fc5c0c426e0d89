//! Notification texts.

use serde_json::Value;

use crate::api::response::json_type;
use crate::error::{PollError, ShapeError};
use crate::models::homework::HomeworkRecord;

/// Produced when the service reports no changes. Never sent to the chat.
pub const NO_UPDATE_MESSAGE: &str = "No updates found";

/// Shown in place of a missing `homework_name`.
pub const UNNAMED_HOMEWORK: &str = "unnamed";

/// Describe the newest change, or return [`NO_UPDATE_MESSAGE`] when there
/// is none. The service lists records newest first.
pub fn summarize(records: &[Value]) -> Result<String, PollError> {
    match records.first() {
        Some(record) => parse_status(record),
        None => Ok(NO_UPDATE_MESSAGE.to_string()),
    }
}

/// Format one homework record as `Status changed for "<name>": <verdict>`.
pub fn parse_status(record: &Value) -> Result<String, PollError> {
    if !record.is_object() {
        return Err(ShapeError::InvalidRecord(format!(
            "expected an object, got {}",
            json_type(record)
        ))
        .into());
    }

    let record: HomeworkRecord = serde_json::from_value(record.clone())
        .map_err(|e| ShapeError::InvalidRecord(e.to_string()))?;
    let status = record.status()?;
    let name = record
        .name()
        .unwrap_or_else(|| UNNAMED_HOMEWORK.to_string());

    Ok(format!("Status changed for \"{name}\": {}", status.verdict()))
}

/// Text reported to the chat when a cycle fails.
pub fn failure_message(error: &PollError) -> String {
    format!("Program failure: {error}")
}
