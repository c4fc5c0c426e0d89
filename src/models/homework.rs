//! Homework records as reported by the review service.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::PollError;

/// Review status of a single piece of homework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// Wire value used by the review service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Approved => "work reviewed, no issues, approved",
            Self::Reviewing => "work taken up for review",
            Self::Rejected => "work reviewed, reviewer has comments",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| PollError::UnknownStatus(s.to_string()))
    }
}

/// One entry of the `homeworks` list.
///
/// The service sends more fields (ids, reviewer comment, dates); only the
/// ones needed for a notification are kept. Both are kept as raw JSON so
/// that an oddly typed value is judged by what it means, not rejected as a
/// malformed record.
#[derive(Debug, Clone, Deserialize)]
pub struct HomeworkRecord {
    #[serde(default)]
    pub homework_name: Option<Value>,
    #[serde(default)]
    pub status: Value,
}

impl HomeworkRecord {
    /// Anything but one of the three known strings is an unknown status,
    /// including a missing or non-string value.
    pub fn status(&self) -> Result<HomeworkStatus, PollError> {
        match &self.status {
            Value::String(status) => status.parse(),
            other => Err(PollError::UnknownStatus(other.to_string())),
        }
    }

    /// Name as shown to the user; `None` when absent or null.
    pub fn name(&self) -> Option<String> {
        match self.homework_name.as_ref()? {
            Value::Null => None,
            Value::String(name) => Some(name.clone()),
            other => Some(other.to_string()),
        }
    }
}
