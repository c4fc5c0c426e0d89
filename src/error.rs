//! Error taxonomy for a single poll cycle.
//!
//! Everything that can go wrong between sending the status request and
//! producing a notification text is a [`PollError`]. The driver decides how
//! loudly to report it from [`PollError::is_recoverable`].

use thiserror::Error;

/// Failures talking to the review service or reading its answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request to the status endpoint failed: {0}")]
    Transport(String),
    #[error("status endpoint {endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("status endpoint reported an error: {0}")]
    Envelope(String),
    #[error("status response is not valid JSON: {0}")]
    Decode(String),
}

/// The response parsed as JSON but does not look like a status answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("response is not a JSON object: {0}")]
    NotAnObject(String),
    #[error("response has no `current_date` timestamp")]
    MissingWatermark,
    #[error("`current_date` is not an integer: {0}")]
    InvalidWatermark(String),
    #[error("`homeworks` is not a list: {0}")]
    InvalidHomeworks(String),
    #[error("homework record is malformed: {0}")]
    InvalidRecord(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("undocumented homework status: {0:?}")]
    UnknownStatus(String),
}

impl PollError {
    /// Fetch and validation failures share one suppression streak.
    ///
    /// An unknown status points at data the bot does not understand rather
    /// than an unavailable service, so it is never folded into a streak.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PollError::Api(_) | PollError::Shape(_) => true,
            PollError::UnknownStatus(_) => false,
        }
    }
}
