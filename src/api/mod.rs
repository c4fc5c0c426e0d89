//! Homework status service: fetching and validating poll responses.

pub mod client;
pub mod response;

pub use client::{evaluate_response, HomeworkClient};
pub use response::{validate, PollResponse};

use serde_json::Value;

use crate::error::PollError;

/// Source of status answers for a given watermark.
///
/// Implemented over HTTP by [`HomeworkClient`]; tests substitute canned
/// responses.
pub trait StatusSource {
    /// Fetch the raw answer for changes since `watermark` (seconds since epoch).
    fn fetch(&self, watermark: i64) -> Result<Value, PollError>;
}

impl<T: StatusSource + ?Sized> StatusSource for &T {
    fn fetch(&self, watermark: i64) -> Result<Value, PollError> {
        (**self).fetch(watermark)
    }
}
