//! Results of a single poll cycle

use crate::error::PollError;
use crate::format::{failure_message, NO_UPDATE_MESSAGE};
use crate::notify::NotifyError;

/// What a fetch/validate/format pass produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The newest record was formatted into a notification.
    Update { message: String, watermark: i64 },
    /// The service reported no changes.
    NoUpdate { watermark: i64 },
    /// The pass stopped at the first failing step.
    Failed {
        error: PollError,
        /// Set when the answer validated and only formatting failed.
        watermark: Option<i64>,
    },
}

impl CycleOutcome {
    /// Text that would go to the chat for this outcome.
    pub fn message(&self) -> String {
        match self {
            CycleOutcome::Update { message, .. } => message.clone(),
            CycleOutcome::NoUpdate { .. } => NO_UPDATE_MESSAGE.to_string(),
            CycleOutcome::Failed { error, .. } => failure_message(error),
        }
    }

    /// Watermark reported by a validated answer, if the answer got that far.
    pub fn validated_watermark(&self) -> Option<i64> {
        match self {
            CycleOutcome::Update { watermark, .. } | CycleOutcome::NoUpdate { watermark } => {
                Some(*watermark)
            }
            CycleOutcome::Failed { watermark, .. } => *watermark,
        }
    }

    pub fn error(&self) -> Option<&PollError> {
        match self {
            CycleOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoUpdate,
    /// Part of a recoverable-error streak already reported once.
    Suppressed { streak: u32 },
}

/// What happened to the cycle's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Skipped(SkipReason),
    Failed(NotifyError),
}

/// Everything a caller may want to know about a finished cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub message: String,
    pub delivery: Delivery,
    /// Error counter after the cycle, -1 when nothing is suppressed.
    pub error_counter: i64,
    /// Watermark the next cycle will query from.
    pub watermark: i64,
}
