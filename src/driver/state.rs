//! Driver state carried between cycles.
//!
//! Two values survive a cycle: the watermark the next request queries from,
//! and the count of consecutive recoverable errors. Neither outlives the
//! process.

use chrono::DateTime;

use super::outcome::CycleOutcome;

/// External value of the error counter when no streak is in progress.
pub const NO_SUPPRESSED_ERRORS: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverState {
    watermark: i64,
    /// `None` outside a streak; `Some(n)` after n+1 consecutive recoverable errors.
    streak: Option<u32>,
}

impl DriverState {
    pub fn new(watermark: i64) -> Self {
        Self {
            watermark,
            streak: None,
        }
    }

    pub fn watermark(&self) -> i64 {
        self.watermark
    }

    /// -1 when no streak is in progress, otherwise the number of errors
    /// after the first one in the current streak.
    pub fn error_counter(&self) -> i64 {
        self.streak.map_or(NO_SUPPRESSED_ERRORS, i64::from)
    }

    /// Length of the suppressed part of the current streak, if notifications
    /// are being held back.
    pub fn suppressed_streak(&self) -> Option<u32> {
        self.streak.filter(|&n| n > 0)
    }

    /// Fold a cycle outcome into the state.
    ///
    /// Recoverable errors extend the streak and never move the watermark.
    /// Success and domain errors end the streak. The watermark moves to any
    /// validated answer's timestamp, never backwards.
    pub fn apply(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Failed { error, .. } if error.is_recoverable() => {
                self.streak = Some(self.streak.map_or(0, |n| n.saturating_add(1)));
                return;
            }
            _ => self.streak = None,
        }

        if let Some(watermark) = outcome.validated_watermark() {
            self.watermark = self.watermark.max(watermark);
        }
    }
}

/// Render a unix timestamp for logs, falling back to the raw number.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
