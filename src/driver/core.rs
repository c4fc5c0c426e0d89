//! Core Driver implementation

use tracing::{debug, error, info, warn};

use crate::api::{validate, StatusSource};
use crate::format::summarize;
use crate::notify::Notifier;
use crate::validation::validate_message;

use super::outcome::{CycleOutcome, CycleReport, Delivery, SkipReason};
use super::schedule::{Tick, Ticker};
use super::state::{format_timestamp, DriverState};

/// Owns the status source, the notifier and the state between cycles.
pub struct Driver<S, N> {
    source: S,
    notifier: N,
    state: DriverState,
}

impl<S: StatusSource, N: Notifier> Driver<S, N> {
    pub fn new(source: S, notifier: N, watermark: i64) -> Self {
        Self {
            source,
            notifier,
            state: DriverState::new(watermark),
        }
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Run one fetch/validate/format pass and deliver its message if the
    /// suppression policy allows it.
    pub fn run_cycle(&mut self) -> CycleReport {
        let from = self.state.watermark();
        debug!(from = %format_timestamp(from), "starting poll cycle");

        let outcome = poll_once(&self.source, from);
        self.state.apply(&outcome);

        let watermark = self.state.watermark();
        if watermark != from {
            debug!(watermark = %format_timestamp(watermark), "watermark advanced");
        }

        let message = outcome.message();
        match &outcome {
            CycleOutcome::Failed { error, .. } => {
                error!(%error, error_counter = self.state.error_counter(), "{message}");
            }
            _ => debug!("{message}"),
        }

        let delivery = self.deliver(&outcome, &message);

        CycleReport {
            outcome,
            message,
            delivery,
            error_counter: self.state.error_counter(),
            watermark,
        }
    }

    fn deliver(&self, outcome: &CycleOutcome, message: &str) -> Delivery {
        if let CycleOutcome::NoUpdate { .. } = outcome {
            return Delivery::Skipped(SkipReason::NoUpdate);
        }

        if let Some(streak) = self.state.suppressed_streak() {
            debug!(suppressed = streak, "repeated error not sent to chat");
            return Delivery::Skipped(SkipReason::Suppressed { streak });
        }

        if let Err(e) = validate_message(message) {
            warn!(error = %e, "notification not sent");
            return Delivery::Failed(e);
        }

        match self.notifier.send(message) {
            Ok(()) => {
                info!("notification sent");
                Delivery::Sent
            }
            Err(e) => {
                warn!(error = %e, "failed to send notification");
                Delivery::Failed(e)
            }
        }
    }

    /// Run cycles until shutdown is requested or `max_cycles` have run.
    ///
    /// Returns the number of cycles run.
    pub fn run(&mut self, ticker: &Ticker, max_cycles: Option<u64>) -> u64 {
        info!(
            interval_secs = ticker.interval().as_secs(),
            from = %format_timestamp(self.state.watermark()),
            "poll loop started"
        );

        let mut cycles = 0;
        loop {
            self.run_cycle();
            cycles += 1;

            if max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }
            if ticker.wait() == Tick::Stop {
                info!("shutdown requested");
                break;
            }
        }

        info!(cycles, "poll loop stopped");
        cycles
    }
}

/// Fetch, validate and format once, stopping at the first failure.
pub fn poll_once<S: StatusSource + ?Sized>(source: &S, watermark: i64) -> CycleOutcome {
    let raw = match source.fetch(watermark) {
        Ok(raw) => raw,
        Err(error) => {
            return CycleOutcome::Failed {
                error,
                watermark: None,
            }
        }
    };
    debug!("status endpoint answered");

    let response = match validate(&raw) {
        Ok(response) => response,
        Err(error) => {
            return CycleOutcome::Failed {
                error: error.into(),
                watermark: None,
            }
        }
    };

    match summarize(&response.records) {
        Ok(_) if response.records.is_empty() => CycleOutcome::NoUpdate {
            watermark: response.watermark,
        },
        Ok(message) => CycleOutcome::Update {
            message,
            watermark: response.watermark,
        },
        Err(error) => CycleOutcome::Failed {
            // A record that cannot be read is retried from the same point
            watermark: (!error.is_recoverable()).then_some(response.watermark),
            error,
        },
    }
}
