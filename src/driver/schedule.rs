//! Fixed-interval scheduling between poll cycles.
//!
//! The wait starts only once a cycle, including its notification, has
//! returned, so two cycles never overlap. A shutdown request wakes the wait
//! early.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stop,
}

pub struct Ticker {
    interval: Duration,
    shutdown: Receiver<()>,
}

/// Requests that the loop stop at its next wait.
#[derive(Debug, Clone)]
pub struct ShutdownHandle(Sender<()>);

impl ShutdownHandle {
    pub fn request(&self) {
        // The ticker may already be gone; nothing left to stop then
        let _ = self.0.send(());
    }
}

impl Ticker {
    pub fn new(interval: Duration) -> (Self, ShutdownHandle) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                interval,
                shutdown: rx,
            },
            ShutdownHandle(tx),
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep for one interval.
    ///
    /// Returns [`Tick::Stop`] as soon as shutdown is requested, or when every
    /// [`ShutdownHandle`] has been dropped.
    pub fn wait(&self) -> Tick {
        match self.shutdown.recv_timeout(self.interval) {
            Err(RecvTimeoutError::Timeout) => Tick::Continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => Tick::Stop,
        }
    }
}
