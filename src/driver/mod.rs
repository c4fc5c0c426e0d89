//! Poll/notify loop.
//!
//! Each cycle fetches the status answer, validates it, formats the newest
//! change and decides whether the chat hears about it. Repeated fetch and
//! validation failures are reported once per streak.

pub mod core;
mod outcome;
pub mod schedule;
mod state;


pub use core::{poll_once, Driver};
pub use outcome::{CycleOutcome, CycleReport, Delivery, SkipReason};
pub use schedule::{ShutdownHandle, Tick, Ticker};
pub use state::{format_timestamp, DriverState, NO_SUPPRESSED_ERRORS};
