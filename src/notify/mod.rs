//! Chat notifications.

mod telegram;

pub use telegram::TelegramNotifier;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("bot is not authorized: {0}")]
    Unauthorized(String),
    #[error("messaging endpoint rejected the request: {0}")]
    BadRequest(String),
    #[error("timed out talking to the messaging endpoint")]
    TimedOut,
    #[error("message too long: {len} characters (max {max})")]
    TooLong { len: usize, max: usize },
    #[error("failed to send message: {0}")]
    Other(String),
}

/// Destination for notification texts.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        (**self).send(text)
    }
}
