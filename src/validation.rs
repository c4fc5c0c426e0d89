//! Input validation for configuration values and outgoing messages.

use anyhow::{bail, Result};

use crate::models::constants::MAX_MESSAGE_LENGTH;
use crate::notify::NotifyError;

/// Maximum length of a public channel username, without the leading `@`.
const MAX_CHANNEL_NAME_LENGTH: usize = 32;

/// Validates a Telegram chat identifier.
///
/// A chat id is valid if it is either:
/// - a signed integer (private chats, groups, `-100…` supergroups)
/// - `@` followed by a channel username of 5-32 alphanumeric or `_` characters
///
/// # Examples
///
/// ```
/// use hwbot::validation::validate_chat_id;
///
/// assert!(validate_chat_id("123456789").is_ok());
/// assert!(validate_chat_id("-1001234567890").is_ok());
/// assert!(validate_chat_id("@homework_news").is_ok());
/// assert!(validate_chat_id("").is_err());
/// assert!(validate_chat_id("my chat").is_err());
/// ```
pub fn validate_chat_id(chat_id: &str) -> Result<()> {
    if chat_id.is_empty() {
        bail!("chat id cannot be empty");
    }

    if let Some(channel) = chat_id.strip_prefix('@') {
        if channel.len() < 5 || channel.len() > MAX_CHANNEL_NAME_LENGTH {
            bail!(
                "channel name '{channel}' must be 5-{MAX_CHANNEL_NAME_LENGTH} characters long"
            );
        }
        if !channel
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("channel name '{channel}' contains invalid characters");
        }
        return Ok(());
    }

    if chat_id.parse::<i64>().is_err() {
        bail!("chat id '{chat_id}' is neither an integer nor an @channel name");
    }

    Ok(())
}

/// Rejects messages the messaging endpoint would refuse anyway.
///
/// Length is counted in characters, not bytes, to match Telegram's limit.
pub fn validate_message(text: &str) -> Result<(), NotifyError> {
    if text.trim().is_empty() {
        return Err(NotifyError::BadRequest("message text is empty".to_string()));
    }

    let len = text.chars().count();
    if len > MAX_MESSAGE_LENGTH {
        return Err(NotifyError::TooLong {
            len,
            max: MAX_MESSAGE_LENGTH,
        });
    }

    Ok(())
}
