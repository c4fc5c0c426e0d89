//! Telegram Bot API `sendMessage` client.

use anyhow::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{Notifier, NotifyError};
use crate::api::client::create_http_client;
use crate::config::TelegramConfig;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope of every Bot API answer.
#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: Client,
    send_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            send_url: format!("{}/bot{}/sendMessage", config.api_base, config.token),
            chat_id: config.chat_id.clone(),
        })
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.send_url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        classify_reply(status, &body)
    }
}

/// The send URL embeds the bot token, so it is stripped from transport errors.
fn transport_error(error: reqwest::Error) -> NotifyError {
    if error.is_timeout() {
        NotifyError::TimedOut
    } else {
        NotifyError::Other(error.without_url().to_string())
    }
}

/// Map a Bot API answer onto [`NotifyError`].
///
/// The Bot API reports failures both through the HTTP status and through
/// `ok: false` with an `error_code`; either is enough to fail.
fn classify_reply(status: u16, body: &str) -> Result<(), NotifyError> {
    let reply: Option<ApiReply> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) && reply.as_ref().is_some_and(|r| r.ok) {
        return Ok(());
    }

    let code = reply
        .as_ref()
        .and_then(|r| r.error_code)
        .unwrap_or(status);
    let description = reply
        .and_then(|r| r.description)
        .unwrap_or_else(|| format!("HTTP {status}"));

    Err(match code {
        400 => NotifyError::BadRequest(description),
        401 | 403 => NotifyError::Unauthorized(description),
        _ => NotifyError::Other(description),
    })
}
