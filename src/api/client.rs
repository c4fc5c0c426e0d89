//! HTTP client for the homework status endpoint.
//!
//! One blocking GET per poll. Transport failures, HTTP failures and the
//! service's own error envelope all come back as [`ApiError`].

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde_json::Value;
use std::io::Read;
use std::time::Duration;

use super::StatusSource;
use crate::config::ServiceConfig;
use crate::error::{ApiError, PollError};
use crate::models::constants::{http, MAX_RESPONSE_SIZE};

const USER_AGENT: &str = concat!("hwbot/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP client with bounded connect and request times.
/// Neither the status poll nor the notification may hang a cycle forever.
pub(crate) fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(http::CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(http::REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

pub struct HomeworkClient {
    client: Client,
    endpoint: Url,
    authorization: String,
}

impl HomeworkClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid status endpoint: {}", config.endpoint))?;

        Ok(Self {
            client: create_http_client()?,
            endpoint,
            authorization: format!("OAuth {}", config.token),
        })
    }

    /// Endpoint URL with the `from_date` query for `watermark`.
    pub fn request_url(&self, watermark: i64) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("from_date", &watermark.to_string());
        url
    }
}

impl StatusSource for HomeworkClient {
    fn fetch(&self, watermark: i64) -> Result<Value, PollError> {
        let response = self
            .client
            .get(self.request_url(watermark))
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = read_text_with_limit(response, MAX_RESPONSE_SIZE)?;

        Ok(evaluate_response(self.endpoint.as_str(), status, &body)?)
    }
}

/// Classify a completed HTTP exchange.
///
/// A non-success status wins over whatever the body says. A 200 whose body
/// carries `error` or `code` is the service reporting a failure in-band.
pub fn evaluate_response(endpoint: &str, status: u16, body: &str) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status,
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    if let Some(object) = value.as_object() {
        let envelope: Vec<String> = ["code", "error"]
            .iter()
            .filter_map(|key| object.get(*key).map(|v| format!("{key}: {}", field_text(v))))
            .collect();
        if !envelope.is_empty() {
            return Err(ApiError::Envelope(envelope.join(", ")));
        }
    }

    Ok(value)
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read the body as text, refusing anything over `max_size` bytes.
/// Checks Content-Length first, then enforces the limit while streaming.
fn read_text_with_limit(response: Response, max_size: u64) -> Result<String, ApiError> {
    if let Some(content_length) = response.content_length() {
        if content_length > max_size {
            return Err(ApiError::Transport(format!(
                "response of {content_length} bytes exceeds the {max_size} byte limit"
            )));
        }
    }

    let mut bytes = Vec::new();
    response
        .take(max_size + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| ApiError::Transport(format!("failed to read response body: {e}")))?;

    if bytes.len() as u64 > max_size {
        return Err(ApiError::Transport(format!(
            "response exceeds the {max_size} byte limit"
        )));
    }

    String::from_utf8(bytes).map_err(|_| ApiError::Decode("response is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://example.test/api/user_api/homework_statuses/";

    fn client() -> HomeworkClient {
        HomeworkClient::new(&ServiceConfig {
            token: "secret".to_string(),
            endpoint: ENDPOINT.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_request_url_carries_watermark() {
        let url = client().request_url(1_700_000_000);
        assert_eq!(
            url.as_str(),
            "https://example.test/api/user_api/homework_statuses/?from_date=1700000000"
        );
    }

    #[test]
    fn test_authorization_header_format() {
        assert_eq!(client().authorization, "OAuth secret");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = HomeworkClient::new(&ServiceConfig {
            token: "secret".to_string(),
            endpoint: "not a url".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_success_body_passes_through() {
        let value = evaluate_response(
            ENDPOINT,
            200,
            r#"{"homeworks": [], "current_date": 1700000000}"#,
        )
        .unwrap();
        assert_eq!(value["current_date"], 1_700_000_000);
    }

    #[test]
    fn test_http_failure_status() {
        let err = evaluate_response(ENDPOINT, 503, "Service Unavailable").unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                endpoint: ENDPOINT.to_string(),
                status: 503
            }
        );
    }

    #[test]
    fn test_http_failure_wins_over_body() {
        let err = evaluate_response(ENDPOINT, 401, r#"{"code": "not_authenticated"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));
    }

    #[test]
    fn test_error_envelope_in_success_response() {
        let err = evaluate_response(
            ENDPOINT,
            200,
            r#"{"code": "UnknownError", "error": "Wrong from_date format"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::Envelope("code: UnknownError, error: Wrong from_date format".to_string())
        );
    }

    #[test]
    fn test_error_envelope_with_only_error_field() {
        let err = evaluate_response(ENDPOINT, 200, r#"{"error": {"detail": "boom"}}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Envelope(r#"error: {"detail":"boom"}"#.to_string())
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = evaluate_response(ENDPOINT, 200, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_non_object_json_is_left_to_validation() {
        let value = evaluate_response(ENDPOINT, 200, "[1, 2, 3]").unwrap();
        assert!(value.is_array());
    }
}
