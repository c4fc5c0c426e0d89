//! Process configuration loaded once at startup.
//!
//! Credentials come from the environment, optionally seeded from a `.env`
//! file. A missing credential is fatal: the poll loop never starts.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::models::constants::{DEFAULT_ENDPOINT, DEFAULT_RETRY_SECS, DEFAULT_TELEGRAM_API};
use crate::validation::validate_chat_id;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENDPOINT: &str = "HWBOT_ENDPOINT";
pub const TELEGRAM_API: &str = "HWBOT_TELEGRAM_API";
pub const RETRY_SECS: &str = "HWBOT_RETRY_SECS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to read env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

impl ConfigError {
    /// Name of the offending variable, if the error is about one.
    pub fn variable(&self) -> Option<&'static str> {
        match self {
            ConfigError::Missing(name) | ConfigError::Invalid { name, .. } => Some(name),
            ConfigError::EnvFile { .. } => None,
        }
    }
}

/// Access to the homework status service.
#[derive(Clone)]
pub struct ServiceConfig {
    pub token: String,
    pub endpoint: String,
}

/// Access to the Telegram bot that delivers notifications.
#[derive(Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub telegram: TelegramConfig,
    pub retry_interval: Duration,
}

impl ServiceConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            token: required(&lookup, PRACTICUM_TOKEN)?,
            endpoint: optional(&lookup, ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }

    /// Load only what is needed to query the service.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        with_environment(env_file, |lookup| Self::from_lookup(lookup))
    }
}

impl Config {
    /// Build a config from an arbitrary variable source.
    ///
    /// Required values are checked in a fixed order so the first missing one
    /// is always the one reported.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let service = ServiceConfig::from_lookup(&lookup)?;

        let token = required(&lookup, TELEGRAM_TOKEN)?;
        let chat_id = required(&lookup, TELEGRAM_CHAT_ID)?;
        validate_chat_id(&chat_id).map_err(|e| ConfigError::Invalid {
            name: TELEGRAM_CHAT_ID,
            reason: e.to_string(),
        })?;
        let api_base = optional(&lookup, TELEGRAM_API)
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API.to_string())
            .trim_end_matches('/')
            .to_string();

        let retry_secs = match optional(&lookup, RETRY_SECS) {
            Some(raw) => parse_retry_secs(&raw)?,
            None => DEFAULT_RETRY_SECS,
        };

        Ok(Self {
            service,
            telegram: TelegramConfig {
                token,
                chat_id,
                api_base,
            },
            retry_interval: Duration::from_secs(retry_secs),
        })
    }

    /// Read the process environment as-is.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read variables from `path`, falling back to the process environment
    /// for anything the file does not define.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        with_environment(Some(path), |lookup| Self::from_lookup(lookup))
    }

    /// Load from `env_file` if given, otherwise from `.env` (if present) and
    /// the process environment.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => Self::from_env_file(path),
            None => {
                load_dotenv();
                Self::from_env()
            }
        }
    }
}

fn with_environment<T>(
    env_file: Option<&Path>,
    build: impl FnOnce(&dyn Fn(&str) -> Option<String>) -> Result<T, ConfigError>,
) -> Result<T, ConfigError> {
    match env_file {
        Some(path) => {
            let vars = read_env_file(path)?;
            build(&|key: &str| vars.get(key).cloned().or_else(|| env::var(key).ok()))
        }
        None => {
            load_dotenv();
            build(&|key: &str| env::var(key).ok())
        }
    }
}

fn load_dotenv() {
    // A missing .env is normal in production; real variables win over it.
    dotenvy::dotenv().ok();
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_file_error = |reason: String| ConfigError::EnvFile {
        path: path.display().to_string(),
        reason,
    };

    dotenvy::from_path_iter(path)
        .map_err(|e| env_file_error(e.to_string()))?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| env_file_error(e.to_string()))
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional(lookup, name).ok_or(ConfigError::Missing(name))
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_retry_secs(raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: RETRY_SECS,
        reason,
    };
    let secs: u64 = raw
        .parse()
        .map_err(|_| invalid(format!("'{raw}' is not a whole number of seconds")))?;
    if secs == 0 {
        return Err(invalid("interval must be at least one second".to_string()));
    }
    Ok(secs)
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (PRACTICUM_TOKEN, "practicum-secret"),
            (TELEGRAM_TOKEN, "123:telegram-secret"),
            (TELEGRAM_CHAT_ID, "987654321"),
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&complete())).unwrap();
        assert_eq!(config.service.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.telegram.api_base, DEFAULT_TELEGRAM_API);
        assert_eq!(config.retry_interval, Duration::from_secs(DEFAULT_RETRY_SECS));
        assert_eq!(config.telegram.chat_id, "987654321");
    }

    #[test]
    fn test_each_missing_variable_is_named() {
        for missing in [PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID] {
            let pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != missing).collect();
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(missing));
            assert_eq!(err.variable(), Some(missing));
            assert!(err.to_string().contains(missing));
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut pairs = complete();
        pairs[1] = (TELEGRAM_TOKEN, "   ");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(TELEGRAM_TOKEN));
    }

    #[test]
    fn test_invalid_chat_id() {
        let mut pairs = complete();
        pairs[2] = (TELEGRAM_CHAT_ID, "not a chat");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err.variable(), Some(TELEGRAM_CHAT_ID));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = complete();
        pairs.push((ENDPOINT, "http://localhost:9000/statuses/"));
        pairs.push((TELEGRAM_API, "http://localhost:9001/"));
        pairs.push((RETRY_SECS, "30"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.service.endpoint, "http://localhost:9000/statuses/");
        assert_eq!(config.telegram.api_base, "http://localhost:9001");
        assert_eq!(config.retry_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_retry_secs_rejects_zero_and_garbage() {
        for raw in ["0", "-5", "ten"] {
            let mut pairs = complete();
            pairs.push((RETRY_SECS, raw));
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert_eq!(err.variable(), Some(RETRY_SECS), "value {raw}");
        }
    }

    #[test]
    fn test_service_config_needs_only_service_token() {
        let service =
            ServiceConfig::from_lookup(lookup_from(&[(PRACTICUM_TOKEN, "secret")])).unwrap();
        assert_eq!(service.token, "secret");
        assert_eq!(service.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = Config::from_lookup(lookup_from(&complete())).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("practicum-secret"));
        assert!(!rendered.contains("telegram-secret"));
        assert!(rendered.contains("987654321"));
    }

    #[test]
    fn test_from_env_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        fs::write(
            &path,
            "PRACTICUM_TOKEN=file-practicum\nTELEGRAM_TOKEN=file-telegram\nTELEGRAM_CHAT_ID=@homework_news\nHWBOT_RETRY_SECS=120\n",
        )
        .unwrap();

        let config = Config::from_env_file(&path).unwrap();
        assert_eq!(config.service.token, "file-practicum");
        assert_eq!(config.telegram.chat_id, "@homework_news");
        assert_eq!(config.retry_interval, Duration::from_secs(120));
    }

    #[test]
    fn test_load_with_env_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hwbot.env");
        fs::write(
            &path,
            "PRACTICUM_TOKEN=p\nTELEGRAM_TOKEN=t\nTELEGRAM_CHAT_ID=42\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.telegram.chat_id, "42");
        assert_eq!(config.retry_interval, Duration::from_secs(DEFAULT_RETRY_SECS));
    }

    #[test]
    fn test_missing_env_file() {
        let tmp = TempDir::new().unwrap();
        let err = Config::from_env_file(&tmp.path().join("absent.env")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
        assert_eq!(err.variable(), None);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        let saved: Vec<_> = [PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID]
            .iter()
            .map(|k| (*k, env::var(k).ok()))
            .collect();

        env::set_var(PRACTICUM_TOKEN, "env-practicum");
        env::set_var(TELEGRAM_TOKEN, "env-telegram");
        env::remove_var(TELEGRAM_CHAT_ID);
        let missing = Config::from_env().unwrap_err();

        env::set_var(TELEGRAM_CHAT_ID, "-1001234567890");
        let config = Config::from_env();

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        assert_eq!(missing, ConfigError::Missing(TELEGRAM_CHAT_ID));
        let config = config.unwrap();
        assert_eq!(config.service.token, "env-practicum");
        assert_eq!(config.telegram.chat_id, "-1001234567890");
    }
}
