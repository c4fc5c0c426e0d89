/// Homework status endpoint used when `HWBOT_ENDPOINT` is not set.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Telegram Bot API base used when `HWBOT_TELEGRAM_API` is not set.
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

/// Seconds to wait between the end of one poll cycle and the start of the next.
pub const DEFAULT_RETRY_SECS: u64 = 600;

/// Telegram rejects `sendMessage` text longer than this many characters.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Status responses are small; anything larger is treated as a transport failure.
pub const MAX_RESPONSE_SIZE: u64 = 1024 * 1024;

/// HTTP client timeouts shared by the status and messaging clients.
pub mod http {
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30; // Total request timeout (includes connection + transfer)
}
