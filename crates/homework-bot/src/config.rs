use std::path::PathBuf;
use std::time::Duration;

use homework_bot_core::credentials::Credentials;
use homework_bot_core::CoreError;

use crate::practicum::DEFAULT_ENDPOINT;
use crate::telegram::DEFAULT_API_URL;

/// Seconds between two poll iterations
pub const RETRY_PERIOD_SECS: u64 = 600;

/// Seconds a single HTTP request may take
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings, read from the command line or the environment
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Settings {
    /// Practicum API OAuth token
    #[clap(long, env = "PRACTICUM_TOKEN", hide_env_values = true)]
    pub practicum_token: Option<String>,

    /// Telegram bot token
    #[clap(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: Option<String>,

    /// Chat that receives the notifications
    #[clap(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// Homework status endpoint
    #[clap(long, env = "PRACTICUM_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Telegram Bot API base URL
    #[clap(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_API_URL)]
    pub telegram_api: String,

    /// Seconds to sleep between poll iterations
    #[clap(long, env = "RETRY_PERIOD", default_value_t = RETRY_PERIOD_SECS)]
    pub retry_period: u64,

    /// Seconds before an HTTP request is abandoned
    #[clap(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Initial cursor as a Unix timestamp (defaults to now)
    #[clap(long)]
    pub from_date: Option<i64>,
}

/// Validated configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoint: String,
    pub telegram_api: String,
    pub retry_period: Duration,
    pub request_timeout: Duration,
    pub from_date: Option<i64>,
}

impl Config {
    /// Fails when any of the three credentials is missing or blank
    pub fn from_settings(settings: Settings) -> Result<Self, CoreError> {
        let credentials = Credentials::from_parts(
            settings.practicum_token,
            settings.telegram_token,
            settings.telegram_chat_id,
        )?;

        Ok(Self {
            credentials,
            endpoint: settings.endpoint,
            telegram_api: settings.telegram_api,
            retry_period: Duration::from_secs(settings.retry_period),
            request_timeout: Duration::from_secs(settings.request_timeout),
            from_date: settings.from_date,
        })
    }
}

/// Describe a `.env` load failure worth logging
///
/// A missing file is expected, since the variables may come straight from the
/// environment. Anything else (unreadable file, bad line) is reported.
pub fn dotenv_warning(result: &Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(err) if err.not_found() => None,
        Err(err) => Some(format!("Failed to load .env file: {err}")),
    }
}
