//! Credential triple required before the bot may start polling

use std::fmt;

use crate::error::CoreError;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Tokens for the homework API and the Telegram bot, plus the target chat
///
/// Only constructed through [`Credentials::from_parts`], so every field is
/// guaranteed non-blank.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Check that all three values are present and not blank
    ///
    /// Values are checked in declaration order and the first missing one is
    /// reported by its environment variable name.
    pub fn from_parts(
        practicum_token: Option<String>,
        telegram_token: Option<String>,
        telegram_chat_id: Option<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            practicum_token: require(practicum_token, PRACTICUM_TOKEN)?,
            telegram_token: require(telegram_token, TELEGRAM_TOKEN)?,
            telegram_chat_id: require(telegram_chat_id, TELEGRAM_CHAT_ID)?,
        })
    }
}

fn require(value: Option<String>, name: &'static str) -> Result<String, CoreError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CoreError::MissingCredential(name)),
    }
}

// Tokens must never reach the log stream.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}
