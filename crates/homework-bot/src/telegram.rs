//! Telegram delivery
//!
//! [`TelegramBot`] sends a single message through teloxide.
//! [`Notifier`] wraps any [`Bot`] and never lets a delivery failure escape:
//! when the chat itself is unreachable there is nowhere to report the failure
//! to, so it is only logged.

use std::time::Duration;

use teloxide::requests::Requester;
use teloxide::types::{ChatId, Recipient};

use crate::error::DeliveryError;
use crate::prelude::*;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[allow(async_fn_in_trait)]
pub trait Bot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone)]
pub struct TelegramBot {
    bot: teloxide::Bot,
}

impl TelegramBot {
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(timeout)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        let api_url = reqwest::Url::parse(api_url)
            .map_err(|e| eyre!("Invalid Telegram API URL {}: {}", api_url, e))?;

        Ok(Self {
            bot: teloxide::Bot::with_client(token, client).set_api_url(api_url),
        })
    }
}

impl Bot for TelegramBot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(recipient(chat_id), text)
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;

        Ok(())
    }
}

/// Numeric ids address a chat directly, anything else is a `@channel` name
pub fn recipient(chat_id: &str) -> Recipient {
    match chat_id.trim().parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

/// Sends text to the configured chat and swallows delivery failures
#[derive(Debug, Clone)]
pub struct Notifier<B> {
    bot: B,
    chat_id: String,
}

impl<B: Bot> Notifier<B> {
    pub fn new(bot: B, chat_id: impl Into<String>) -> Self {
        Self {
            bot,
            chat_id: chat_id.into(),
        }
    }

    /// Returns whether the message was delivered
    pub async fn notify(&self, text: &str) -> bool {
        match self.bot.send_message(&self.chat_id, text).await {
            Ok(()) => {
                log::debug!("Message sent to chat {}", self.chat_id);
                true
            }
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }
}
