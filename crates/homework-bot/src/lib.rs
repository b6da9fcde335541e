//! Imperative shell of homework-bot
//!
//! Talks to the Practicum homework API and to Telegram, and drives the poll
//! loop. All validation and rendering lives in `homework_bot_core`.

pub mod config;
pub mod error;
pub mod poller;
pub mod practicum;
pub mod prelude;
pub mod telegram;
