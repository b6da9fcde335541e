//! Core library for homework-bot
//!
//! This crate implements the **Functional Core** of the homework-bot application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`homework_bot_core`** (this crate): Pure validation and rendering with zero I/O
//! - **`homework-bot`**: HTTP calls, Telegram delivery and the poll loop (the Imperative Shell)
//!
//! Every function here takes already-decoded data (`serde_json::Value`, strings)
//! and returns a typed `Result`, so the whole pipeline between "the API answered"
//! and "this text should be sent" can be tested with fixture data.
//!
//! # Module Organization
//!
//! - [`credentials`]: The credential triple and the startup presence check
//! - [`response`]: Shape validation of the homework status API response
//! - [`status`]: Homework status codes, verdicts and message rendering
//! - [`tracker`]: Change detection against the last notified report
//! - [`message`]: Text of the error notifications sent by the poll loop
//! - [`error`]: The failure kinds shared by all of the above
//!
//! # Example Usage
//!
//! ```rust
//! use homework_bot_core::{response::check_response, tracker::ChangeTracker};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "homeworks": [{"homework_name": "hw1", "status": "reviewing"}],
//!     "current_date": 1000
//! });
//!
//! let homeworks = check_response(&raw).unwrap();
//! let tracker = ChangeTracker::new();
//! let report = tracker.check(homeworks).unwrap().unwrap();
//!
//! assert_eq!(
//!     report.message,
//!     "Изменился статус проверки работы \"hw1\". Работа взята на проверку ревьюером."
//! );
//! ```

pub mod credentials;
pub mod error;
pub mod message;
pub mod response;
pub mod status;
pub mod tracker;

pub use error::CoreError;
