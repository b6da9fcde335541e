//! Failure kinds raised by the pure validation functions.
//!
//! The `Display` text of every variant ends up in the chat message the poll
//! loop sends when an iteration fails, so it is written for the recipient.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required credential is absent or blank. Carries the environment variable name.
    #[error("Отсутствует обязательная переменная окружения {0}")]
    MissingCredential(&'static str),

    /// The value was expected to be a JSON object.
    #[error("{0} не является словарём")]
    NotAMapping(&'static str),

    #[error("Ключ {0} не найден")]
    MissingKey(&'static str),

    #[error("Поле {key} имеет неверный тип, ожидался {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },

    #[error("Статус работы неизвестен: {0}")]
    UnknownStatus(String),
}
