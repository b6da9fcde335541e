//! Homework review statuses and the messages rendered for them

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::CoreError;

pub const STATUS_KEY: &str = "status";
pub const HOMEWORK_NAME_KEY: &str = "homework_name";

/// Review status reported by the homework API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Sentence describing the review outcome
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A homework record that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHomework {
    pub name: String,
    pub status: HomeworkStatus,
}

impl ParsedHomework {
    pub fn message(&self) -> String {
        render_status_message(&self.name, self.status)
    }
}

/// Validate a single homework record
///
/// Checks run in this order and the first violation is returned:
/// object shape, `status` present, `homework_name` present, `status` is a
/// string, `status` is a known code.
///
/// A non-string `homework_name` is accepted and kept as its JSON text.
pub fn parse_homework(homework: &Value) -> Result<ParsedHomework, CoreError> {
    let object = homework
        .as_object()
        .ok_or(CoreError::NotAMapping("Домашняя работа"))?;

    let status = object
        .get(STATUS_KEY)
        .ok_or(CoreError::MissingKey(STATUS_KEY))?;
    let name = object
        .get(HOMEWORK_NAME_KEY)
        .ok_or(CoreError::MissingKey(HOMEWORK_NAME_KEY))?;

    let status = status
        .as_str()
        .ok_or(CoreError::WrongType {
            key: STATUS_KEY,
            expected: "строка",
        })?
        .parse::<HomeworkStatus>()?;

    let name = match name {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };

    Ok(ParsedHomework { name, status })
}

/// Render the notification text for a homework record
pub fn parse_status(homework: &Value) -> Result<String, CoreError> {
    parse_homework(homework).map(|parsed| parsed.message())
}

pub fn render_status_message(homework_name: &str, status: HomeworkStatus) -> String {
    format!(
        "Изменился статус проверки работы \"{homework_name}\". {}",
        status.verdict()
    )
}
