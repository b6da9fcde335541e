use std::fmt::Display;

/// Text sent to the chat when a poll iteration fails
pub fn format_error_message(error: &impl Display) -> String {
    format!("При работе программы обнаружена ошибка: {error}!")
}
