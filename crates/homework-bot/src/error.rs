use homework_bot_core::CoreError;

/// Failures of a single poll iteration
///
/// Every variant is recoverable: the poll loop reports it to the chat and
/// tries again on the next tick.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport failure, non-200 status or an undecodable body.
    #[error("Запрос к API не выполнен: {0}")]
    EmptyApiResponse(String),

    #[error(transparent)]
    Validation(#[from] CoreError),
}

/// A message could not be delivered to the chat
///
/// Kept apart from [`Error`]: it is only ever logged by the notifier and never
/// reaches the poll loop.
#[derive(thiserror::Error, Debug)]
#[error("Сообщение не было отправлено: {0}")]
pub struct DeliveryError(pub String);
