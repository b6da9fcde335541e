//! The poll loop
//!
//! Each tick runs one sequential pipeline: fetch, validate, detect changes,
//! notify. A tick never fails: any error is reported to the chat and the
//! next tick simply tries again with the same cursor.

use std::future::Future;
use std::time::Duration;

use homework_bot_core::message::format_error_message;
use homework_bot_core::response::{check_response, current_date};
use homework_bot_core::tracker::{ChangeTracker, Report};
use homework_bot_core::CoreError;

use crate::practicum::HomeworkSource;
use crate::prelude::*;
use crate::telegram::{Bot, Notifier};

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A status change was sent and the cursor moved to `cursor`.
    Notified { cursor: i64 },
    /// The newest homework matches the last report.
    Unchanged,
    NoHomeworks,
    /// The iteration failed; `message` is the text sent to the chat.
    Failed { message: String },
}

pub struct Poller<S, B> {
    source: S,
    notifier: Notifier<B>,
    tracker: ChangeTracker,
    cursor: i64,
}

impl<S: HomeworkSource, B: Bot> Poller<S, B> {
    pub fn new(source: S, notifier: Notifier<B>, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            tracker: ChangeTracker::new(),
            cursor,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.tracker.last()
    }

    /// Run one iteration, turning any failure into a chat notification
    pub async fn tick(&mut self) -> TickOutcome {
        match self.poll().await {
            Ok(outcome) => outcome,
            Err(err) => {
                log_failure(&err);
                let message = format_error_message(&err);
                self.notifier.notify(&message).await;
                TickOutcome::Failed { message }
            }
        }
    }

    /// Tick forever, sleeping `retry_period` after every tick
    ///
    /// Returns when the process receives Ctrl-C.
    pub async fn run(self, retry_period: Duration) {
        self.run_until(retry_period, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {err}");
                std::future::pending::<()>().await;
            }
        })
        .await;
        log::info!("Interrupted, shutting down");
    }

    /// Tick forever until `shutdown` resolves
    ///
    /// `shutdown` is polled across the whole loop turn, so it also interrupts
    /// a tick that is waiting on the network.
    pub async fn run_until(
        mut self,
        retry_period: Duration,
        shutdown: impl Future<Output = ()>,
    ) {
        tokio::pin!(shutdown);

        loop {
            let turn = async {
                let outcome = self.tick().await;
                log::debug!("Tick finished: {outcome:?}, cursor={}", self.cursor);
                tokio::time::sleep(retry_period).await;
            };

            tokio::select! {
                _ = &mut shutdown => return,
                _ = turn => {}
            }
        }
    }

    async fn poll(&mut self) -> Result<TickOutcome, Error> {
        let response = self.source.fetch(self.cursor).await?;
        let homeworks = check_response(&response)?;
        log::info!("Received {} homework(s)", homeworks.len());

        if homeworks.is_empty() {
            log::debug!("No new homework");
            return Ok(TickOutcome::NoHomeworks);
        }

        let Some(report) = self.tracker.check(homeworks)? else {
            log::debug!("Homework status has not changed");
            return Ok(TickOutcome::Unchanged);
        };
        let cursor = current_date(&response)?;

        self.notifier.notify(&report.message).await;
        self.tracker.commit(report);
        self.cursor = cursor;

        Ok(TickOutcome::Notified { cursor })
    }
}

fn log_failure(err: &Error) {
    match err {
        Error::EmptyApiResponse(_) => log::error!("API request failed: {err}"),
        Error::Validation(CoreError::UnknownStatus(_)) => {
            log::error!("Unexpected homework status: {err}")
        }
        Error::Validation(_) => log::error!("Malformed API response: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Value, Error>>>,
        requested: Arc<Mutex<Vec<i64>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Value, Error>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requested: Arc::default(),
            }
        }
    }

    impl HomeworkSource for ScriptedSource {
        async fn fetch(&self, from_date: i64) -> Result<Value, Error> {
            self.requested.lock().unwrap().push(from_date);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    #[derive(Clone, Default)]
    struct RecordingBot {
        sent: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Bot for RecordingBot {
        async fn send_message(&self, _chat_id: &str, text: &str) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError("network unreachable".to_string()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn poller(
        responses: Vec<Result<Value, Error>>,
        bot: RecordingBot,
    ) -> Poller<ScriptedSource, RecordingBot> {
        Poller::new(ScriptedSource::new(responses), Notifier::new(bot, "42"), 0)
    }

    fn response(name: &str, status: &str, current_date: i64) -> Result<Value, Error> {
        Ok(json!({
            "homeworks": [{"homework_name": name, "status": status}],
            "current_date": current_date
        }))
    }

    const REVIEWING_HW1: &str =
        "Изменился статус проверки работы \"hw1\". Работа взята на проверку ревьюером.";
    const APPROVED_HW1: &str = concat!(
        "Изменился статус проверки работы \"hw1\". ",
        "Работа проверена: ревьюеру всё понравилось. Ура!"
    );

    #[tokio::test]
    async fn test_tick_notifies_and_advances_cursor() {
        let bot = RecordingBot::default();
        let mut poller = poller(vec![response("hw1", "reviewing", 1000)], bot.clone());

        assert_eq!(poller.tick().await, TickOutcome::Notified { cursor: 1000 });
        assert_eq!(poller.cursor(), 1000);
        assert_eq!(*bot.sent.lock().unwrap(), vec![REVIEWING_HW1.to_string()]);
        assert_eq!(poller.last_report().unwrap().homework_name, "hw1");
    }

    #[tokio::test]
    async fn test_tick_same_status_is_not_sent_twice() {
        let bot = RecordingBot::default();
        let mut poller = poller(
            vec![
                response("hw1", "reviewing", 1000),
                response("hw1", "reviewing", 1500),
            ],
            bot.clone(),
        );

        poller.tick().await;
        assert_eq!(poller.tick().await, TickOutcome::Unchanged);

        assert_eq!(poller.cursor(), 1000);
        assert_eq!(bot.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tick_status_change_is_sent() {
        let bot = RecordingBot::default();
        let mut poller = poller(
            vec![
                response("hw1", "reviewing", 1000),
                response("hw1", "approved", 2000),
            ],
            bot.clone(),
        );

        poller.tick().await;
        assert_eq!(poller.tick().await, TickOutcome::Notified { cursor: 2000 });

        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1], APPROVED_HW1);
    }

    #[tokio::test]
    async fn test_tick_uses_cursor_for_next_request() {
        let source = ScriptedSource::new(vec![
            response("hw1", "reviewing", 1000),
            response("hw1", "approved", 2000),
        ]);
        let requested = source.requested.clone();
        let mut poller = Poller::new(source, Notifier::new(RecordingBot::default(), "42"), 7);

        poller.tick().await;
        poller.tick().await;

        assert_eq!(*requested.lock().unwrap(), vec![7, 1000]);
    }

    #[tokio::test]
    async fn test_tick_empty_homeworks() {
        let bot = RecordingBot::default();
        let mut poller = poller(
            vec![Ok(json!({"homeworks": [], "current_date": 3000}))],
            bot.clone(),
        );

        assert_eq!(poller.tick().await, TickOutcome::NoHomeworks);
        assert_eq!(poller.cursor(), 0);
        assert!(bot.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tick_transport_failure_is_reported() {
        let bot = RecordingBot::default();
        let mut poller = poller(
            vec![Err(Error::EmptyApiResponse("HTTP 500".to_string()))],
            bot.clone(),
        );

        let outcome = poller.tick().await;

        let expected =
            "При работе программы обнаружена ошибка: Запрос к API не выполнен: HTTP 500!";
        assert_eq!(
            outcome,
            TickOutcome::Failed {
                message: expected.to_string()
            }
        );
        assert_eq!(*bot.sent.lock().unwrap(), vec![expected.to_string()]);
        assert_eq!(poller.cursor(), 0);
    }

    #[tokio::test]
    async fn test_tick_validation_failure_keeps_state() {
        let bot = RecordingBot::default();
        let mut poller = poller(
            vec![
                response("hw1", "reviewing", 1000),
                Ok(json!({"current_date": 2000})),
                response("hw1", "lost", 2000),
            ],
            bot.clone(),
        );

        poller.tick().await;
        assert!(matches!(poller.tick().await, TickOutcome::Failed { .. }));
        assert!(matches!(poller.tick().await, TickOutcome::Failed { .. }));

        assert_eq!(poller.cursor(), 1000);
        assert_eq!(poller.last_report().unwrap().message, REVIEWING_HW1);

        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert!(sent[1].contains("Ключ homeworks не найден"));
        assert!(sent[2].contains("Статус работы неизвестен: lost"));
    }

    #[tokio::test]
    async fn test_tick_bad_current_date_is_not_sent() {
        let bot = RecordingBot::default();
        let mut poller = poller(
            vec![Ok(json!({
                "homeworks": [{"homework_name": "hw1", "status": "approved"}],
                "current_date": "soon"
            }))],
            bot.clone(),
        );

        assert!(matches!(poller.tick().await, TickOutcome::Failed { .. }));
        assert!(poller.last_report().is_none());

        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("current_date"));
    }

    #[tokio::test]
    async fn test_tick_delivery_failure_does_not_escalate() {
        let bot = RecordingBot {
            fail: true,
            ..Default::default()
        };
        let mut poller = poller(vec![response("hw1", "rejected", 1000)], bot);

        // The report is committed even though the chat was unreachable.
        assert_eq!(poller.tick().await, TickOutcome::Notified { cursor: 1000 });
        assert!(poller.last_report().is_some());
    }

    #[tokio::test]
    async fn test_tick_literal_empty_response_without_current_date() {
        let bot = RecordingBot::default();
        let mut poller = poller(vec![Ok(json!({"homeworks": []}))], bot.clone());

        let TickOutcome::Failed { message } = poller.tick().await else {
            panic!("a response without current_date must fail the tick");
        };
        assert!(message.contains("Ключ current_date не найден"));
        assert_eq!(*bot.sent.lock().unwrap(), vec![message]);
        assert_eq!(poller.cursor(), 0);
    }

    // ============================================================================
    // run_until tests
    // ============================================================================

    struct HangingSource;

    impl HomeworkSource for HangingSource {
        async fn fetch(&self, _from_date: i64) -> Result<Value, Error> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_run_until_interrupts_a_tick_in_flight() {
        let bot = RecordingBot::default();
        let poller = Poller::new(HangingSource, Notifier::new(bot.clone(), "42"), 0);
        let shutdown = tokio::time::sleep(Duration::from_millis(50));

        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            poller.run_until(Duration::from_secs(600), shutdown),
        )
        .await;

        assert!(stopped.is_ok());
        assert!(bot.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_until_interrupts_the_sleep() {
        let bot = RecordingBot::default();
        let poller = poller(vec![response("hw1", "reviewing", 1000)], bot.clone());
        let shutdown = tokio::time::sleep(Duration::from_millis(50));

        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            poller.run_until(Duration::from_secs(600), shutdown),
        )
        .await;

        assert!(stopped.is_ok());
        assert_eq!(*bot.sent.lock().unwrap(), vec![REVIEWING_HW1.to_string()]);
    }
}
