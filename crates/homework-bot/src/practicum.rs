//! Client for the Practicum homework status API

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::prelude::*;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Anything that can answer "which homeworks changed since `from_date`"
///
/// The body is returned undecoded into domain types; validation happens in
/// `homework_bot_core::response`.
#[allow(async_fn_in_trait)]
pub trait HomeworkSource {
    async fn fetch(&self, from_date: i64) -> Result<Value, Error>;
}

#[derive(Debug, Clone)]
pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PracticumClient {
    /// Create a client that sends `Authorization: OAuth <token>` with every request
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&f!("OAuth {}", config.credentials.practicum_token))
                .map_err(|e| eyre!("Invalid header value: {}", e))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| failure(f!("{} недоступен: {}", self.endpoint, e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(failure(f!("{} вернул статус {}", self.endpoint, status)));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| failure(f!("{} вернул некорректный JSON: {}", self.endpoint, e)))?;

        log::info!("Homework status request succeeded (from_date={from_date})");
        Ok(body)
    }
}

fn failure(context: String) -> Error {
    log::error!("Homework status request failed: {context}");
    Error::EmptyApiResponse(context)
}
