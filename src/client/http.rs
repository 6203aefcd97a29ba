//! HTTP transport backed by reqwest.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use super::transport::{ScheduleTransport, TransportError};
use crate::api::{
    ClassListResponse, ErrorBody, HealthResponse, ScheduleResponse, WeekScheduleResponse,
};
use crate::models::WeekAnchor;

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// [`ScheduleTransport`] over HTTP.
///
/// `base_url` is the server root (endpoints are mounted there as well as
/// under `/api/v1`), without a trailing slash.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, TLS).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the contract's {error} body; fall back to the status line
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ScheduleTransport for HttpTransport {
    async fn fetch_day(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> Result<ScheduleResponse, TransportError> {
        let query = [
            ("classId", class_id.to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
        ];
        self.get_json("/schedule", &query).await
    }

    async fn fetch_week(
        &self,
        class_id: &str,
        anchor: &WeekAnchor,
    ) -> Result<WeekScheduleResponse, TransportError> {
        let query = match anchor {
            WeekAnchor::Date(date) => [
                ("classId", class_id.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
            ],
            WeekAnchor::Label(label) => {
                [("classId", class_id.to_string()), ("week", label.clone())]
            }
        };
        self.get_json("/schedule/week", &query).await
    }

    async fn fetch_classes(&self) -> Result<ClassListResponse, TransportError> {
        self.get_json("/classes", &[]).await
    }

    async fn fetch_health(&self) -> Result<HealthResponse, TransportError> {
        self.get_json("/health", &[]).await
    }
}
