//! Transport abstraction for the schedule API.
//!
//! The adapter talks to the server through [`ScheduleTransport`], so tests
//! and alternative carriers can stand in for HTTP.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::api::{ClassListResponse, HealthResponse, ScheduleResponse, WeekScheduleResponse};
use crate::models::WeekAnchor;

/// Errors crossing the wire boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (connect, DNS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Typed operations against the schedule API.
#[async_trait]
pub trait ScheduleTransport: Send + Sync {
    /// Fetch one class's schedule for a single date.
    async fn fetch_day(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> Result<ScheduleResponse, TransportError>;

    /// Fetch the Monday..Saturday week selected by `anchor`.
    async fn fetch_week(
        &self,
        class_id: &str,
        anchor: &WeekAnchor,
    ) -> Result<WeekScheduleResponse, TransportError>;

    /// Fetch the class list.
    async fn fetch_classes(&self) -> Result<ClassListResponse, TransportError>;

    /// Fetch the server health snapshot.
    async fn fetch_health(&self) -> Result<HealthResponse, TransportError>;
}
