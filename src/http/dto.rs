//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies live in [`crate::api`] so the client adapter can share
//! them; this module re-exports them and adds the query-parameter types.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    BellScheduleInfo, BellsResponse, ClassDto, ClassListResponse, EndpointIndex, ErrorBody,
    HealthResponse, LessonDto, LessonPartDto, ScheduleResponse, ServiceInfo, WeekDayDto,
    WeekScheduleResponse,
};

/// Query parameters for the daily schedule endpoint.
///
/// Both parameters are required by the contract; they are optional here so
/// the handler can answer a miss with the documented 400 body instead of
/// an extractor rejection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Query parameters for the week schedule endpoint.
///
/// The week is anchored by `week` (ISO label) or by `date`; `week` wins
/// when both are present.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub week: Option<String>,
}
