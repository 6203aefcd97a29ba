//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for resolution.

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    Json,
};
use chrono::{NaiveDate, Utc};

use super::dto::{
    BellsResponse, ClassDto, ClassListResponse, EndpointIndex, ErrorBody, HealthResponse,
    ScheduleQuery, ScheduleResponse, ServiceInfo, WeekQuery, WeekScheduleResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::{BellScheduleRepository, ReferenceRepository, TimetableRepository};
use crate::models::{WeekAnchor, DEFAULT_BELL_TABLE_NAME};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest("Invalid date format, expected YYYY-MM-DD".to_string())
    })
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// =============================================================================
// Schedule
// =============================================================================

/// GET /schedule?classId=..&date=..
///
/// Resolve one class's schedule for a single date, with that date's
/// recorded changes applied.
pub async fn get_schedule(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> HandlerResult<ScheduleResponse> {
    let (class_id, date) = match (present(query.class_id), present(query.date)) {
        (Some(class_id), Some(date)) => (class_id, date),
        _ => {
            return Err(AppError::BadRequest(
                "Missing required parameters: classId and date".to_string(),
            ))
        }
    };
    let date = parse_date(&date)?;

    let day = services::resolve_day(state.repository.as_ref(), &class_id, date).await?;
    Ok(Json(ScheduleResponse::from(&day)))
}

/// GET /schedule/week?classId=..&(date=..|week=..)
///
/// Resolve the Monday..Saturday week selected by an ISO week label or by
/// any date inside the week.
pub async fn get_week_schedule(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> HandlerResult<WeekScheduleResponse> {
    let class_id = match present(query.class_id) {
        Some(class_id) => class_id,
        None => {
            return Err(AppError::BadRequest(
                "Missing required parameters: classId and (date or week)".to_string(),
            ))
        }
    };
    let anchor = match (present(query.week), present(query.date)) {
        (Some(week), _) => WeekAnchor::Label(week),
        (None, Some(date)) => WeekAnchor::Date(parse_date(&date)?),
        (None, None) => {
            return Err(AppError::BadRequest(
                "Missing required parameters: classId and (date or week)".to_string(),
            ))
        }
    };

    let week = services::resolve_week(state.repository.as_ref(), &class_id, &anchor).await?;
    Ok(Json(WeekScheduleResponse::from(&week)))
}

// =============================================================================
// Reference Data
// =============================================================================

/// GET /classes
///
/// List all classes, ordered by grade then letter.
pub async fn list_classes(State(state): State<AppState>) -> HandlerResult<ClassListResponse> {
    let classes = state.repository.list_classes().await?;

    Ok(Json(ClassListResponse {
        classes: classes.iter().map(ClassDto::from).collect(),
    }))
}

/// GET /bells
///
/// The active bell timetable; the built-in standard table when storage
/// has none.
pub async fn get_bells(State(state): State<AppState>) -> HandlerResult<BellsResponse> {
    let bells = state
        .repository
        .fetch_bell_timetable(DEFAULT_BELL_TABLE_NAME)
        .await?
        .unwrap_or_default();

    Ok(Json(bells))
}

// =============================================================================
// Service Status
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        uptime: state.uptime_seconds(),
        database,
    }))
}

/// GET /
///
/// Service banner with the endpoint inventory.
pub async fn service_info(State(state): State<AppState>) -> HandlerResult<ServiceInfo> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected",
        _ => "disconnected",
    };

    Ok(Json(ServiceInfo {
        message: "Lyceum Schedule API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: EndpointIndex {
            schedule: "/api/v1/schedule?classId={classCode}&date={YYYY-MM-DD}".to_string(),
            week: "/api/v1/schedule/week?classId={classCode}&week={YYYY-Www}".to_string(),
            classes: "/api/v1/classes".to_string(),
            bells: "/api/v1/bells".to_string(),
            health: "/health".to_string(),
        },
        database: database.to_string(),
    }))
}

/// Fallback handler for unknown paths.
pub async fn fallback_404(method: Method, uri: Uri) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Endpoint not found").with_request(uri.to_string(), method.to_string())),
    )
}
