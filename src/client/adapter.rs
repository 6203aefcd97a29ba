//! Typed schedule client with cache fallback.
//!
//! Wire lessons may arrive one row per subgroup part or already grouped;
//! normalization runs every response through the same grouping the server
//! uses, so both sides agree on the period/parts shape.

use std::time::Duration;

use chrono::{Days, NaiveDate, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::debug;

use super::cache::{CacheStore, DEFAULT_SCHEDULE_TTL};
use super::http::HttpTransport;
use super::transport::{ScheduleTransport, TransportError};
use crate::api::{ClassDto, HealthResponse, LessonDto, ScheduleResponse, WeekScheduleResponse};
use crate::models::{
    weak_etag, week_label, DaySchedule, SubgroupKey, WeekAnchor, WeekSchedule,
    DEFAULT_BELL_TABLE_NAME, SCHOOL_WEEK_DAYS,
};
use crate::services::grouping::{group_slots, LessonSlot};

/// How many day requests a week fan-out issues at once.
const DAY_CONCURRENCY: usize = 3;

type DayKey = (String, NaiveDate);

/// Where a fetched schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    /// Served by the transport just now.
    Fresh,
    /// Served from the local cache after a transport failure.
    Cached,
}

/// A schedule together with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub origin: FetchOrigin,
}

/// Errors surfaced by [`ScheduleClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failed and no cached value exists for the key.
    #[error("schedule unavailable for {class_id} on {date}: {source}")]
    Unavailable {
        class_id: String,
        date: NaiveDate,
        #[source]
        source: TransportError,
    },

    /// Transport failure on an operation without cache fallback.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The week anchor does not name a valid ISO week.
    #[error("invalid week anchor: {0}")]
    InvalidWeek(String),
}

/// Schedule API client.
///
/// Each fetched day is cached under (classId, date); on transport failure
/// the cached value for that exact key is served instead, marked
/// [`FetchOrigin::Cached`]. A week fetch caches its six days individually,
/// and a failed week request falls back to per-day requests.
pub struct ScheduleClient<T> {
    transport: T,
    cache: CacheStore<DayKey, DaySchedule>,
    ttl: Duration,
}

impl ScheduleClient<HttpTransport> {
    /// Client over HTTP against `base_url` (the server root).
    pub fn over_http(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(base_url))
    }
}

impl<T: ScheduleTransport> ScheduleClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_ttl(transport, DEFAULT_SCHEDULE_TTL)
    }

    pub fn with_ttl(transport: T, ttl: Duration) -> Self {
        Self {
            transport,
            cache: CacheStore::new(),
            ttl,
        }
    }

    /// One class's schedule for one date. A response with zero lessons is
    /// a valid result (holiday or Sunday), not an error.
    pub async fn day_schedule(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> Result<Fetched<DaySchedule>, ClientError> {
        match self.transport.fetch_day(class_id, date).await {
            Ok(response) => {
                let day = normalize_day(response);
                self.cache
                    .put((class_id.to_string(), date), day.clone(), self.ttl);
                Ok(Fetched {
                    value: day,
                    origin: FetchOrigin::Fresh,
                })
            }
            Err(err) => match self.cache.get(&(class_id.to_string(), date)) {
                Some(day) => {
                    debug!(class = class_id, %date, "transport failed, serving cached day");
                    Ok(Fetched {
                        value: day,
                        origin: FetchOrigin::Cached,
                    })
                }
                None => Err(ClientError::Unavailable {
                    class_id: class_id.to_string(),
                    date,
                    source: err,
                }),
            },
        }
    }

    /// The Monday..Saturday week selected by `anchor`.
    ///
    /// When the week endpoint fails, days are requested individually (each
    /// with its own cache fallback); the result is marked cached if any
    /// day came from the cache. Fails only if some day is neither
    /// fetchable nor cached.
    pub async fn week_schedule(
        &self,
        class_id: &str,
        anchor: &WeekAnchor,
    ) -> Result<Fetched<WeekSchedule>, ClientError> {
        match self.transport.fetch_week(class_id, anchor).await {
            Ok(response) => {
                let week = normalize_week(response);
                for day in &week.days {
                    self.cache
                        .put((week.class_code.clone(), day.date), day.clone(), self.ttl);
                }
                Ok(Fetched {
                    value: week,
                    origin: FetchOrigin::Fresh,
                })
            }
            Err(err) => {
                debug!(class = class_id, error = %err, "week endpoint failed, fanning out per day");
                self.week_from_days(class_id, anchor).await
            }
        }
    }

    async fn week_from_days(
        &self,
        class_id: &str,
        anchor: &WeekAnchor,
    ) -> Result<Fetched<WeekSchedule>, ClientError> {
        let monday = anchor.monday().map_err(ClientError::InvalidWeek)?;

        let fetched: Vec<Fetched<DaySchedule>> = stream::iter(0..SCHOOL_WEEK_DAYS as u64)
            .map(|offset| self.day_schedule(class_id, monday + Days::new(offset)))
            .buffered(DAY_CONCURRENCY)
            .try_collect()
            .await?;

        let origin = if fetched.iter().any(|day| day.origin == FetchOrigin::Cached) {
            FetchOrigin::Cached
        } else {
            FetchOrigin::Fresh
        };
        let now = Utc::now();
        Ok(Fetched {
            value: WeekSchedule {
                week: week_label(monday),
                class_code: class_id.to_string(),
                days: fetched.into_iter().map(|day| day.value).collect(),
                last_updated: now,
                etag: weak_etag(class_id, now),
            },
            origin,
        })
    }

    /// The class list, in server order (grade, then letter).
    pub async fn classes(&self) -> Result<Vec<ClassDto>, ClientError> {
        Ok(self.transport.fetch_classes().await?.classes)
    }

    /// Server health snapshot.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        Ok(self.transport.fetch_health().await?)
    }
}

fn wire_slots(lessons: Vec<LessonDto>) -> impl Iterator<Item = LessonSlot> {
    lessons.into_iter().flat_map(|lesson| {
        let LessonDto {
            num,
            time_start,
            time_end,
            parts,
        } = lesson;
        parts.into_iter().map(move |part| LessonSlot {
            num,
            subgroup: SubgroupKey::from_option(part.subgroup.as_deref()),
            time_start,
            time_end,
            part: part.into_part(),
        })
    })
}

fn normalize_day(response: ScheduleResponse) -> DaySchedule {
    DaySchedule {
        date: response.date,
        class_code: response.class_id,
        weekday: response.weekday,
        is_school_day: response.is_school_day,
        lessons: group_slots(wire_slots(response.lessons)),
        bell_table: response.bell_schedule.name,
        last_updated: response.last_updated,
        etag: response.etag,
    }
}

fn normalize_week(response: WeekScheduleResponse) -> WeekSchedule {
    let WeekScheduleResponse {
        week,
        class_id,
        days,
        last_updated,
        etag,
    } = response;
    let days = days
        .into_iter()
        .map(|day| DaySchedule {
            date: day.date,
            class_code: class_id.clone(),
            weekday: day.weekday,
            is_school_day: day.is_school_day,
            lessons: group_slots(wire_slots(day.lessons)),
            // Week payloads carry no per-day bell table name
            bell_table: DEFAULT_BELL_TABLE_NAME.to_string(),
            last_updated,
            etag: etag.clone(),
        })
        .collect();
    WeekSchedule {
        week,
        class_code: class_id,
        days,
        last_updated,
        etag,
    }
}
