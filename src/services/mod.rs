//! Service layer for schedule resolution.
//!
//! This module contains the business logic that sits between storage and
//! the HTTP handlers: merging the base timetable with dated changes,
//! grouping merged slots into period entries, and assembling week views.

pub mod grouping;
pub mod resolver;
pub mod week;

pub use grouping::{group_slots, LessonSlot};
pub use resolver::resolve_day;
pub use week::resolve_week;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
