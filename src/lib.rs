//! # Lyceum Schedule Backend
//!
//! Schedule resolution service for a school timetable.
//!
//! This crate resolves a class's base weekly timetable against a dated
//! change log (cancellations, replacements, teacher and time changes) into
//! final day and week schedules, and serves them over a REST API via Axum.
//! A typed client with a local cache consumes the same API and keeps
//! working through server outages.
//!
//! ## Features
//!
//! - **Base Timetable**: Weekly lesson grid per class, with subgroup splits
//! - **Change Log**: Date-scoped cancellations, replacements, teacher and time changes
//! - **Resolution**: Deterministic merge of base rows and changes into final schedules
//! - **Bell Schedules**: Named period-to-time tables with a built-in default
//! - **HTTP API**: REST endpoints for day, week, classes, bells, and health
//! - **Client**: Consumer-side adapter with per-day caching and offline fallback
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types for timetables, changes, and resolved schedules
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`db`]: Repository pattern over in-memory and SQLite backends
//! - [`services`]: Schedule resolution and week assembly
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`client`]: Typed API client with cache fallback
//!

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]
//! ## Resolution Model
//!
//! Resolution is per class and per date: fetch the base rows for the date's
//! weekday, apply that date's changes in ascending sequence order (the last
//! change to a period and subgroup wins), group subgroup parts into periods,
//! and attach bell times. The same grouping runs on the client, so both
//! sides agree on the final shape.

pub mod api;

#[cfg(feature = "client")]
pub mod client;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
