//! Consumer-side schedule API client.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            ScheduleClient (adapter)         │
//! │   normalization + cache fallback + fan-out  │
//! └──────────────────┬──────────────────────────┘
//!                    │
//!        ┌───────────┴───────────┐
//!        │  ScheduleTransport    │   (transport)
//!        └───────────┬───────────┘
//!                    │
//!        ┌───────────┴───────────┐
//!        │  HttpTransport        │   (reqwest)
//!        └───────────────────────┘
//! ```
//!
//! The adapter caches each fetched day under (classId, date) and serves
//! the cached copy when the transport fails; a failed week request fans
//! out into six per-day requests so stale days can still be filled in.

#[cfg(feature = "client")]
pub mod adapter;
#[cfg(feature = "client")]
pub mod cache;
#[cfg(feature = "client")]
pub mod http;
#[cfg(feature = "client")]
pub mod transport;

#[cfg(feature = "client")]
pub use adapter::{ClientError, FetchOrigin, Fetched, ScheduleClient};
#[cfg(feature = "client")]
pub use cache::{CacheStore, DEFAULT_SCHEDULE_TTL};
#[cfg(feature = "client")]
pub use http::HttpTransport;
#[cfg(feature = "client")]
pub use transport::{ScheduleTransport, TransportError};
