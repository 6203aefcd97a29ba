//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Schedule API routes. Mounted twice: at the root (the documented
/// contract) and under `/api/v1` (the prefix existing clients use).
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/schedule", get(handlers::get_schedule))
        .route("/schedule/week", get(handlers::get_week_schedule))
        .route("/classes", get(handlers::list_classes))
        .route("/bells", get(handlers::get_bells))
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        .merge(api_routes())
        .nest("/api/v1", api_routes())
        .fallback(handlers::fallback_404)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
