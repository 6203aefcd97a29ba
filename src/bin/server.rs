//! Lyceum Schedule HTTP Server Binary
//!
//! This is the main entry point for the schedule REST API server.
//! It initializes the repository, seeds the demo dataset when requested,
//! sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! SEED_DEMO_DATA=1 cargo run --bin lyceum-server --features "local-repo,http-server"
//!
//! # Run with embedded SQLite repository
//! SCHEDULE_DB_PATH=schedule.db \
//!   cargo run --bin lyceum-server --features "sqlite-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: Backend selection, "local" or "sqlite"
//! - `SCHEDULE_DB_PATH`: SQLite database file (implies the sqlite backend)
//! - `SEED_DEMO_DATA`: Set to 1 to load the demo dataset at startup
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lyceum_schedule::db::{self, ReferenceRepository, RepositoryFactory};
use lyceum_schedule::http::{create_router, AppState};

const SEED_ENV: &str = "SEED_DEMO_DATA";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Lyceum Schedule HTTP Server");

    // Construct the repository once and share it across the app
    let repository = RepositoryFactory::from_env()?;
    info!("Repository initialized successfully");

    if wants_seed() {
        // Seed only into an empty repository so a persistent backend is
        // not duplicated on restart
        let existing = repository.list_classes().await?;
        if existing.is_empty() {
            let summary = db::seed_demo_data(repository.as_ref()).await?;
            info!(
                classes = summary.classes,
                lessons = summary.lessons,
                "demo dataset loaded"
            );
        } else {
            info!(
                classes = existing.len(),
                "repository already populated, skipping seed"
            );
        }
    }

    // Create application state
    let state = AppState::new(repository);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn wants_seed() -> bool {
    matches!(
        env::var(SEED_ENV).ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
