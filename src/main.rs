// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TrackBuddy API Server
//!
//! Serves the location and activity REST API over a SQLite database.

use anyhow::Context;
use std::sync::Arc;
use trackbuddy::{config::Config, db::Db, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(port = config.port, "Starting TrackBuddy API");

    // Open the database and apply migrations
    let db = match &config.database_path {
        Some(path) => Db::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?,
        None => {
            tracing::warn!("DATABASE_PATH is :memory:, data will not survive a restart");
            Db::open_in_memory().context("failed to open in-memory database")?
        }
    };

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
    });

    // Build router
    let app = trackbuddy::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trackbuddy=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
