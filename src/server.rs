//! HTTP server initialization and runtime setup.
//!
//! Selects the registry backend, spawns the background workers, and runs the
//! Axum server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::domain::registry::Registry;
use crate::infrastructure::persistence::{MemoryRegistry, PgRegistry};
use crate::infrastructure::sweeper::run_sweeper;
use crate::routes::app_router;
use crate::state::AppState;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the registry backend (PostgreSQL when configured, in-memory otherwise)
/// - database migrations (PostgreSQL only)
/// - the background click worker
/// - the expiry sweeper (when enabled)
/// - the Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migrations, or server bind
/// fail, or on a server runtime error.
pub async fn run(config: Config) -> Result<()> {
    let registry: Arc<dyn Registry> = match config.database_url {
        Some(ref database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            Arc::new(PgRegistry::new(Arc::new(pool)))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set; using in-memory registry (state is lost on restart)"
            );
            Arc::new(MemoryRegistry::new())
        }
    };

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    tokio::spawn(run_click_worker(click_rx, registry.clone()));
    tracing::info!("Click worker started");

    if config.sweep_interval_secs > 0 {
        tokio::spawn(run_sweeper(
            registry.clone(),
            Duration::from_secs(config.sweep_interval_secs),
        ));
        tracing::info!("Expiry sweeper started");
    }

    let state = AppState::new(
        registry,
        click_tx,
        config.base_url.clone(),
        config.default_ttl_days,
    );

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
