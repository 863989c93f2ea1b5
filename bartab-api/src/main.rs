//! # BarTab API Server
//!
//! The API server for BarTab, a bar-tab ledger: customers accrue charges
//! and make payments against a running balance, recorded by operators
//! through a role-gated REST API.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p bartab-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bartab_api::{
    app::{build_router, AppState},
    config::Config,
};
use bartab_shared::db::{migrations, pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bartab_api=debug,bartab_shared=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("BarTab API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let status = migrations::get_migration_status(&db).await?;
    tracing::info!(
        applied_migrations = status.applied_migrations,
        "database schema ready"
    );

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing pool");
    pool::close_pool(db).await;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}
