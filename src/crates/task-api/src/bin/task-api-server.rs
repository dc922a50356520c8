//! Task API server binary
//!
//! Standalone server exposing the task REST API over a SQLite store.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use task_api::api::{cors_for, create_router, AppState};
use task_api::config::ServerConfig;
use task_api::db::DatabaseConnection;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "task-api-server")]
#[command(about = "Task tracking REST API backed by SQLite", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to a task-api.toml configuration file
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file and HOST
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides the config file and PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(rust_log))
        .init();

    tracing::info!("Loading server configuration...");
    let mut config = ServerConfig::load(cli.config.as_deref())
        .context("Configuration required. Set CONFIG_PATH or place config/task-api.toml")?;
    config.apply_overrides(|key| std::env::var(key).ok())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let addr = config.socket_addr()?;
    tracing::info!("Server name: {}", config.server.name);
    tracing::info!("Database Path: {}", config.database.path);

    let db = connect(&config).await?;

    tracing::info!("Running database migrations");
    db.run_migrations().await?;

    tracing::info!("Performing database health check");
    db.health_check().await?;

    tracing::info!("Building API router");
    let app = create_router(AppState::new(db.clone(), config.pagination()))
        .layer(cors_for(&config.server.cors_origins));

    tracing::info!("Starting task API server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Task API server shut down gracefully");
    Ok(())
}

async fn connect(config: &ServerConfig) -> anyhow::Result<DatabaseConnection> {
    if config.database.is_in_memory() {
        tracing::warn!("Using an in-memory database; tasks are lost on shutdown");
        return Ok(DatabaseConnection::in_memory().await?);
    }

    let database_url = config.database_url();
    tracing::info!("Connecting to database: {}", database_url);
    DatabaseConnection::with_max_connections(&database_url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", database_url))
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL-C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
