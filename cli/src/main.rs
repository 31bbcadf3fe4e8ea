// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # AEGIS Presence Service
//!
//! The `presence` binary serves the agent-state HTTP API: it ingests
//! agent-activity events and maintains the current status and skill set per
//! agent.
//!
//! ## Storage
//!
//! - **Default**: PostgreSQL via `DATABASE_URL` (schema is bootstrapped on
//!   startup)
//! - **`--in-memory`**: volatile store for local development and demos

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use aegis_presence_core::application::agent_state::StandardAgentStateService;
use aegis_presence_core::domain::repository::AgentStateRepository;
use aegis_presence_core::infrastructure::db::Database;
use aegis_presence_core::infrastructure::repositories::{
    InMemoryAgentStateRepository, PostgresAgentStateRepository,
};
use aegis_presence_core::presentation::api;

/// AEGIS Presence - agent state and skill tracking service
#[derive(Parser)]
#[command(name = "presence")]
#[command(version, about, long_about = None)]
struct Cli {
    /// HTTP API host
    #[arg(long, env = "PRESENCE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// HTTP API port
    #[arg(long, env = "PRESENCE_PORT", default_value = "8080")]
    port: u16,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Use the volatile in-memory store instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PRESENCE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let repository: Arc<dyn AgentStateRepository> = if cli.in_memory {
        info!("using in-memory agent state store");
        Arc::new(InMemoryAgentStateRepository::new())
    } else {
        let database_url = cli
            .database_url
            .context("DATABASE_URL is required unless --in-memory is set")?;

        let database = Database::new(&database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;
        database
            .ensure_schema()
            .await
            .context("Failed to bootstrap presence schema")?;

        info!("connected to PostgreSQL agent state store");
        Arc::new(PostgresAgentStateRepository::new(
            database.get_pool().clone(),
        ))
    };

    let service = Arc::new(StandardAgentStateService::new(repository));
    let app = api::app(service);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("presence service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("presence service shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
