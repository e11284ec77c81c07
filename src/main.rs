use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use task_tracker_api::auth::issue_token;
use task_tracker_api::config::{self, AppConfig, StorageBackend};
use task_tracker_api::database::{DatabaseManager, MemoryTaskStore, PgTaskStore, TaskStore};
use task_tracker_api::{app, AppState};

#[derive(Parser)]
#[command(name = "task-tracker-api")]
#[command(about = "Multi-user task tracking API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Bind host (overrides HOST)")]
        host: Option<String>,
        #[arg(long, help = "Bind port (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Print a signed development credential for a user id")]
    Token {
        #[arg(long, help = "User id the credential identifies")]
        user_id: Uuid,
        #[arg(long, help = "Lifetime in hours (defaults to JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::config();
    config.validate().context("invalid configuration")?;

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::Token { user_id, hours } => {
            let hours = hours.unwrap_or(config.security.jwt_expiry_hours);
            let token = issue_token(&config.security.jwt_secret, user_id, hours)?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting Task Tracker API in {:?} mode", config.environment);

    let store = open_store(config).await?;
    let state = AppState::new(&config.security.jwt_secret, store);

    let mut router = app(state);
    if let Some(cors) = task_tracker_api::app::cors_layer(&config.security) {
        router = router.layer(cors);
    }

    let bind_addr = format!(
        "{}:{}",
        host.unwrap_or_else(|| config.server.host.clone()),
        port.unwrap_or(config.server.port)
    );
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Task Tracker API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn TaskStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory task storage; data is lost on restart");
            Ok(Arc::new(MemoryTaskStore::new()))
        }
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            DatabaseManager::ensure_schema(&pool)
                .await
                .context("failed to prepare task schema")?;
            Ok(Arc::new(PgTaskStore::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
