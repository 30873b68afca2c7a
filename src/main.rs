use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use summarize_api::cli::{Cli, Commands};
use summarize_api::config::{AppConfig, DatabaseConfig, Environment};
use summarize_api::database::{DatabaseManager, PgStore};
use summarize_api::services::NlpCloudClient;
use summarize_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(Environment::from_env());

    match cli.command_or_default() {
        Commands::Migrate => migrate().await,
        Commands::Serve {
            port,
            skip_migrations,
        } => serve(port, skip_migrations).await,
    }
}

fn init_tracing(environment: Environment) {
    let default_filter = match environment {
        Environment::Development => "summarize_api=debug,tower_http=debug",
        _ => "summarize_api=info,tower_http=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

/// Only `DATABASE_URL` (and optional pool settings) are needed here.
async fn migrate() -> anyhow::Result<()> {
    let database = DatabaseConfig::from_env().context("invalid database configuration")?;
    let pool = DatabaseManager::connect(&database)
        .await
        .context("could not connect to the database")?;

    DatabaseManager::migrate(&pool).await?;
    pool.close().await;
    Ok(())
}

async fn serve(port: Option<u16>, skip_migrations: bool) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting summarize-api in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("could not connect to the database")?;
    if !skip_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let summarizer = NlpCloudClient::new(&config.summarizer)
        .context("could not build the summarization client")?;
    let store = Arc::new(PgStore::new(pool.clone()));
    let bind_addr = config.bind_addr();

    let state = AppState::with_store(config, store, Arc::new(summarizer))
        .context("could not initialise token signing")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, summarize_api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
