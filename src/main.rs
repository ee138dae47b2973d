use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use finance_api::config::{self, AppConfig};
use finance_api::database::{IncomeStore, MemoryIncomeStore, PgIncomeStore};
use finance_api::{app, AppState};

/// Personal finance record API
#[derive(Debug, Parser)]
#[command(name = "finance-api", version, about)]
struct Cli {
    /// Port to listen on (overrides PORT / FINANCE_API_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides BIND_ADDRESS)
    #[arg(long)]
    bind: Option<String>,

    /// Keep records in memory even when DATABASE_URL is set
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = apply_cli(config::config().clone(), &cli);
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Finance API in {:?} mode", config.environment);

    let store = build_store(&config, cli.in_memory).await?;
    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let state = AppState::new(config, store.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Finance API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Finance API stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("finance_api=info,tower_http=info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn apply_cli(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }
    config
}

async fn build_store(config: &AppConfig, in_memory: bool) -> anyhow::Result<Arc<dyn IncomeStore>> {
    if in_memory || config.database.url.is_none() {
        tracing::warn!("No database configured; records are kept in memory and lost on exit");
        return Ok(Arc::new(MemoryIncomeStore::new()));
    }

    let store = PgIncomeStore::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        store.migrate().await.context("failed to run migrations")?;
    }
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
