use anyhow::Context;
use clap::Parser;
use gas_ticker::cli::Cli;
use gas_ticker::db::{create_pool, run_migrations};
use gas_ticker::logging::{init_logging, LoggingConfig};
use gas_ticker::metrics::WatchMetrics;
use gas_ticker::registry::GasRegistry;
use gas_ticker::server::TickerServer;
use gas_ticker::store::Persistence;
use gas_ticker::watcher::GasWatcher;
use std::io::IsTerminal;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_config = LoggingConfig::from_args(
        cli.quiet,
        cli.verbose > 0,
        cli.json,
        std::io::stdout().is_terminal(),
    )
    .with_file(cli.log_file.clone());

    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let persistence = match &cli.db {
        Some(path) => {
            let pool = create_pool(path)
                .await
                .with_context(|| format!("Failed to open database {}", path.display()))?;
            run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Database: {}", path.display());
            Persistence::sqlite(pool)
        },
        None => Persistence::Disabled,
    };
    if !persistence.is_enabled() {
        tracing::warn!("No database configured, watched networks will not be persisted");
    }

    if cli.gas_api_url.is_none() {
        tracing::warn!("No gas API configured, watchers will not poll prices");
    }

    let watcher = GasWatcher::new(cli.gas_api_url.clone(), cli.discord_api_url.clone())
        .context("Failed to build HTTP client")?;
    let metrics = WatchMetrics::new().context("Failed to register metrics")?;
    let registry = Arc::new(GasRegistry::new(persistence, Arc::new(watcher), metrics));

    TickerServer::new(cli.bind_addr(), registry)
        .run(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
