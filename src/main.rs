use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use writers_hub::config::{Cli, Config};
use writers_hub::state::AppState;
use writers_hub::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli)?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;
    let config = Config::load(&cli)?;
    tracing::info!(
        data_dir = %data_dir.display(),
        db = %config.db_path().display(),
        "Starting writers hub"
    );

    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server.host / server.port")?;
    let app = routes::app(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
