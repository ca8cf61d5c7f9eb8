use anyhow::Context;
use clap::Parser;
use gradesd::config::{Args, ServiceConfig};
use gradesd::db::Store;
use gradesd::http::{self, AppState};
use std::io::Write;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout only carries the "listening on" line.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ServiceConfig::from_args(Args::parse())?;
    let store = Store::open(&config.db_path, config.busy_timeout)
        .with_context(|| format!("failed to open store at {}", config.db_path.display()))?;

    let state = AppState::new(
        store.clone(),
        config.column_labels.clone(),
        config.max_upload_bytes,
    );
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, db = %store.path().display(), "gradesd listening");

    let mut stdout = std::io::stdout();
    writeln!(stdout, "listening on {addr}")?;
    stdout.flush()?;

    axum::serve(listener, http::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("gradesd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
