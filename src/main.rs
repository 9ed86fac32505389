//! Triage Risk Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use triage_risk_engine::metrics::Metrics;
use triage_risk_engine::thresholds::Thresholds;

/// Compact tracing logs; filter overridable via RUST_LOG.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("triage_risk_engine=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let thresholds = Thresholds::load_from_file(
        std::env::var("THRESHOLDS_CONFIG_PATH")
            .unwrap_or_else(|_| "config/thresholds.json".to_string()),
    );
    let metrics = Metrics::init(thresholds.watch_threshold, thresholds.act_now_threshold)?;

    let router = triage_risk_engine::create_router().merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "triage risk service listening");
    axum::serve(listener, router).await?;

    Ok(())
}
