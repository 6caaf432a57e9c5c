//! txstats server - rolling one-minute transaction statistics over HTTP
//!
//! Usage:
//!   cargo run --release --bin txstats_server
//!
//! Environment variables:
//!   TXSTATS_BIND_ADDR - listen address (default: 127.0.0.1:8080)
//!   TXSTATS_WINDOW_MS - statistics window (default: 60000)
//!   TXSTATS_MAX_AGE_SECS - freshness threshold (default: 60)
//!   TXSTATS_SWEEP_INTERVAL_SECS - retention sweep period (default: 120)
//!   TXSTATS_RETENTION_MS - bucket retention (default: 120000)
//!   RUST_LOG - log filter (default: info)

use dotenv::dotenv;
use log::{error, info};
use std::sync::Arc;
use txstats::{create_router, ServerConfig, StatsConfig, StatsEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    info!("🚀 Starting txstats");

    let stats_config = StatsConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    info!("📊 Configuration:");
    info!("   ├─ Bind address: {}", server_config.bind_addr);
    info!("   ├─ Window: {}ms", stats_config.window_ms);
    info!("   ├─ Max age: {}s", stats_config.max_age_secs);
    info!("   ├─ Sweep interval: {}s", stats_config.sweep_interval_secs);
    info!("   └─ Retention: {}ms", stats_config.retention_ms);

    let engine = Arc::new(StatsEngine::new(stats_config));
    let app = create_router(engine.clone());

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr).await?;
    info!("✅ Listening on {}", listener.local_addr()?);
    info!("🔄 Press CTRL+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    engine.shutdown();
    info!("✅ txstats stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("⚠️  Received CTRL+C, shutting down..."),
        Err(err) => error!("❌ Failed to listen for CTRL+C: {}", err),
    }
}
