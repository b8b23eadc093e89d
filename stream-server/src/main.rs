//! Telefilter stream server
//!
//! Accepts Media Streams WebSocket connections, filters the µ-law audio of
//! each call through the configured filter and writes raw and filtered WAV
//! files when the call stops.

mod config;
mod connection;
mod media;
mod recorder;

use anyhow::{Context, Result};
use config::AppConfig;
use std::sync::Arc;
use telefilter::filters::response::magnitude_db;
use telefilter::Filter;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Frequencies at which the designed response is logged on startup
const PROBE_FREQUENCIES_HZ: [f64; 5] = [100.0, 300.0, 1000.0, 2000.0, 3400.0];

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    init_tracing();

    let config = AppConfig::load()?;
    config.validate()?;

    info!("Starting telefilter-server v{}", env!("CARGO_PKG_VERSION"));

    let filter = config.filter.design().context("Failed to design filter")?;
    log_filter(&config, &filter);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Listening for media streams on {}", bind_addr);

    let config = Arc::new(config);
    let filter = Arc::new(filter);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!("Accept failed: {}", e);
                        continue;
                    }
                };

                let config = Arc::clone(&config);
                let filter = Arc::clone(&filter);
                tokio::spawn(async move {
                    if let Err(e) = connection::handle_connection(stream, peer, config, filter).await {
                        error!(%peer, "Connection failed: {:#}", e);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping server...");
                break;
            }
        }
    }

    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` if set, otherwise info with debug for the filter crates
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,telefilter=debug,telefilter_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn log_filter(config: &AppConfig, filter: &Filter) {
    info!(
        topology = %config.filter.topology,
        sample_rate = config.filter.sample_rate_hz,
        coefficients = filter.coefficients().len(),
        "Filter designed"
    );

    for freq in PROBE_FREQUENCIES_HZ {
        if freq < config.filter.nyquist_hz() {
            let gain = magnitude_db(filter.response(freq, config.filter.sample_rate_hz));
            info!("  {:>6.0} Hz: {:+.1} dB", freq, gain);
        }
    }
}
