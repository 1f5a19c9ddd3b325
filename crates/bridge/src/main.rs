//! flightbridge - fuses aircraft, GPS and weather feeds into one stream of
//! FLARM/NMEA sentences.
//!
//! Input feeds (APRS/OGN, SBS, GPS, weather sensors) push decoded reports
//! into the fused stores. Once per second the serve loop regenerates a
//! sentence per record and broadcasts it to every connected TCP client.

mod decode;
mod feed;
mod server;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;

use flightbridge_common::{init_tracing, Config};

use crate::state::AppState;

const SERVE_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing("flightbridge", &config.log_level, config.log_json);
    let feeds = config.feed_configs()?;
    if feeds.is_empty() {
        tracing::warn!("No feeds configured, only the reference position will be served");
    }

    let (tx, _rx) = broadcast::channel(1024);
    let state = Arc::new(AppState::new(&config, &tx)?);

    let listener = TcpListener::bind(("0.0.0.0", config.server_port))
        .await
        .context("Failed to bind server port")?;
    tracing::info!("🚀 Serving on 0.0.0.0:{}", config.server_port);
    let server_tx = tx.clone();
    let max_connections = config.max_connections;
    tokio::spawn(async move {
        if let Err(e) = server::run(listener, server_tx, max_connections).await {
            tracing::error!("Server error: {}", e);
        }
    });

    for feed in feeds {
        tracing::info!(feed = %feed.name, protocol = ?feed.protocol, priority = feed.priority, "Starting feed");
        tokio::spawn(feed::run(feed, Arc::clone(&state)));
    }

    tokio::select! {
        _ = serve(&state) => {},
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Runs one serve cycle per interval, forever.
async fn serve(state: &AppState) {
    let mut interval = tokio::time::interval(SERVE_INTERVAL);
    loop {
        interval.tick().await;
        state.serve();
    }
}
