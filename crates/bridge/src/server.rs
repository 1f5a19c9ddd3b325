//! TCP broadcast server: every connected client receives every sentence.

use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, Semaphore};
use tracing::{info, warn};

use flightbridge_common::Result;

/// Accepts clients forever, refusing any beyond `max_connections`.
pub async fn run(
    listener: TcpListener,
    tx: broadcast::Sender<String>,
    max_connections: usize,
) -> Result<()> {
    let slots = Arc::new(Semaphore::new(max_connections));
    loop {
        let (socket, addr) = listener.accept().await?;
        let Ok(permit) = Arc::clone(&slots).try_acquire_owned() else {
            warn!("Refusing client {}: connection limit reached", addr);
            continue;
        };
        info!("🔌 New client connected: {}", addr);
        let rx = tx.subscribe();
        tokio::spawn(async move {
            handle_client(socket, rx).await;
            info!("Client disconnected: {}", addr);
            drop(permit);
        });
    }
}

async fn handle_client(mut socket: TcpStream, mut rx: broadcast::Receiver<String>) {
    loop {
        match rx.recv().await {
            Ok(sentence) => {
                if socket.write_all(sentence.as_bytes()).await.is_err() {
                    // Client disconnected
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Client lagging, skipped {} sentences", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
