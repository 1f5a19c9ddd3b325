//! Input feed clients.
//!
//! Every configured feed runs as its own task: connect, optionally log in,
//! then hand each received line to the shared state until the peer goes
//! away, the feed asks to stop, or an error occurs. Failed sessions are
//! retried with exponential back-off.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};

use flightbridge_common::{FeedConfig, Protocol, Result};

use crate::state::{AppState, Flow};

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(600);
const MIN_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);
const MAX_FILTER_KM: i32 = 500;

/// How a session ended without an error.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// The feed has nothing more to contribute.
    Finished,
    /// The peer closed the connection.
    Closed,
}

#[derive(Debug)]
struct Backoff {
    next: Duration,
}

impl Backoff {
    fn new() -> Self {
        Self { next: MIN_BACKOFF }
    }

    fn reset(&mut self) {
        self.next = MIN_BACKOFF;
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(MAX_BACKOFF);
        delay
    }
}

/// Runs a feed until it finishes for good.
pub async fn run(feed: FeedConfig, state: Arc<AppState>) {
    let mut backoff = Backoff::new();
    loop {
        match session(&feed, &state, &mut backoff).await {
            Ok(SessionEnd::Finished) => {
                info!(feed = %feed.name, "Feed finished");
                return;
            }
            Ok(SessionEnd::Closed) => warn!(feed = %feed.name, "Connection closed by peer"),
            Err(e) => warn!(feed = %feed.name, error = %e, "Feed connection failed"),
        }
        let delay = backoff.next_delay();
        info!(feed = %feed.name, "Reconnecting in {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

async fn session(feed: &FeedConfig, state: &AppState, backoff: &mut Backoff) -> Result<SessionEnd> {
    let stream = TcpStream::connect((feed.host.as_str(), feed.port)).await?;
    info!(feed = %feed.name, "Connected to {}:{}", feed.host, feed.port);
    backoff.reset();

    let (reader, mut writer) = stream.into_split();
    let is_aprs = feed.protocol == Protocol::Aprs;
    if is_aprs {
        writer.write_all(login_line(feed, state).as_bytes()).await?;
    }

    let mut lines = BufReader::new(reader).lines();
    let mut keepalive = interval_at(Instant::now() + KEEPALIVE_INTERVAL, KEEPALIVE_INTERVAL);
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if state.ingest(feed.protocol, feed.priority, &line) == Flow::Stop {
                        return Ok(SessionEnd::Finished);
                    }
                }
                None => return Ok(SessionEnd::Closed),
            },
            _ = keepalive.tick(), if is_aprs => {
                writer.write_all(b"#keepalive\r\n").await?;
            }
        }
    }
}

/// APRS-IS login; read-only (`pass -1`) with a range filter around the
/// current reference position.
fn login_line(feed: &FeedConfig, state: &AppState) -> String {
    let call = feed.login.as_deref().unwrap_or("anon");
    let location = state.gps.location();
    let radius_km = (state.max_dist() / 1000).clamp(1, MAX_FILTER_KM);
    format!(
        "user {} pass -1 vers {} {} filter r/{:.4}/{:.4}/{}\r\n",
        call,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        location.latitude(),
        location.longitude(),
        radius_km
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::sync::broadcast;

    fn state() -> Arc<AppState> {
        let config = envy::from_iter(vec![
            ("LATITUDE".to_string(), "49.5".to_string()),
            ("LONGITUDE".to_string(), "8.25".to_string()),
            ("MAX_DIST".to_string(), "40000".to_string()),
        ])
        .unwrap();
        let (tx, _rx) = broadcast::channel(16);
        Arc::new(AppState::new(&config, &tx).unwrap())
    }

    fn feed(protocol: Protocol, port: u16) -> FeedConfig {
        FeedConfig {
            name: "test".to_string(),
            protocol,
            host: "127.0.0.1".to_string(),
            port,
            priority: 1,
            login: Some("N0CALL".to_string()),
        }
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let mut backoff = Backoff::new();
        let delays: Vec<u64> = (0..8).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 32, 60, 60]);
        backoff.reset();
        assert_eq!(backoff.next_delay(), MIN_BACKOFF);
    }

    #[test]
    fn login_carries_range_filter() {
        let line = login_line(&feed(Protocol::Aprs, 0), &state());
        assert!(line.starts_with("user N0CALL pass -1 vers flightbridge "));
        assert!(line.ends_with(" filter r/49.5000/8.2500/40\r\n"), "{line}");
    }

    #[tokio::test]
    async fn session_feeds_lines_until_peer_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let peer = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket
                .write_all(b"MSG,3,1,1,3C65AC,1,2024/05/17,00:00:01.000,2024/05/17,00:00:01.000,,5000,,,49.51,8.26,,,0,0,0,0\r\n")
                .await
                .unwrap();
        });

        let state = state();
        let mut backoff = Backoff::new();
        let end = session(&feed(Protocol::Sbs, port), &state, &mut backoff).await.unwrap();
        peer.await.unwrap();

        assert_eq!(end, SessionEnd::Closed);
        assert_eq!(state.aircraft.len(), 1);
    }

    #[tokio::test]
    async fn aprs_session_logs_in() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let peer = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 256];
            let n = socket.read(&mut buf).await.unwrap();
            String::from_utf8_lossy(&buf[..n]).to_string()
        });

        let state = state();
        let mut backoff = Backoff::new();
        let end = session(&feed(Protocol::Aprs, port), &state, &mut backoff).await.unwrap();
        let login = peer.await.unwrap();

        assert_eq!(end, SessionEnd::Closed);
        assert!(login.starts_with("user N0CALL pass -1"), "{login}");
    }
}
