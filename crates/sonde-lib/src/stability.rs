//! Raw TCP connection-stability probe.
//!
//! Opens one connection to a host/port and holds it for a bounded
//! observation window, checking liveness every interval with a zero-byte
//! write plus a non-blocking read (which is what actually notices an EOF or
//! reset on an otherwise idle socket). Independent of the agent protocol:
//! this isolates runner-side connection drops from service behavior.

use std::io::ErrorKind;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};

use crate::constants::stability;

#[derive(Debug, Clone)]
pub struct StabilityOptions {
    pub connect_timeout: Duration,
    pub window: Duration,
    pub interval: Duration,
}

impl Default for StabilityOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(stability::CONNECT_SECS),
            window: Duration::from_secs(stability::WINDOW_SECS),
            interval: Duration::from_secs(stability::INTERVAL_SECS),
        }
    }
}

/// How one observation run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StabilityOutcome {
    /// The window elapsed without a transport-level error.
    Stable { held: Duration },
    /// The transport failed mid-window.
    Dropped { after: Duration, reason: String },
}

/// Connects and watches the connection until the window elapses or the
/// transport fails. The loop always terminates at or before the window, even
/// if the connection stays alive indefinitely.
pub async fn watch_connection(
    host: &str,
    port: u16,
    options: &StabilityOptions,
) -> Result<StabilityOutcome> {
    println!("📡 Connecting to {host}:{port}");
    let stream = timeout(options.connect_timeout, TcpStream::connect((host, port)))
        .await
        .with_context(|| format!("connect to {host}:{port} timed out"))?
        .with_context(|| format!("failed to connect to {host}:{port}"))?;
    println!("✅ TCP connection established");

    let started = Instant::now();
    loop {
        let elapsed = started.elapsed();
        if elapsed >= options.window {
            return Ok(StabilityOutcome::Stable { held: elapsed });
        }

        let wait = (options.window - elapsed).min(options.interval);
        sleep(wait).await;
        if started.elapsed() >= options.window {
            return Ok(StabilityOutcome::Stable {
                held: started.elapsed(),
            });
        }

        if let Some(reason) = liveness_error(&stream) {
            let after = started.elapsed();
            println!("❌ Connection dropped after {}: {reason}", clock(after));
            return Ok(StabilityOutcome::Dropped { after, reason });
        }
        println!("   ✅ Connection alive at {}", clock(started.elapsed()));
    }
}

/// One liveness check. Returns the failure reason if the transport is gone.
fn liveness_error(stream: &TcpStream) -> Option<String> {
    // A zero-byte write surfaces a reset or broken pipe on a dead socket.
    if let Err(e) = stream.try_write(&[]) {
        if e.kind() != ErrorKind::WouldBlock {
            return Some(format!("write failed: {e}"));
        }
    }

    // An idle peer should leave the socket readable-but-empty; a clean close
    // shows up as a zero-length read.
    let mut buf = [0u8; 1];
    match stream.try_read(&mut buf) {
        Ok(0) => Some("connection closed by peer".to_string()),
        Ok(_) => None,
        Err(e) if e.kind() == ErrorKind::WouldBlock => None,
        Err(e) => Some(format!("read failed: {e}")),
    }
}

fn clock(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}m {}s", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_renders_minutes_and_seconds() {
        assert_eq!(clock(Duration::from_secs(0)), "0m 0s");
        assert_eq!(clock(Duration::from_secs(90)), "1m 30s");
        assert_eq!(clock(Duration::from_secs(600)), "10m 0s");
    }
}
