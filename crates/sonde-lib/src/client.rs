use std::io::ErrorKind;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{service, timeouts};
use crate::endpoint::AgentEndpoint;
use crate::session::SessionId;

/// Transport configuration for one probe run.
///
/// `retry_attempts` is the number of EXTRA attempts on a transport failure
/// (0 or 1). It defaults to 0: the probe exists to observe retries that
/// originate outside its own logic, so it must not add any of its own.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub tcp_keepalive: Option<Duration>,
    pub retry_attempts: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(timeouts::CONNECT),
            read_timeout: Duration::from_secs(timeouts::ASYNC_READ),
            tcp_keepalive: None,
            retry_attempts: 0,
        }
    }
}

/// Read timeout for the synchronous probe: at least five minutes, or the
/// requested task duration plus one minute of headroom.
pub fn sync_read_timeout(duration_secs: u64) -> Duration {
    Duration::from_secs(timeouts::SYNC_READ_FLOOR.max(duration_secs + timeouts::SYNC_READ_BUFFER))
}

/// A successful invocation: elapsed wall-clock time plus the raw body, which
/// the caller parses and reports.
#[derive(Debug)]
pub struct Invocation {
    pub elapsed: Duration,
    pub http_status: reqwest::StatusCode,
    pub body: String,
}

/// Transport-level failure, classified for diagnostic reporting only; no
/// automated recovery hangs off these variants.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("read timeout after {elapsed:.1?}")]
    Timeout {
        elapsed: Duration,
        #[source]
        source: reqwest::Error,
    },
    #[error("connection failed after {elapsed:.1?}: {source}")]
    Connection {
        elapsed: Duration,
        #[source]
        source: reqwest::Error,
    },
    #[error("invocation failed after {elapsed:.1?}: {source}")]
    Other {
        elapsed: Duration,
        #[source]
        source: reqwest::Error,
    },
}

impl ProbeError {
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Timeout { elapsed, .. }
            | Self::Connection { elapsed, .. }
            | Self::Other { elapsed, .. } => *elapsed,
        }
    }

    /// Short label used in console summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "connection",
            Self::Other { .. } => "other",
        }
    }
}

/// Client for a single agent-runtime endpoint.
///
/// Wraps a `reqwest` client configured with the probe's timeouts and
/// optional TCP keep-alive. The base URL defaults to the regional data plane
/// and can be pointed at a local mock via `AGENT_RUNTIME_URL`; an optional
/// bearer token is read from `AGENT_API_KEY`.
pub struct RuntimeClient {
    http: reqwest::Client,
    endpoint: AgentEndpoint,
    base_url: String,
    api_key: Option<String>,
    options: ClientOptions,
}

impl RuntimeClient {
    pub fn new(endpoint: AgentEndpoint, options: ClientOptions) -> Result<Self> {
        let base_url = match std::env::var("AGENT_RUNTIME_URL") {
            Ok(url) if !url.is_empty() => {
                println!("[RuntimeClient] Using AGENT_RUNTIME_URL from environment: {url}");
                url
            }
            _ => endpoint.default_base_url(),
        };

        let api_key = match std::env::var("AGENT_API_KEY") {
            Ok(key) if !key.is_empty() => Some(key),
            _ => None,
        };

        let mut builder = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.read_timeout);
        if let Some(idle) = options.tcp_keepalive {
            builder = builder.tcp_keepalive(idle);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint,
            base_url,
            api_key,
            options,
        })
    }

    /// Overrides the base URL, bypassing the environment. Used by tests that
    /// stand up a local mock runtime.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn endpoint(&self) -> &AgentEndpoint {
        &self.endpoint
    }

    /// Issues one invocation call with a bounded wait and classifies the
    /// outcome. Performs at most `1 + retry_attempts` transport attempts;
    /// elapsed time always covers the whole exchange.
    pub async fn invoke(
        &self,
        session_id: &SessionId,
        payload: &Value,
    ) -> Result<Invocation, ProbeError> {
        let url = self.endpoint.invocation_url(&self.base_url);
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(
                url = %url,
                session_id = %session_id,
                attempt,
                "sending invocation request"
            );

            match self.send_once(&url, session_id, payload).await {
                Ok((http_status, body)) => {
                    let elapsed = started.elapsed();
                    debug!(status = %http_status, ?elapsed, "invocation response received");
                    return Ok(Invocation {
                        elapsed,
                        http_status,
                        body,
                    });
                }
                Err(err) if attempt <= self.options.retry_attempts => {
                    warn!(
                        attempt,
                        error = %err,
                        "transport attempt failed, retrying once"
                    );
                }
                Err(err) => return Err(classify(err, started.elapsed())),
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        session_id: &SessionId,
        payload: &Value,
    ) -> Result<(reqwest::StatusCode, String), reqwest::Error> {
        let mut request = self
            .http
            .post(url)
            .query(&[("qualifier", "DEFAULT")])
            .header(service::SESSION_HEADER, session_id.as_str())
            .json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let http_status = response.status();
        let body = response.text().await?;
        Ok((http_status, body))
    }
}

/// Maps a transport error onto the three diagnostic failure kinds.
fn classify(err: reqwest::Error, elapsed: Duration) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout {
            elapsed,
            source: err,
        }
    } else if err.is_connect() || has_connection_cause(&err) {
        ProbeError::Connection {
            elapsed,
            source: err,
        }
    } else {
        ProbeError::Other {
            elapsed,
            source: err,
        }
    }
}

/// Walks the source chain looking for an I/O error that indicates the
/// transport was reset or refused underneath an otherwise generic error.
fn has_connection_cause(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            return matches!(
                io.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::ConnectionRefused
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            );
        }
        source = cause.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_read_timeout_has_a_five_minute_floor() {
        assert_eq!(sync_read_timeout(0), Duration::from_secs(300));
        assert_eq!(sync_read_timeout(120), Duration::from_secs(300));
        assert_eq!(sync_read_timeout(240), Duration::from_secs(300));
    }

    #[test]
    fn sync_read_timeout_tracks_long_durations_with_headroom() {
        assert_eq!(sync_read_timeout(600), Duration::from_secs(660));
        assert_eq!(sync_read_timeout(900), Duration::from_secs(960));
    }
}
