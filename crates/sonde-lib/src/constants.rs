//! Common configuration values shared across the sonde crates.

/// Service identity
pub mod service {
    /// Region the diagnostic agents are deployed in.
    pub const DEFAULT_REGION: &str = "us-west-2";

    /// DNS prefix of the agent-runtime data plane.
    pub const SERVICE_HOST_PREFIX: &str = "bedrock-agentcore";

    /// TLS port of the data plane, used by the raw stability probe.
    pub const SERVICE_PORT: u16 = 443;

    /// Header carrying the client-generated session identifier.
    pub const SESSION_HEADER: &str = "X-Amzn-Bedrock-AgentCore-Runtime-Session-Id";
}

/// Default timeout values in seconds
pub mod timeouts {
    /// Connect timeout for invocation calls.
    pub const CONNECT: u64 = 30;

    /// Minimum read timeout for the synchronous probe.
    pub const SYNC_READ_FLOOR: u64 = 300;

    /// Extra read-timeout headroom on top of the requested task duration.
    pub const SYNC_READ_BUFFER: u64 = 60;

    /// Read timeout for the async start/fetch calls, which answer immediately.
    pub const ASYNC_READ: u64 = 60;

    /// TCP keep-alive idle threshold when keep-alive probing is enabled.
    pub const KEEPALIVE_IDLE: u64 = 60;
}

/// Connection-stability probe defaults
pub mod stability {
    /// Observation window.
    pub const WINDOW_SECS: u64 = 600;

    /// Liveness-check interval.
    pub const INTERVAL_SECS: u64 = 30;

    /// Connect timeout for the raw TCP connection.
    pub const CONNECT_SECS: u64 = 30;

    /// A run that holds at least this long counts as stable.
    pub const STABLE_AFTER_SECS: u64 = 480;
}

/// Payload defaults
pub mod payload {
    /// Prompt used when the `PROMPT` variable is not set.
    pub const DEFAULT_PROMPT: &str = "tell me a joke";

    /// Default background-task duration for the async start call.
    pub const DEFAULT_ASYNC_DURATION_SECS: u64 = 420;

    /// Filler size used by the retry-reproduction experiments.
    pub const FILLER_BYTES: usize = 50_000;
}
