//! The probe runs behind each CLI subcommand.
//!
//! Each run is a standalone process: build one client, make one call (or one
//! bounded liveness loop), print what happened, exit. Failures are reported
//! with elapsed time and a transport classification; nothing here retries or
//! recovers beyond the configured 0-or-1 transport attempts.

use std::time::Duration;

use anyhow::{bail, Result};
use tracing::debug;

use sonde_lib::client::sync_read_timeout;
use sonde_lib::constants::{payload as payload_defaults, timeouts};
use sonde_lib::stability::watch_connection;
use sonde_lib::{
    payload, response, AgentEndpoint, ClientOptions, ProbeError, RuntimeClient, SessionId,
    StabilityOptions, StabilityOutcome, TaskReport,
};

use crate::{env, report};

/// Parameters of the synchronous probe.
#[derive(Debug, Clone)]
pub struct InvokeConfig {
    pub agent: String,
    pub region: String,
    /// Overrides the derived read timeout (`max(300, duration + 60)`).
    pub read_timeout_secs: Option<u64>,
    /// Extra transport attempts: 0 or 1.
    pub retries: u32,
    pub keep_alive: bool,
    pub filler_bytes: Option<usize>,
    pub tolerance_secs: u64,
    /// When set, a transport failure is checked against this expected
    /// connection-drop time.
    pub expect_drop_after: Option<u64>,
}

/// Parameters of the async start call.
#[derive(Debug, Clone)]
pub struct StartConfig {
    pub agent: String,
    pub region: String,
    pub filler_bytes: Option<usize>,
}

/// Parameters of the async result-fetch call.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub agent: String,
    pub region: String,
}

/// Parameters of the connection-stability probe.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Host to probe; defaults to the regional data plane.
    pub host: Option<String>,
    pub region: String,
    pub port: u16,
    pub window_secs: u64,
    pub interval_secs: u64,
    pub stable_after_secs: u64,
}

/// Synchronous probe: one blocking call, wait for full completion, report
/// duration and payload.
pub async fn run_invoke(config: InvokeConfig) -> Result<()> {
    let prompt =
        env::optional("PROMPT").unwrap_or_else(|| payload_defaults::DEFAULT_PROMPT.to_string());
    let duration = env::parse_u64("DURATION_SECONDS", 0)?;
    let endpoint = AgentEndpoint::from_env(&config.region, &config.agent)?;

    let read_timeout = config
        .read_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| sync_read_timeout(duration));
    let options = ClientOptions {
        connect_timeout: Duration::from_secs(timeouts::CONNECT),
        read_timeout,
        tcp_keepalive: config
            .keep_alive
            .then(|| Duration::from_secs(timeouts::KEEPALIVE_IDLE)),
        retry_attempts: config.retries,
    };
    debug!(?options, "sync probe client options");
    let client = RuntimeClient::new(endpoint, options)?;
    let session_id = SessionId::generate("sonde-sync");
    let request = payload::sync_payload(&prompt, duration, config.filler_bytes);

    println!("🚀 SYNC PROBE: {}", config.agent);
    println!("🎯 Prompt: {prompt}");
    println!(
        "⏱️  Duration: {duration} seconds = {} steps (1 step = 1 minute)",
        payload::sync_steps(duration)
    );
    println!("📝 Session ID: {session_id}");
    println!("⏰ Client read timeout: {} seconds", read_timeout.as_secs());
    if config.keep_alive {
        println!("🔧 TCP keep-alive: ENABLED");
    }
    println!();
    println!("📡 Starting invoke at {}", report::now_hms());
    println!("⏳ Waiting for complete response...");

    match client.invoke(&session_id, &request).await {
        Ok(invocation) => {
            let secs = invocation.elapsed.as_secs_f64();
            println!(
                "✅ RESPONSE RECEIVED after {secs:.1} seconds (HTTP {})",
                invocation.http_status.as_u16()
            );
            println!("📄 Raw Response: {}", invocation.body);
            println!();

            let task_report = TaskReport::from_body(&invocation.body);
            println!("{}", report::render_task_report(&task_report));
            if matches!(task_report, TaskReport::Completed { .. }) {
                println!("🕐 Total Duration: {secs:.1} seconds");
                if duration > 0 {
                    println!(
                        "{}",
                        report::timing_verdict(duration, invocation.elapsed, config.tolerance_secs)
                    );
                }
            }
            Ok(())
        }
        Err(err) => {
            report_transport_failure(&err, config.expect_drop_after);
            Err(err.into())
        }
    }
}

/// Async start: one call that kicks off background work and acknowledges
/// immediately with a task identifier, which is handed to the next pipeline
/// step via a CI output line.
pub async fn run_start(config: StartConfig) -> Result<()> {
    let prompt =
        env::optional("PROMPT").unwrap_or_else(|| payload_defaults::DEFAULT_PROMPT.to_string());
    let duration = env::parse_u64(
        "DURATION_SECONDS",
        payload_defaults::DEFAULT_ASYNC_DURATION_SECS,
    )?;
    let endpoint = AgentEndpoint::from_env(&config.region, &config.agent)?;

    let client = RuntimeClient::new(endpoint, ClientOptions::default())?;
    let session_id = SessionId::generate("sonde-async");
    let request = payload::start_payload(&prompt, duration, config.filler_bytes);

    println!("🚀 ASYNC PROBE: starting task on {}", config.agent);
    println!("🎯 Prompt: {prompt}");
    println!("⏱️  Duration: {duration} seconds");
    println!("📝 Session ID: {session_id}");
    println!();
    println!("📡 Starting async task at {}", report::now_hms());

    match client.invoke(&session_id, &request).await {
        Ok(invocation) => {
            println!(
                "✅ TASK STARTED: response received after {:.1} seconds",
                invocation.elapsed.as_secs_f64()
            );
            println!("📄 Response: {}", invocation.body);

            let Some(task_id) = response::task_id(&invocation.body) else {
                bail!("response did not contain a task_id: {}", invocation.body);
            };
            println!("🆔 Task ID: {task_id}");
            println!("{}", report::ci_output("task_id", &task_id));
            println!();
            println!("🔄 Suggested follow-up for the next pipeline step:");
            println!("   1. poll the runtime's ping endpoint on a fixed interval");
            println!("   2. \"HealthyBusy\" means the background task is still running");
            println!("   3. once it reports \"Healthy\", run: sonde-runner fetch  (TASK_ID={task_id})");
            Ok(())
        }
        Err(err) => {
            report_transport_failure(&err, None);
            Err(err.into())
        }
    }
}

/// Async fetch: given `TASK_ID` from the environment, retrieve and classify
/// the task's results. An unparseable body is reported raw and is NOT a
/// failure of the probe.
pub async fn run_fetch(config: FetchConfig) -> Result<()> {
    let task_id = env::required("TASK_ID")?;
    let endpoint = AgentEndpoint::from_env(&config.region, &config.agent)?;

    let client = RuntimeClient::new(endpoint, ClientOptions::default())?;
    let session_id = SessionId::generate("sonde-results");
    let request = payload::fetch_payload(&task_id);

    println!("🔍 GETTING RESULTS: task {task_id} on {}", config.agent);
    println!("📝 Session ID: {session_id}");
    println!();
    println!("📡 Retrieving results at {}", report::now_hms());

    match client.invoke(&session_id, &request).await {
        Ok(invocation) => {
            println!("✅ RESULTS RETRIEVED (HTTP {})", invocation.http_status.as_u16());
            println!("📄 Raw Response: {}", invocation.body);
            println!();
            println!(
                "{}",
                report::render_task_report(&TaskReport::from_body(&invocation.body))
            );
            Ok(())
        }
        Err(err) => {
            report_transport_failure(&err, None);
            Err(err.into())
        }
    }
}

/// Connection-stability probe: hold a raw TCP connection to the data plane
/// for the observation window and report whether it survived.
pub async fn run_watch(config: WatchConfig) -> Result<()> {
    let host = config
        .host
        .clone()
        .unwrap_or_else(|| AgentEndpoint::default_host(&config.region));
    let environment = if std::env::var("GITHUB_ACTIONS").is_ok() {
        "GitHub Actions"
    } else {
        "local"
    };

    println!("🔍 Probing TCP connection stability");
    println!("🔧 Environment: {environment}");
    println!(
        "⏱️  Window: {}s, liveness check every {}s",
        config.window_secs, config.interval_secs
    );
    println!();

    let options = StabilityOptions {
        window: Duration::from_secs(config.window_secs),
        interval: Duration::from_secs(config.interval_secs),
        ..StabilityOptions::default()
    };
    let outcome = watch_connection(&host, config.port, &options).await?;

    let held = match &outcome {
        StabilityOutcome::Stable { held } => *held,
        StabilityOutcome::Dropped { after, .. } => *after,
    };
    println!("🏁 Probe completed after {}s", held.as_secs());
    println!(
        "{}",
        report::stability_verdict(&outcome, Duration::from_secs(config.stable_after_secs))
    );
    Ok(())
}

/// Prints the diagnostic lines for a classified transport failure.
fn report_transport_failure(err: &ProbeError, expect_drop_after: Option<u64>) {
    println!(
        "❌ PROBE FAILED after {:.1} seconds: {err}",
        err.elapsed().as_secs_f64()
    );
    match err {
        ProbeError::Timeout { .. } => {
            println!("🔍 TIMEOUT: the client gave up waiting for the response");
        }
        ProbeError::Connection { .. } => {
            println!("🔍 CONNECTION: the transport was reset or refused mid-call");
        }
        ProbeError::Other { .. } => {
            println!("🔍 OTHER: unclassified transport error");
        }
    }
    if let Some(expected) = expect_drop_after {
        if !matches!(err, ProbeError::Other { .. }) {
            println!("{}", report::drop_verdict(expected, err.elapsed()));
        }
    }
}
