use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use sonde_lib::constants::{service, stability};
use sonde_runner::commands::{self, FetchConfig, InvokeConfig, StartConfig, WatchConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Diagnostic probes for a managed agent-runtime invocation service.
///
/// Each subcommand is one standalone probe run; run parameters that belong
/// to the CI pipeline (account identity, prompt, durations, task id) come
/// from the environment, everything else from flags.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log every transport-level event (connection open, send, timeout,
    /// close) by widening the filter to DEBUG for the HTTP stack.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synchronous probe: one blocking call, wait for full completion.
    ///
    /// Reads PROMPT and DURATION_SECONDS from the environment; the read
    /// timeout derives from the duration unless overridden.
    Invoke {
        /// Logical agent-runtime name to invoke.
        #[arg(long, default_value = "syncAgent_v2")]
        agent: String,
        #[arg(long, default_value = service::DEFAULT_REGION)]
        region: String,
        /// Read timeout in seconds; defaults to max(300, duration + 60).
        #[arg(long)]
        read_timeout: Option<u64>,
        /// Extra transport attempts on failure (0 or 1).
        #[arg(long, default_value_t = 0)]
        retries: u32,
        /// Enable TCP keep-alive on the client socket.
        #[arg(long)]
        keep_alive: bool,
        /// Pad the request with a large_data field of this many bytes.
        #[arg(long)]
        filler_bytes: Option<usize>,
        /// Tolerance in seconds for the timing verification.
        #[arg(long, default_value_t = 10)]
        tolerance: u64,
        /// Expected connection-drop time in seconds; transport failures are
        /// checked against it (±20 s).
        #[arg(long)]
        expect_drop_after: Option<u64>,
    },
    /// Async probe, step 1: start background work, print the task id and the
    /// CI output line for the next pipeline step.
    Start {
        #[arg(long, default_value = "asyncAgent_v3")]
        agent: String,
        #[arg(long, default_value = service::DEFAULT_REGION)]
        region: String,
        /// Pad the request with a large_data field of this many bytes.
        #[arg(long)]
        filler_bytes: Option<usize>,
    },
    /// Async probe, step 2: fetch results for the task named by TASK_ID.
    Fetch {
        #[arg(long, default_value = "asyncAgent_v3")]
        agent: String,
        #[arg(long, default_value = service::DEFAULT_REGION)]
        region: String,
    },
    /// Connection-stability probe: hold a raw TCP connection to the data
    /// plane and check liveness on a fixed interval.
    Watch {
        /// Host to probe; defaults to the regional data-plane endpoint.
        #[arg(long)]
        host: Option<String>,
        #[arg(long, default_value = service::DEFAULT_REGION)]
        region: String,
        #[arg(long, default_value_t = service::SERVICE_PORT)]
        port: u16,
        /// Observation window in seconds.
        #[arg(long, default_value_t = stability::WINDOW_SECS)]
        window: u64,
        /// Liveness-check interval in seconds.
        #[arg(long, default_value_t = stability::INTERVAL_SECS)]
        interval: u64,
        /// A run that holds at least this long counts as stable.
        #[arg(long, default_value_t = stability::STABLE_AFTER_SECS)]
        stable_after: u64,
    },
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "info,sonde_lib=debug,sonde_runner=debug,reqwest=debug,hyper=debug,hyper_util=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Invoke {
            agent,
            region,
            read_timeout,
            retries,
            keep_alive,
            filler_bytes,
            tolerance,
            expect_drop_after,
        } => {
            commands::run_invoke(InvokeConfig {
                agent,
                region,
                read_timeout_secs: read_timeout,
                retries,
                keep_alive,
                filler_bytes,
                tolerance_secs: tolerance,
                expect_drop_after,
            })
            .await
        }
        Command::Start {
            agent,
            region,
            filler_bytes,
        } => {
            commands::run_start(StartConfig {
                agent,
                region,
                filler_bytes,
            })
            .await
        }
        Command::Fetch { agent, region } => commands::run_fetch(FetchConfig { agent, region }).await,
        Command::Watch {
            host,
            region,
            port,
            window,
            interval,
            stable_after,
        } => {
            commands::run_watch(WatchConfig {
                host,
                region,
                port,
                window_secs: window,
                interval_secs: interval,
                stable_after_secs: stable_after,
            })
            .await
        }
    }
}
