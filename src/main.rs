use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use clusterwatch::address::ApiServer;
use clusterwatch::config::{StatusPolicy, SubmitConfig, WatchConfig, DEFAULT_API_SERVER};
use clusterwatch::coordinator::HttpCoordinator;
use clusterwatch::dashboard::{run_dashboard, DashboardState};
use clusterwatch::monitor::Monitor;
use clusterwatch::render::{render_jobs, render_workers};
use clusterwatch::shutdown::install_shutdown_handler;
use clusterwatch::snapshot::{Snapshot, SnapshotView};
use clusterwatch::submit::Submitter;

#[derive(Parser, Debug)]
#[command(name = "clusterwatch")]
#[command(version)]
#[command(about = "Watch a job-processing cluster and submit paced batches of jobs")]
#[command(propagate_version = true)]
struct Args {
    #[command(flatten)]
    coordinator: CoordinatorArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Poll the coordinator and print the job and worker timelines
    Watch(WatchArgs),

    /// Submit a paced batch of new jobs
    Submit(SubmitArgs),

    /// Poll in the background and serve the state as JSON over HTTP
    Serve(ServeArgs),
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(clap::Args, Debug)]
struct CoordinatorArgs {
    /// Coordinator address (host:port, no scheme)
    #[arg(long = "apiserver", short = 'a', global = true, default_value = DEFAULT_API_SERVER)]
    api_server: String,

    /// Poll period in milliseconds
    #[arg(long, global = true, default_value = "1000")]
    poll_interval_ms: u64,

    /// Per-request timeout in milliseconds (no timeout when omitted)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// What to do when the coordinator answers with an error status
    #[arg(long, global = true, default_value = "surface")]
    status_policy: StatusPolicyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusPolicyArg {
    /// Clear the view and show the error
    Surface,
    /// Log it and keep the previous view
    Skip,
}

impl From<StatusPolicyArg> for StatusPolicy {
    fn from(arg: StatusPolicyArg) -> Self {
        match arg {
            StatusPolicyArg::Surface => StatusPolicy::Surface,
            StatusPolicyArg::Skip => StatusPolicy::Skip,
        }
    }
}

#[derive(clap::Args, Debug)]
struct WatchArgs {
    /// Print the first snapshot and exit
    #[arg(long)]
    once: bool,

    /// Which view to print
    #[arg(long, default_value = "all")]
    view: ViewArg,

    /// Jobs shown per worker (0 shows all)
    #[arg(long, default_value = "5")]
    recent: usize,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    Jobs,
    Workers,
    All,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(clap::Args, Debug)]
struct SubmitArgs {
    /// Number of jobs to request
    #[arg(long, short = 'n', default_value = "5")]
    quantity: u32,

    /// Seconds to wait after each request
    #[arg(long, short = 'i', default_value = "3")]
    interval: f64,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Port for the JSON dashboard
    #[arg(long, default_value = "8090")]
    port: u16,

    /// Default quantity for submissions that do not specify one
    #[arg(long, default_value = "5")]
    quantity: u32,

    /// Default interval for submissions that do not specify one
    #[arg(long, default_value = "3")]
    interval: f64,
}

impl CoordinatorArgs {
    fn to_config(&self) -> WatchConfig {
        let mut config = WatchConfig::new(self.api_server.clone())
            .with_poll_interval_ms(self.poll_interval_ms)
            .with_status_policy(self.status_policy.into());
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_request_timeout_ms(timeout_ms);
        }
        config
    }
}

// =============================================================================
// Command Handlers
// =============================================================================

fn print_snapshot(
    snapshot: &Snapshot,
    args: &WatchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let recent = if args.recent == 0 {
        None
    } else {
        Some(args.recent)
    };

    match args.output {
        OutputFormat::Json => {
            let view = SnapshotView::new(snapshot, recent);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Table => {
            if snapshot.is_error() {
                // The banner replaces both views; print it once.
                print!("{}", render_jobs(snapshot));
                return Ok(());
            }
            if matches!(args.view, ViewArg::Jobs | ViewArg::All) {
                println!("All Jobs");
                println!("{}", "=".repeat(40));
                print!("{}", render_jobs(snapshot));
                println!();
            }
            if matches!(args.view, ViewArg::Workers | ViewArg::All) {
                println!("Jobs by Workers");
                println!("{}", "=".repeat(40));
                print!("{}", render_workers(snapshot, recent));
            }
        }
    }
    Ok(())
}

async fn run_watch(
    config: WatchConfig,
    args: WatchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = install_shutdown_handler();
    let monitor = Monitor::connect(&config)?;
    let mut reader = monitor.reader();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            next = reader.changed() => {
                let Some(snapshot) = next else { break };
                print_snapshot(&snapshot, &args)?;
                if args.once {
                    break;
                }
            }
        }
    }

    monitor.shutdown().await;
    Ok(())
}

async fn run_submit(
    config: WatchConfig,
    args: SubmitArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = install_shutdown_handler();
    let coordinator = HttpCoordinator::new().with_timeout(config.request_timeout());
    let submitter = Submitter::new(Arc::new(coordinator), ApiServer::new(config.api_server));

    let handle = submitter.submit(args.quantity, args.interval).await;
    let canceller = handle.cancellation_token();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        canceller.cancel();
    });

    let report = handle.wait().await;
    println!(
        "Requested {} of {} jobs{}",
        report.issued,
        args.quantity,
        if report.cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}

async fn run_serve(
    config: WatchConfig,
    args: ServeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = install_shutdown_handler();
    let monitor = Arc::new(Monitor::connect(&config)?);
    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;

    let state = DashboardState {
        monitor: monitor.clone(),
        submit_defaults: SubmitConfig {
            quantity: args.quantity,
            interval_secs: args.interval,
        },
    };

    let result = run_dashboard(addr, state, shutdown).await;
    monitor.shutdown().await;
    result?;
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.coordinator.to_config();
    config.validate()?;

    match args.command {
        Commands::Watch(watch_args) => run_watch(config, watch_args).await?,
        Commands::Submit(submit_args) => run_submit(config, submit_args).await?,
        Commands::Serve(serve_args) => run_serve(config, serve_args).await?,
    }

    Ok(())
}
