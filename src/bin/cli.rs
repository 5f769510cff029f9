//! CLI for dynawrap diagnostics

use clap::{Parser, Subcommand};
use dynawrap::common::{chunk_plan, parse_intervals, ClientConfig};
use dynawrap::store::{await_endpoint, BackoffPolicy, MAX_BATCH_KEYS};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dynawrap")]
#[command(about = "dynawrap store access diagnostics")]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for a store endpoint to accept connections
    Probe {
        /// Endpoint URL (defaults to the configured endpoint)
        #[arg(long)]
        endpoint: Option<String>,

        /// Backoff schedule, e.g. "0,500ms,1s"
        #[arg(long)]
        intervals: Option<String>,

        /// Per-attempt connect timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Show how many batch-get requests a key set needs
    Plan {
        /// Number of keys
        #[arg(long)]
        keys: usize,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Probe {
            endpoint,
            intervals,
            timeout_ms,
        } => {
            let endpoint = endpoint.unwrap_or_else(|| config.endpoint.clone());
            let policy = match intervals {
                Some(spec) => BackoffPolicy::new(parse_intervals(&spec)?),
                None => config.backoff_policy(),
            };
            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.connect_timeout());

            let outcome = await_endpoint(&endpoint, &policy, timeout).await?;
            println!("Connected to {}", endpoint);
            println!("  Attempts: {}", outcome.attempts);
            println!("  Retries: {}", outcome.retries());
        }

        Commands::Plan { keys } => {
            let (requests, last) = chunk_plan(keys, MAX_BATCH_KEYS);
            println!("Batch plan for {} key(s):", keys);
            println!("  Requests: {}", requests);
            println!("  Last chunk: {}", last);
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
