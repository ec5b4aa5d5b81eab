use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shiftopt::infrastructure::logging;
use shiftopt::{SchedulerConfig, SchedulerInput, ShiftScheduler};

/// Build an optimized weekly shift schedule from a JSON request.
#[derive(Debug, Parser)]
#[command(name = "shiftopt", version, about)]
struct Cli {
    /// Scheduling request (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Scheduler configuration (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solver time limit in seconds, overriding the configuration
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => SchedulerConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SchedulerConfig::default(),
    };

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading request {}", cli.input.display()))?;
    let input: SchedulerInput = serde_json::from_str(&raw)
        .with_context(|| format!("parsing request {}", cli.input.display()))?;

    let scheduler = ShiftScheduler::new(config).context("creating scheduler")?;
    let outcome = scheduler
        .solve_async(input, cli.time_limit)
        .await
        .context("scheduling request rejected")?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing result to {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
