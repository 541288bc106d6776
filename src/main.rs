//! Position Lens - Liquidity Position Viewer
//!
//! Run with: cargo run -- <OWNER>
//!
//! Lists every Uniswap V3 style position an address owns, joined with the
//! pool's live price/tick and both assets' metadata.

use alloy_primitives::Address;
use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod lens;
mod report;

use config::{Config, OutputFormat};
use lens::{PositionAggregator, RpcReader};
use report::PositionReport;

#[derive(Debug, Parser)]
#[command(name = "position-lens", version, about = "List the liquidity positions an address owns")]
struct Args {
    /// Address whose positions are listed
    owner: Address,

    /// TOML configuration file (environment variables are used otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured RPC URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Print a JSON report instead of the table
    #[arg(long)]
    json: bool,

    /// Positions assembled concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Skip the banner and configuration summary
    #[arg(short, long)]
    quiet: bool,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🔭 POSITION LENS - Liquidity Position Viewer").cyan().bold()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    if let Some(rpc_url) = &args.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.max_concurrent_positions = concurrency;
    }
    if args.json {
        config.output_format = OutputFormat::Json;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("position_lens=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e);
    }

    let interactive = config.output_format == OutputFormat::Table && !args.quiet;
    if interactive {
        print_banner();
        config.print_summary();
        println!();
    }

    let reader = RpcReader::new(&config.rpc_url, config.position_manager)?;
    info!("Reading positions from registry {}", reader.position_manager());
    let aggregator = PositionAggregator::new(
        reader.clone(),
        reader.clone(),
        reader,
        config.lens_settings(),
    );

    let spinner = if interactive {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        bar.set_message(format!("Reading positions of {}...", args.owner));
        bar.enable_steady_tick(Duration::from_millis(100));
        Some(bar)
    } else {
        None
    };

    let result = aggregator.list_positions(args.owner).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let positions = match result {
        Ok(positions) => positions,
        Err(e) => {
            error!("Aggregation aborted on {}: {}", e.subject(), e);
            return Err(e.into());
        }
    };

    let report = PositionReport::new(args.owner, config.chain_id, positions);

    match config.output_format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => report.print_table(),
    }

    Ok(())
}
