//! wages-cli - prints monthly salaries for a CSV timesheet

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use wages_cli::{log_filter, run, Input};
use wages_common::config::{load_config, ConfigSource, TomlConfig};

const FORMAT_HELP: &str = "\
The first line of the CSV is its header, naming the columns:
  Person Name, Person ID, Date, Start, End (in any order)
Subsequent lines hold one shift each.

Dates are formatted as day.month.year, each a number.
Times are formatted as hour:minute, each a number.";

/// Command-line arguments for wages-cli
#[derive(Parser, Debug)]
#[command(name = "wages-cli")]
#[command(about = "Monthly salary calculator")]
#[command(version)]
#[command(after_help = FORMAT_HELP)]
struct Args {
    /// CSV file to read, or an http(s) URL to fetch it from
    #[arg(value_name = "CSV")]
    csv: String,

    /// Character encoding of the CSV (default UTF-8)
    #[arg(value_name = "ENCODING")]
    encoding: Option<String>,

    /// Configuration file
    #[arg(short, long, env = "WAGES_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Loaded before tracing so the configured level applies; the source is logged below
    let (config, source) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("wages-cli: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr so they never mix with the salary listing
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config.logging.level))
        .with_writer(io::stderr)
        .init();

    match execute(args, config, source).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wages-cli: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(args: Args, config: TomlConfig, source: ConfigSource) -> Result<()> {
    match &source {
        ConfigSource::Missing(_) => warn!("Configuration: {}", source),
        _ => debug!("Configuration: {}", source),
    }

    let settings = config
        .calculator_settings()
        .context("invalid [calculator] configuration")?;

    let input = Input::parse(&args.csv);
    let mut out = run(
        &input,
        args.encoding.as_deref(),
        Arc::new(settings),
        &config.csv.fields,
        BufWriter::new(io::stdout()),
    )
    .await?;
    out.flush()?;
    Ok(())
}
