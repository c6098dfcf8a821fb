//! Main binary entrypoint for nrql-chart.
//!
//! Parses CLI arguments, sets up logging, and runs the chart pipeline.

use std::{io::IsTerminal, path::PathBuf};

use clap::Parser;
use nrql_chart::{ChartConfig, Result, chart, core::config::DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "nrql-chart")]
#[command(about = "Render a NRQL query as a chart image and save it")]
#[command(version)]
struct Cli {
    /// Raw NRQL query, e.g. "SELECT count(*) FROM Transaction TIMESERIES"
    nrql: String,

    /// Where to save the chart image
    output: PathBuf,

    /// JSON file holding api_key and account_id
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse input
    let cli = Cli::parse();

    // Toggle the tracing level, logs go to stderr so stdout only carries results
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let chart_config = ChartConfig {
        nrql: cli.nrql,
        output: cli.output,
        config_path: cli.config,
    };

    // If the pipeline results in an error, print and exit
    match chart::run(chart_config).await {
        Ok(chart) => {
            if let Some(results) = chart.raw_results {
                match serde_json::to_string_pretty(&results) {
                    Ok(text) => println!("{text}"),
                    Err(e) => tracing::warn!("Could not render query results: {e}"),
                }
            }
        }
        Err(e) => {
            tracing::error!("{e}");

            std::process::exit(1);
        }
    }

    Ok(())
}
