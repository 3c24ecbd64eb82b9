//! Command-line entry point.
//!
//! Thin wrapper around the `geofloor` library: loads `.env`, parses options,
//! initializes logging and runs the floor test.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use geofloor::initialization::init_logger_with;
use geofloor::{run_floor_test, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // API keys may live in a .env file next to the working directory
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let output = config.output.clone();
    match run_floor_test(config).await {
        Ok(report) => {
            let summary = &report.summary;
            eprintln!(
                "Checked {} hop{}: {} accepted, {} rejected ({} captured, {} gateway failures)",
                summary.verified,
                if summary.verified == 1 { "" } else { "s" },
                summary.accepted,
                summary.rejected,
                summary.captured,
                summary.gateway_failures
            );
            if output.as_os_str() != "-" {
                eprintln!("Results saved in {}", output.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("geofloor error: {:#}", e);
            process::exit(1);
        }
    }
}
