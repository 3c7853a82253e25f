//! # golden
//!
//! Command line host for golden file comparison.
//!
//! ## Overview
//!
//! - `golden compare` checks an encoded image against its golden
//!   (`--update-goldens` overwrites it instead)
//! - `golden update` stores an image as the new golden
//! - `golden resolve` prints the file a golden key resolves to
//!
//! Exit status is 0 when the check passed, 1 on a mismatch and 2 on error.

use std::process::ExitCode;

use clap::Parser;
use golden_cli::{load_config, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let report = match run(&cli, &config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match report.render(cli.json) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    }

    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
