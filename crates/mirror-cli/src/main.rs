//! Remote Mirror CLI
//!
//! Watches a local directory and mirrors every change to a remote FTP
//! directory through the `lftp` client.

mod app;
mod cli;
mod error;
mod interactive;
mod logging;
mod startup;
mod watch;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        if let Some(details) = e.diagnostics() {
            eprintln!("{}", details.trim_end());
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Could not initialize logging: {}", e)))?;
    tracing::debug!("Verbose mode enabled");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(app::run(cli));
    // A conflict prompt may still be blocked on stdin
    runtime.shutdown_background();
    result
}
