//! Development server
//!
//! # Architecture Overview
//!
//! ```text
//!   flags / --config ──▶ config ──┐
//!   IBAZEL_LIVERELOAD_URL ────────┼──▶ scripts::composer ──▶ pre / post scripts
//!   scripts manifest ─────────────┘                               │
//!                                                                 ▼
//!   Browser ──▶ http::server ──┬── GET <serving path> ──▶ http::concat (pre + sources + post)
//!                              └── everything else ────▶ http::files (packages, base, index)
//! ```
//!
//! Exit status is 1 on any fatal startup or listener error.

use std::process::ExitCode;

use clap::Parser;

use devserver::config::Cli;
use devserver::lifecycle;
use devserver::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    logging::init(&cli.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "devserver starting");

    match lifecycle::run(cli).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
