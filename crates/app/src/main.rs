//! TplKit - Main Entry Point
//!
//! Parses the command line, installs logging, loads the merged config and
//! dispatches to a command handler.

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_tracing(args.verbosity);

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    match commands::run(args, &mut stdout, &mut stderr).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
