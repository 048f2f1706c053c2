mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod process;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\nError: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("amberbridge CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Expand(args) => {
            info!("Dispatching to 'expand' command.");
            commands::expand::run(args)
        }
        Commands::Evaluate(args) => {
            info!("Dispatching to 'evaluate' command.");
            commands::evaluate::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }

    command_result
}
