mod cli;
mod commands;
mod error;
mod logging;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet);
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Err(e) = run(&cli) {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Augment(args) => commands::augment::run(args),
        Commands::Peptide(args) => commands::peptide::run(args),
    }
}
