//! qdsm - QGIS datasource manager
//!
//! A command line tool to list, convert and relocate the datasources
//! referenced by QGIS project files.

use clap::Parser;

use qdsm::cli::{Cli, Commands};
use qdsm::{commands, logger};

fn main() {
    let cli = Cli::parse();
    logger::configure(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Scan(args) => commands::scan::run(config, cli.verbose, args),
        Commands::Absolute(args) => commands::convert::run(config, cli.verbose, args, false),
        Commands::Relative(args) => commands::convert::run(config, cli.verbose, args, true),
        Commands::Relocate(args) => commands::relocate::run(config, cli.verbose, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
