//! ember-host CLI entry point.
//!
//! Parses arguments, initializes logging and dispatches to the command.

use clap::Parser;
use ember_host_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    // Convert CLI errors to miette diagnostics for error reporting
    commands::execute(args).map_err(error::cli_error_to_miette)
}
