//! Command-line interface definition for ember-host.
//!
//! # Command Structure
//!
//! - `ember-host install [APP]` - install npm (and bower) dependencies
//! - `ember-host compile [APP]` - one-shot build, e.g. during deploys
//! - `ember-host build [APP]` - build for the current environment and wait
//! - `ember-host test [APP]` - run the app's test suite
//! - `ember-host render APP` - print `index.html` with extra markup
//! - `ember-host paths APP` - show derived locations
//! - `ember-host status APP` - report the last build's state

mod commands;
mod tests;

use std::path::PathBuf;

use clap::Parser;
use ember_host::Environment;

pub use commands::{AppArgs, Command, PathsArgs, RenderArgs, StatusArgs};

/// ember-host - embed externally built front-end apps into server pages
#[derive(Parser, Debug)]
#[command(
    name = "ember-host",
    version,
    about = "Supervise front-end builds embedded in a server application",
    long_about = "ember-host runs each registered front-end app's build tool, waits for\n\
                  in-progress builds through the tool's lock file, reports failures recorded\n\
                  in its error file and renders the generated index.html with extra markup."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Settings file (defaults to ember-host.toml in the host root)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root of the host application
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Host environment: development, test or production
    #[arg(short, long, global = true, value_name = "ENV")]
    pub environment: Option<Environment>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
