//! ember-host CLI - drive embedded front-end builds from the command line.
//!
//! This crate wraps the `ember-host` library for use in deploy scripts, CI
//! and local development: installing dependencies, compiling ahead of time,
//! running test suites and rendering an app's `index.html` with extra markup.
//!
//! # Architecture
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - one module per subcommand
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status messages
//!
//! # Example
//!
//! ```rust,no_run
//! use ember_host_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     // CLI command implementations...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
