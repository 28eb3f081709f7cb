//! ember-host - supervise an external front-end build and embed its output.
//!
//! A server application registers one or more front-end applications. For
//! each of them this crate shells out to the app's build tool, coordinates
//! with it through a lock file and an error file on disk, and splices
//! caller-supplied markup into the generated `index.html`.
//!
//! # Architecture
//!
//! - [`config`] - settings loaded from defaults, `ember-host.toml` and the environment
//! - [`paths`] - derived filesystem locations per application
//! - [`runner`] - subprocess invocation of the build tool
//! - [`monitor`] - lock and error file observation
//! - [`markup`] - `index.html` rewriting
//! - [`app`] / [`registry`] - the per-application lifecycle and the set of apps
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ember_host::{AppOptions, Configuration, Overrides, Registry, Settings};
//!
//! fn main() -> ember_host::Result<()> {
//!     let settings = Settings::load(None, &Overrides::default())?;
//!     let mut registry = Registry::new(Arc::new(Configuration::new(settings)));
//!     registry.register("frontend", AppOptions::default());
//!
//!     let html = registry.render("frontend", "<meta name=\"x\">", "")?;
//!     println!("{html}");
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod environment;
pub mod error;
pub mod markup;
pub mod monitor;
pub mod paths;
pub mod registry;
pub mod runner;

pub use app::{App, Lifecycle};
pub use config::{AppOptions, Configuration, Overrides, Settings};
pub use environment::Environment;
pub use error::{BuildError, ConfigError, DependencyError, Error, Result};
pub use markup::HtmlPage;
pub use monitor::{BuildMonitor, BuildStatus};
pub use paths::PathSet;
pub use registry::Registry;
pub use runner::{Runner, Shell, ToolCommand, WatchProcess};
