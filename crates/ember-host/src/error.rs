//! Error types for the embedding layer.
//!
//! The hierarchy mirrors the failure taxonomy of the build lifecycle:
//!
//! - [`DependencyError`] - a required executable is missing or not executable
//! - [`BuildError`] - the build tool reported a failure or produced nothing
//! - [`Error::Command`] - a blocking subprocess exited non-zero
//! - [`ConfigError`] - settings could not be loaded
//!
//! Every variant is fatal to the operation that raised it; nothing here is
//! retried automatically.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type returned by every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A required executable could not be resolved
    #[error(transparent)]
    Dependency(#[from] DependencyError),

    /// The external build failed or never produced output
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A blocking build-tool command exited unsuccessfully
    #[error("`{label}` exited with {status}")]
    Command {
        /// Human-readable command line
        label: String,
        /// Exit status reported by the OS
        status: ExitStatus,
    },

    /// The subprocess could not be started at all
    #[error("Failed to start `{}`: {source}", .program.display())]
    Spawn {
        /// Program that failed to launch
        program: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be loaded or were invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTML artifact could not be rewritten
    #[error("Failed to rewrite index.html: {0}")]
    Markup(String),

    /// No application with this name has been registered
    #[error("{0:?} app is not defined\n\nHint: Register it with `Registry::register` or under [apps] in ember-host.toml")]
    UnknownApp(String),

    /// I/O errors from filesystem operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A required external executable is missing.
#[derive(Debug, Error)]
pub enum DependencyError {
    /// The build tool is not installed in the app's `node_modules`
    #[error(
        "No `{tool}` executable found for `{app}` at {}\n\nInstall it:\n\n    $ cd {}\n    $ npm install",
        .path.display(),
        .root.display()
    )]
    MissingTool {
        /// Application name
        app: String,
        /// Build-tool binary name
        tool: String,
        /// Path that was probed
        path: PathBuf,
        /// Application source root
        root: PathBuf,
    },

    /// A package manager could not be found on `PATH`
    #[error("`{name}` was not found on PATH\n\nHint: {hint}")]
    MissingPackageManager {
        /// Executable name that was searched for
        name: String,
        /// Installation instructions
        hint: String,
    },

    /// A configured executable path exists but cannot be run
    #[error("`{name}` is not executable: {}\n\nHint: {hint}", .path.display())]
    NotExecutable {
        /// Executable name
        name: String,
        /// Configured path
        path: PathBuf,
        /// Installation instructions
        hint: String,
    },
}

/// The build tool failed or produced no output.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The error file contained the tool's failure output
    #[error("{output}")]
    Failed {
        /// Application name
        app: String,
        /// Verbatim contents of the error file
        output: String,
    },

    /// No `index.html` exists and no failure was recorded
    #[error("EmberCLI failed to generate an `index.html` file for `{app}`.")]
    NoOutput {
        /// Application name
        app: String,
    },

    /// The watch process died while its build was still locked
    #[error("The watch build for `{app}` exited before finishing\n\nHint: See {} for its output", .log.display())]
    WatcherExited {
        /// Application name
        app: String,
        /// Log file the watcher wrote to
        log: PathBuf,
    },

    /// The lock file outlived the configured wait bound
    #[error("Timed out after {}s waiting for `{app}` to finish building\n\nHint: Check the build log or remove a stale lock file", .waited.as_secs())]
    Timeout {
        /// Application name
        app: String,
        /// How long the caller waited
        waited: Duration,
    },
}

/// Settings loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("Config file not found: {}\n\nHint: Create ember-host.toml or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// The merged settings failed to deserialize
    #[error("Invalid settings: {0}")]
    Invalid(String),

    /// Environment name outside development/test/production
    #[error("Unknown environment '{0}'\n\nHint: Use one of development, test, production")]
    UnknownEnvironment(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Result type alias using [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
