//! Settings for the embedding layer, loaded from multiple sources.
//!
//! Priority: explicit overrides > `EMBER_HOST_*` environment > `ember-host.toml` > defaults
//!
//! [`Settings`] is plain data. [`Configuration`] wraps it together with the
//! lazily resolved package-manager executables and is shared by every
//! registered application through an `Arc`, so there is exactly one lookup
//! per process without any global state.

mod defaults;
mod loading;

use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::{DependencyError, Result};

pub use defaults::*;
pub use loading::{Overrides, skip_requested};

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Host mode; selects compile-once vs. watch-and-rebuild
    pub environment: Environment,

    /// Root of the server application that embeds the front-end apps
    pub host_root: PathBuf,

    /// Where built apps are placed (defaults to `<host_root>/tmp/ember-cli`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_root: Option<PathBuf>,

    /// Default `npm` executable; searched on PATH when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npm_path: Option<PathBuf>,

    /// Default `bower` executable; searched on PATH when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bower_path: Option<PathBuf>,

    /// File watcher passed to the build tool in watch mode (e.g. "polling")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watcher: Option<String>,

    /// Variable injected into every subprocess carrying the host mode
    pub mode_variable: String,

    /// Disable every build-tool invocation
    pub skip: bool,

    /// Lock file poll interval in milliseconds
    pub poll_interval_ms: u64,

    /// Upper bound for waiting on a build; unbounded when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout_secs: Option<u64>,

    /// Applications registered declaratively, in registration order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub apps: IndexMap<String, AppOptions>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            host_root: default_host_root(),
            tool_root: None,
            npm_path: None,
            bower_path: None,
            watcher: None,
            mode_variable: default_mode_variable(),
            skip: false,
            poll_interval_ms: default_poll_interval_ms(),
            wait_timeout_secs: None,
            apps: IndexMap::new(),
        }
    }
}

impl Settings {
    /// Root under which built apps are placed.
    pub fn tool_root(&self) -> PathBuf {
        self.tool_root
            .clone()
            .unwrap_or_else(|| self.host_root.join("tmp").join("ember-cli"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_secs.map(Duration::from_secs)
    }
}

/// Per-application options supplied at registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    /// Source root override; relative paths resolve against the host root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// `npm` override for this app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npm_path: Option<PathBuf>,

    /// `bower` override for this app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bower_path: Option<PathBuf>,

    /// Build-tool binary name under `node_modules/.bin` (default "ember")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    /// Environment handed to the build tool, when it differs from the host mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_environment: Option<String>,

    /// Per-app watcher override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watcher: Option<String>,
}

impl AppOptions {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_npm_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.npm_path = Some(path.into());
        self
    }

    pub fn with_bower_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bower_path = Some(path.into());
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn tool(&self) -> String {
        self.tool.clone().unwrap_or_else(default_tool)
    }
}

/// Settings plus the package-manager executables resolved from them.
#[derive(Debug)]
pub struct Configuration {
    settings: Settings,
    npm: OnceCell<PathBuf>,
    bower: OnceCell<PathBuf>,
}

impl Configuration {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            npm: OnceCell::new(),
            bower: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn environment(&self) -> Environment {
        self.settings.environment
    }

    pub fn host_root(&self) -> &Path {
        &self.settings.host_root
    }

    /// Process-wide `npm`, resolved on first use.
    pub fn npm_path(&self) -> Result<&Path> {
        let path = self.npm.get_or_try_init(|| {
            locate(
                self.settings.npm_path.as_deref(),
                "npm",
                "Install Node.js from https://nodejs.org or set npm_path",
            )
        })?;
        Ok(path.as_path())
    }

    /// Process-wide `bower`, resolved on first use.
    pub fn bower_path(&self) -> Result<&Path> {
        let path = self.bower.get_or_try_init(|| {
            locate(
                self.settings.bower_path.as_deref(),
                "bower",
                "Install it with:\n\n    $ npm install -g bower",
            )
        })?;
        Ok(path.as_path())
    }
}

fn locate(configured: Option<&Path>, name: &str, hint: &str) -> Result<PathBuf> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    let path = which::which(name).map_err(|_| DependencyError::MissingPackageManager {
        name: name.to_string(),
        hint: hint.to_string(),
    })?;
    tracing::debug!("Resolved `{}` on PATH: {}", name, path.display());
    Ok(path)
}
