//! Build state observed through filesystem markers.
//!
//! The build tool (including a long-lived watch process outside this
//! process) owns two files under the app's `tmp` directory:
//!
//! - `build.lock` exists while a build is running
//! - `error.txt` holds the failure output of the last build
//!
//! The monitor only observes and clears these markers. It does not provide
//! mutual exclusion between processes; the tool's own locking does.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{BuildError, Result};
use crate::paths::PathSet;

/// Conceptual build state derived from the markers and the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// No build output and no recorded failure
    NotStarted,
    /// The lock file is present
    InProgress,
    /// `index.html` exists and no failure is recorded
    Succeeded,
    /// The error file holds the tool's failure output
    Failed { error: String },
}

impl BuildStatus {
    /// Check if build is currently running.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::InProgress)
    }

    /// Check if last build succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Succeeded)
    }

    /// Get error message if failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            BuildStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Watches one application's lock and error files.
#[derive(Debug, Clone)]
pub struct BuildMonitor {
    paths: Arc<PathSet>,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl BuildMonitor {
    /// Monitor using the poll interval and wait bound from the app's settings.
    pub fn new(paths: Arc<PathSet>) -> Self {
        let settings = paths.configuration().settings();
        let poll_interval = settings.poll_interval();
        let timeout = settings.wait_timeout();
        Self {
            paths,
            poll_interval,
            timeout,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Clear both markers before a fresh build attempt.
    pub fn reset(&self) -> Result<()> {
        remove_if_present(&self.paths.error_file()?)?;
        remove_if_present(&self.paths.lockfile()?)?;
        tracing::debug!("Reset build markers for `{}`", self.paths.app_name());
        Ok(())
    }

    /// Create the lock file so that [`wait`](Self::wait) blocks until the
    /// build tool removes it.
    pub fn lock(&self) -> Result<()> {
        let lockfile = self.paths.lockfile()?;
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&lockfile)?;
        Ok(())
    }

    /// Remove the lock file, leaving any recorded error in place.
    pub fn unlock(&self) -> Result<()> {
        remove_if_present(&self.paths.lockfile()?)?;
        Ok(())
    }

    pub fn is_locked(&self) -> Result<bool> {
        Ok(self.paths.lockfile()?.exists())
    }

    /// Block until the lock file disappears.
    ///
    /// Polls every `poll_interval`. Without a timeout a hung build blocks
    /// the caller forever; with one, [`BuildError::Timeout`] is returned.
    pub fn wait(&self) -> Result<()> {
        self.wait_while(|| true)
    }

    /// Like [`wait`](Self::wait), but stops as soon as `alive` reports that
    /// the process holding the lock is gone.
    ///
    /// A lock that outlives its holder yields [`BuildError::WatcherExited`];
    /// the lock file itself is left for the caller to clear.
    pub fn wait_while(&self, mut alive: impl FnMut() -> bool) -> Result<()> {
        let lockfile = self.paths.lockfile()?;
        let started = Instant::now();
        let mut announced = false;

        while lockfile.exists() {
            if let Some(timeout) = self.timeout {
                let waited = started.elapsed();
                if waited >= timeout {
                    tracing::warn!(
                        "Gave up waiting for `{}` after {:?}; lock file {} is still present",
                        self.paths.app_name(),
                        waited,
                        lockfile.display()
                    );
                    return Err(BuildError::Timeout {
                        app: self.paths.app_name().to_string(),
                        waited,
                    }
                    .into());
                }
            }

            if !alive() {
                // The holder may have released the lock right before exiting.
                if !lockfile.exists() {
                    break;
                }
                tracing::warn!(
                    "Build process for `{}` exited while {} was still present",
                    self.paths.app_name(),
                    lockfile.display()
                );
                return Err(BuildError::WatcherExited {
                    app: self.paths.app_name().to_string(),
                    log: self.paths.log(),
                }
                .into());
            }

            if !announced {
                tracing::info!("Waiting for `{}` to finish building...", self.paths.app_name());
                announced = true;
            }
            std::thread::sleep(self.poll_interval);
        }

        if announced {
            tracing::debug!(
                "`{}` finished building after {:?}",
                self.paths.app_name(),
                started.elapsed()
            );
        }
        Ok(())
    }

    /// Fail with the recorded build error, if any.
    pub fn check(&self) -> Result<()> {
        match self.recorded_error()? {
            Some(output) => Err(BuildError::Failed {
                app: self.paths.app_name().to_string(),
                output,
            }
            .into()),
            None => Ok(()),
        }
    }

    /// Current state, read from the markers and the artifact.
    pub fn status(&self) -> Result<BuildStatus> {
        if self.is_locked()? {
            return Ok(BuildStatus::InProgress);
        }
        if let Some(error) = self.recorded_error()? {
            return Ok(BuildStatus::Failed { error });
        }
        if self.paths.index_file()?.exists() {
            return Ok(BuildStatus::Succeeded);
        }
        Ok(BuildStatus::NotStarted)
    }

    /// Contents of the error file; an empty or whitespace-only file counts
    /// as no error.
    fn recorded_error(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.paths.error_file()?) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}
