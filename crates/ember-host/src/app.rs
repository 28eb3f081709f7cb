//! Per-application build lifecycle.
//!
//! An [`App`] ties together the paths, the build monitor and a runner for
//! one named front-end application. The host environment decides the build
//! strategy:
//!
//! | environment | `build()`                                        |
//! |-------------|--------------------------------------------------|
//! | development | start a watch process once, wait while it lives |
//! | test        | compile once, then wait                          |
//! | production  | wait only; the artifact ships prebuilt           |

use std::fs;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{AppOptions, Configuration};
use crate::environment::Environment;
use crate::error::{BuildError, Error, Result};
use crate::markup::HtmlPage;
use crate::monitor::{BuildMonitor, BuildStatus};
use crate::paths::PathSet;
use crate::runner::{Runner, Shell, WatchProcess};

/// How far this instance has taken its application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    /// Nothing done yet
    #[default]
    Pending,
    /// Build markers have been reset
    Prepared,
    /// A one-shot build finished without a recorded error
    Compiled,
}

pub struct App {
    paths: Arc<PathSet>,
    monitor: BuildMonitor,
    runner: Arc<dyn Runner>,
    lifecycle: Mutex<Lifecycle>,
    watcher: Mutex<Option<WatchProcess>>,
}

impl App {
    /// An application driven by real subprocesses.
    pub fn new(
        name: impl Into<String>,
        options: AppOptions,
        configuration: Arc<Configuration>,
    ) -> Self {
        Self::with_runner(name, options, configuration, Arc::new(Shell::new()))
    }

    pub fn with_runner(
        name: impl Into<String>,
        options: AppOptions,
        configuration: Arc<Configuration>,
        runner: Arc<dyn Runner>,
    ) -> Self {
        let paths = Arc::new(PathSet::new(name, options, configuration));
        let monitor = BuildMonitor::new(Arc::clone(&paths));
        Self {
            paths,
            monitor,
            runner,
            lifecycle: Mutex::new(Lifecycle::Pending),
            watcher: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        self.paths.app_name()
    }

    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    pub fn monitor(&self) -> &BuildMonitor {
        &self.monitor
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.lock()
    }

    /// Reset the build markers, once per lifecycle.
    pub fn prepare(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();
        if *lifecycle == Lifecycle::Pending {
            self.monitor.reset()?;
            *lifecycle = Lifecycle::Prepared;
        }
        Ok(())
    }

    /// One-shot build. Later calls are no-ops until [`invalidate`](Self::invalidate).
    pub fn compile(&self) -> Result<()> {
        if self.skipped("compile") || self.lifecycle() == Lifecycle::Compiled {
            return Ok(());
        }

        self.prepare()?;
        self.runner.compile(&self.paths)?;
        self.monitor.check()?;
        *self.lifecycle.lock() = Lifecycle::Compiled;
        tracing::info!("Compiled `{}`", self.name());
        Ok(())
    }

    /// Make sure a build is available, then block until it is no longer in
    /// progress.
    pub fn build(&self) -> Result<()> {
        if self.skipped("build") {
            return Ok(());
        }

        match self.paths.environment() {
            Environment::Development => {
                self.build_and_watch()?;
                return self.wait_for_watcher();
            }
            Environment::Test => self.compile()?,
            Environment::Production => {}
        }

        self.monitor.wait()
    }

    /// The built `index.html` with `head` and `body` appended to their
    /// regions.
    ///
    /// # Errors
    ///
    /// Without an artifact, the recorded build failure if there is one,
    /// otherwise [`BuildError::NoOutput`].
    pub fn render(&self, head: &str, body: &str) -> Result<String> {
        let index_file = self.paths.index_file()?;
        if index_file.exists() {
            let content = fs::read_to_string(&index_file)?;
            return HtmlPage::new(&content)
                .with_head(head)
                .with_body(body)
                .render();
        }

        self.monitor.check()?;
        Err(BuildError::NoOutput {
            app: self.name().to_string(),
        }
        .into())
    }

    pub fn install_dependencies(&self) -> Result<()> {
        if self.skipped("install") {
            return Ok(());
        }
        self.runner.install(&self.paths)
    }

    pub fn test(&self) -> Result<()> {
        if self.skipped("test") {
            return Ok(());
        }
        self.prepare()?;
        self.runner.test(&self.paths)
    }

    pub fn status(&self) -> Result<BuildStatus> {
        self.monitor.status()
    }

    /// Forget prepared/compiled state so the next call starts over.
    pub fn invalidate(&self) {
        *self.lifecycle.lock() = Lifecycle::Pending;
        tracing::debug!("Invalidated `{}`", self.name());
    }

    /// Whether this instance started a watcher that is still alive.
    pub fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .as_mut()
            .is_some_and(WatchProcess::is_running)
    }

    /// Terminate the watcher started by [`build`](Self::build), if any.
    pub fn stop_watching(&self) -> Result<()> {
        if let Some(mut watcher) = self.watcher.lock().take() {
            tracing::info!("Stopping watcher for `{}`", self.name());
            watcher.stop()?;
        }
        Ok(())
    }

    fn build_and_watch(&self) -> Result<()> {
        self.prepare()?;

        let mut watcher = self.watcher.lock();
        if watcher.as_mut().is_some_and(WatchProcess::is_running) {
            tracing::debug!("Watcher for `{}` already running", self.name());
            return Ok(());
        }

        // Taken before spawning so the wait below cannot slip through before
        // the tool creates its own lock.
        self.monitor.lock()?;
        match self.runner.build_and_watch(&self.paths) {
            Ok(process) => {
                *watcher = Some(process);
                Ok(())
            }
            Err(err) => {
                if let Err(reset) = self.monitor.reset() {
                    tracing::warn!("Failed to clear lock for `{}`: {}", self.name(), reset);
                }
                Err(err)
            }
        }
    }

    /// Wait on the lock while the watcher lives. A watcher that dies first
    /// leaves its lock behind; clear it and report what the tool recorded.
    fn wait_for_watcher(&self) -> Result<()> {
        let result = self.monitor.wait_while(|| self.is_watching());
        if let Err(Error::Build(BuildError::WatcherExited { .. })) = &result {
            self.monitor.unlock()?;
            self.monitor.check()?;
        }
        result
    }

    fn skipped(&self, operation: &str) -> bool {
        let skip = self.paths.configuration().settings().skip;
        if skip {
            tracing::debug!("Skipping {} for `{}`", operation, self.name());
        }
        skip
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name())
            .field("environment", &self.paths.environment())
            .field("lifecycle", &self.lifecycle())
            .finish_non_exhaustive()
    }
}
