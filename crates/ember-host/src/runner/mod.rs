//! Invoking the external build tool.
//!
//! [`Runner`] is the seam between the application facade and the OS: the
//! facade decides *when* to install, compile, watch or test, a runner
//! decides *how*. [`Shell`] is the real implementation; tests substitute
//! their own.

mod command;
mod shell;

use std::process::Child;

use crate::error::Result;
use crate::paths::PathSet;

pub use command::ToolCommand;
pub use shell::Shell;

/// Executes build-tool commands for one application.
pub trait Runner: Send + Sync {
    /// Install dependencies. Blocks; output goes to the console.
    fn install(&self, paths: &PathSet) -> Result<()>;

    /// One-shot build. Blocks; output goes to stderr and the app's log.
    fn compile(&self, paths: &PathSet) -> Result<()>;

    /// Start the watch-build in the background with output redirected to the
    /// app's log. Returns as soon as the process is spawned.
    fn build_and_watch(&self, paths: &PathSet) -> Result<WatchProcess>;

    /// Run the app's test suite. Blocks; output goes to the console.
    fn test(&self, paths: &PathSet) -> Result<()>;
}

/// Handle to a background watch-build.
///
/// The exit status is never inspected; failures surface through the error
/// file instead.
#[derive(Debug)]
pub struct WatchProcess {
    child: Option<Child>,
}

impl WatchProcess {
    pub fn from_child(child: Child) -> Self {
        Self { child: Some(child) }
    }

    /// A watcher this process does not own, e.g. one managed by a process
    /// supervisor. It is always reported as running.
    pub fn external() -> Self {
        Self { child: None }
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    pub fn is_running(&mut self) -> bool {
        match &mut self.child {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => true,
        }
    }

    /// Kill the watcher if this process owns it.
    pub fn stop(&mut self) -> Result<()> {
        if let Some(child) = &mut self.child {
            if matches!(child.try_wait(), Ok(None)) {
                child.kill()?;
            }
            child.wait()?;
        }
        Ok(())
    }
}
