use std::path::Path;
use std::process::Command;

use crate::environment::Environment;
use crate::error::Result;
use crate::paths::PathSet;

/// Builds the concrete command lines for one application.
///
/// Every command runs in the app root, inherits the current environment and
/// additionally receives `<mode_variable>=<host environment>` and
/// `EMBER_ENV=<build environment>`.
#[derive(Debug, Clone, Copy)]
pub struct ToolCommand<'a> {
    paths: &'a PathSet,
}

impl<'a> ToolCommand<'a> {
    pub fn new(paths: &'a PathSet) -> Self {
        Self { paths }
    }

    /// Environment handed to the build tool: the per-app override, else the
    /// host mode.
    pub fn build_environment(&self) -> String {
        self.paths
            .options()
            .build_environment
            .clone()
            .unwrap_or_else(|| self.paths.environment().to_string())
    }

    /// Environment for a one-shot build: the per-app override, else `test`
    /// under a test host and `production` everywhere else.
    pub fn compile_environment(&self) -> String {
        match (&self.paths.options().build_environment, self.paths.environment()) {
            (Some(environment), _) => environment.clone(),
            (None, Environment::Test) => Environment::Test.to_string(),
            (None, _) => Environment::Production.to_string(),
        }
    }

    /// `<tool> build --environment <env> --output-path <dist> [--watch [--watcher <w>]]`
    ///
    /// Watch builds follow the host mode; one-shot builds use
    /// [`compile_environment`](Self::compile_environment).
    pub fn build(&self, watch: bool) -> Result<Command> {
        let build_environment = if watch {
            self.build_environment()
        } else {
            self.compile_environment()
        };
        let mut command = self.prepare(self.paths.tool()?, &build_environment);
        command
            .arg("build")
            .arg("--environment")
            .arg(&build_environment)
            .arg("--output-path")
            .arg(self.paths.dist()?);

        if watch {
            command.arg("--watch");
            if let Some(watcher) = self.watcher() {
                command.arg("--watcher").arg(watcher);
            }
        }

        Ok(command)
    }

    /// `<tool> test --environment test`
    pub fn test(&self) -> Result<Command> {
        let test_environment = Environment::Test.to_string();
        let mut command = self.prepare(self.paths.tool()?, &test_environment);
        command
            .arg("test")
            .arg("--environment")
            .arg(&test_environment);
        Ok(command)
    }

    /// `npm <subcommand>`
    pub fn npm(&self, subcommand: &str) -> Result<Command> {
        let npm = self.paths.npm()?;
        let mut command = self.prepare(&npm, &self.build_environment());
        command.arg(subcommand);
        Ok(command)
    }

    /// `bower <subcommand>`
    pub fn bower(&self, subcommand: &str) -> Result<Command> {
        let mut command = self.prepare(self.paths.bower()?, &self.build_environment());
        command.arg(subcommand);
        Ok(command)
    }

    fn watcher(&self) -> Option<&str> {
        self.paths
            .options()
            .watcher
            .as_deref()
            .or(self.paths.configuration().settings().watcher.as_deref())
    }

    fn prepare(&self, program: &Path, build_environment: &str) -> Command {
        let settings = self.paths.configuration().settings();
        let mut command = Command::new(program);
        command
            .current_dir(self.paths.root())
            .env(&settings.mode_variable, settings.environment.as_str())
            .env("EMBER_ENV", build_environment);
        command
    }
}

/// Printable command line for logs and error messages.
pub(crate) fn describe(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned()),
    );
    parts.join(" ")
}
