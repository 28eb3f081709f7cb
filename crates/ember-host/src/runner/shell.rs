use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::command::{ToolCommand, describe};
use super::{Runner, WatchProcess};
use crate::error::{Error, Result};
use crate::paths::PathSet;

/// Runs the build tool as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Shell;

impl Shell {
    pub fn new() -> Self {
        Self
    }
}

impl Runner for Shell {
    fn install(&self, paths: &PathSet) -> Result<()> {
        let commands = ToolCommand::new(paths);
        tracing::info!("Installing npm dependencies for `{}`", paths.app_name());
        run_attached(commands.npm("prune")?)?;
        run_attached(commands.npm("install")?)?;

        if paths.bower_json_file().exists() {
            tracing::info!("Installing bower dependencies for `{}`", paths.app_name());
            run_attached(commands.bower("prune")?)?;
            run_attached(commands.bower("install")?)?;
        }
        Ok(())
    }

    fn compile(&self, paths: &PathSet) -> Result<()> {
        let command = ToolCommand::new(paths).build(false)?;
        let log = open_log(&paths.log())?;
        tracing::info!("Compiling `{}`", paths.app_name());
        run_teed(command, log)
    }

    fn build_and_watch(&self, paths: &PathSet) -> Result<WatchProcess> {
        let mut command = ToolCommand::new(paths).build(true)?;
        let log = open_log(&paths.log())?;
        command
            .stdin(Stdio::null())
            .stdout(log.try_clone()?)
            .stderr(log);

        let label = describe(&command);
        let child = command.spawn().map_err(|source| Error::Spawn {
            program: command.get_program().into(),
            source,
        })?;
        tracing::info!(
            "Started watcher for `{}` (pid {}), logging to {}",
            paths.app_name(),
            child.id(),
            paths.log().display()
        );
        tracing::debug!("Watcher command: {}", label);
        Ok(WatchProcess::from_child(child))
    }

    fn test(&self, paths: &PathSet) -> Result<()> {
        tracing::info!("Testing `{}`", paths.app_name());
        run_attached(ToolCommand::new(paths).test()?)
    }
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Run with inherited stdio and fail on a non-zero exit.
fn run_attached(mut command: Command) -> Result<()> {
    tracing::debug!("Running {}", describe(&command));
    let status = command.status().map_err(|source| Error::Spawn {
        program: command.get_program().into(),
        source,
    })?;
    ensure_success(&command, status)
}

/// Run with stdout and stderr copied to both the log and our stderr.
///
/// Our stdout is left alone so callers can print rendered output there.
fn run_teed(mut command: Command, log: File) -> Result<()> {
    tracing::debug!("Running {}", describe(&command));
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| Error::Spawn {
        program: command.get_program().into(),
        source,
    })?;

    let log = Arc::new(Mutex::new(log));
    let mut pumps = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        pumps.push(tee(stdout, io::stderr(), Arc::clone(&log)));
    }
    if let Some(stderr) = child.stderr.take() {
        pumps.push(tee(stderr, io::stderr(), Arc::clone(&log)));
    }

    let status = child.wait()?;
    for pump in pumps {
        match pump.join() {
            Ok(result) => result?,
            Err(_) => tracing::warn!("Output copier for {} panicked", describe(&command)),
        }
    }

    ensure_success(&command, status)
}

fn tee<R, W>(mut source: R, mut console: W, log: Arc<Mutex<File>>) -> JoinHandle<io::Result<()>>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = [0u8; 8192];
        loop {
            let read = match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            // A closed console must not stop the log from being written.
            let _ = console.write_all(&buffer[..read]);
            log.lock().write_all(&buffer[..read])?;
        }
        let _ = console.flush();
        log.lock().flush()
    })
}

fn ensure_success(command: &Command, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(Error::Command {
        label: describe(command),
        status,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{AppOptions, Configuration, Settings};
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn script(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn paths(temp: &TempDir, options: AppOptions) -> PathSet {
        let configuration = Arc::new(Configuration::new(Settings {
            host_root: temp.path().to_path_buf(),
            ..Settings::default()
        }));
        PathSet::new("frontend", options, configuration)
    }

    fn tool_path(temp: &TempDir) -> PathBuf {
        temp.path().join("frontend/node_modules/.bin/ember")
    }

    #[test]
    fn test_compile_tees_output_into_log() {
        let temp = TempDir::new().unwrap();
        script(
            &tool_path(&temp),
            "echo \"building $EMBER_ENV with $*\"\necho 'warning: slow' >&2",
        );
        let paths = paths(&temp, AppOptions::default());

        Shell::new().compile(&paths).unwrap();

        let log = fs::read_to_string(paths.log()).unwrap();
        assert!(log.contains("building production with build --environment production"));
        assert!(log.contains("warning: slow"));
    }

    #[test]
    fn test_compile_appends_to_existing_log() {
        let temp = TempDir::new().unwrap();
        script(&tool_path(&temp), "echo second");
        let paths = paths(&temp, AppOptions::default());
        fs::create_dir_all(paths.log().parent().unwrap()).unwrap();
        fs::write(paths.log(), "first\n").unwrap();

        Shell::new().compile(&paths).unwrap();

        assert_eq!(fs::read_to_string(paths.log()).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_compile_non_zero_exit_is_command_error() {
        let temp = TempDir::new().unwrap();
        script(&tool_path(&temp), "exit 3");
        let paths = paths(&temp, AppOptions::default());

        let err = Shell::new().compile(&paths).unwrap_err();
        match err {
            Error::Command { label, status } => {
                let dist = paths.dist().unwrap().display().to_string();
                assert!(label.ends_with(&format!("--output-path {dist}")));
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_install_runs_npm_then_bower_when_bower_json_present() {
        let temp = TempDir::new().unwrap();
        let calls = temp.path().join("calls.txt");
        let npm = temp.path().join("bin/npm");
        let bower = temp.path().join("bin/bower");
        script(&npm, &format!("echo \"npm $1\" >> {}", calls.display()));
        script(&bower, &format!("echo \"bower $1\" >> {}", calls.display()));
        let paths = paths(
            &temp,
            AppOptions::default()
                .with_npm_path(&npm)
                .with_bower_path(&bower),
        );
        fs::create_dir_all(paths.root()).unwrap();
        fs::write(paths.bower_json_file(), "{}").unwrap();

        Shell::new().install(&paths).unwrap();

        assert_eq!(
            fs::read_to_string(&calls).unwrap(),
            "npm prune\nnpm install\nbower prune\nbower install\n"
        );
    }

    #[test]
    fn test_install_skips_bower_without_bower_json() {
        let temp = TempDir::new().unwrap();
        let calls = temp.path().join("calls.txt");
        let npm = temp.path().join("bin/npm");
        script(&npm, &format!("echo \"npm $1\" >> {}", calls.display()));
        let paths = paths(&temp, AppOptions::default().with_npm_path(&npm));
        fs::create_dir_all(paths.root()).unwrap();

        Shell::new().install(&paths).unwrap();

        assert_eq!(fs::read_to_string(&calls).unwrap(), "npm prune\nnpm install\n");
    }

    #[test]
    fn test_install_stops_on_failed_prune() {
        let temp = TempDir::new().unwrap();
        let npm = temp.path().join("bin/npm");
        script(&npm, "exit 1");
        let paths = paths(&temp, AppOptions::default().with_npm_path(&npm));
        fs::create_dir_all(paths.root()).unwrap();

        let err = Shell::new().install(&paths).unwrap_err();
        assert!(matches!(err, Error::Command { ref label, .. } if label.ends_with("npm prune")));
    }

    #[test]
    fn test_missing_npm_override_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let paths = paths(
            &temp,
            AppOptions::default().with_npm_path(temp.path().join("nowhere/npm")),
        );
        fs::create_dir_all(paths.root()).unwrap();

        let err = Shell::new().install(&paths).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn test_build_and_watch_returns_while_running() {
        let temp = TempDir::new().unwrap();
        script(&tool_path(&temp), "echo \"watching $*\"\nsleep 5");
        let paths = paths(&temp, AppOptions::default());

        let started = Instant::now();
        let mut watcher = Shell::new().build_and_watch(&paths).unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(watcher.is_running());
        assert!(watcher.id().is_some());

        watcher.stop().unwrap();
        assert!(!watcher.is_running());
    }

    #[test]
    fn test_build_and_watch_redirects_output_to_log() {
        let temp = TempDir::new().unwrap();
        script(&tool_path(&temp), "echo \"watching $*\"");
        let paths = paths(&temp, AppOptions::default());

        let mut watcher = Shell::new().build_and_watch(&paths).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while watcher.is_running() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }

        let log = fs::read_to_string(paths.log()).unwrap();
        assert!(log.contains("--watch"));
    }

    #[test]
    fn test_test_runs_tool_in_test_environment() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("ran.txt");
        script(
            &tool_path(&temp),
            &format!("echo \"$EMBER_ENV $*\" > {}", marker.display()),
        );
        let paths = paths(&temp, AppOptions::default());

        Shell::new().test(&paths).unwrap();

        assert_eq!(
            fs::read_to_string(marker).unwrap(),
            "test test --environment test\n"
        );
    }
}
