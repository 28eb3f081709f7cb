//! Filesystem locations derived for one application.
//!
//! Every path is a pure function of the app name, its options, the host
//! environment and the two roots. Directories (`tmp`, `apps`, `dist`) are
//! created on first access and memoized; creation uses `create_dir_all`, so
//! concurrent first access from several threads is harmless.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::{AppOptions, Configuration};
use crate::environment::Environment;
use crate::error::{DependencyError, Result};

/// Derived paths for a single registered application.
#[derive(Debug)]
pub struct PathSet {
    app_name: String,
    options: AppOptions,
    configuration: Arc<Configuration>,
    tmp: OnceCell<PathBuf>,
    apps: OnceCell<PathBuf>,
    dist: OnceCell<PathBuf>,
    tool: OnceCell<PathBuf>,
    bower: OnceCell<PathBuf>,
}

impl PathSet {
    pub fn new(
        app_name: impl Into<String>,
        options: AppOptions,
        configuration: Arc<Configuration>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            options,
            configuration,
            tmp: OnceCell::new(),
            apps: OnceCell::new(),
            dist: OnceCell::new(),
            tool: OnceCell::new(),
            bower: OnceCell::new(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn environment(&self) -> Environment {
        self.configuration.environment()
    }

    /// Application source directory.
    ///
    /// `options.path` wins when given (relative values resolve against the
    /// host root); otherwise `<host_root>/<app_name>`.
    pub fn root(&self) -> PathBuf {
        let host_root = self.configuration.host_root();
        match &self.options.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => host_root.join(path),
            None => host_root.join(&self.app_name),
        }
    }

    /// `<root>/tmp`, created if missing.
    pub fn tmp(&self) -> Result<&Path> {
        memoized_dir(&self.tmp, || self.root().join("tmp"))
    }

    /// `<tool_root>/apps`, created if missing.
    pub fn apps(&self) -> Result<&Path> {
        memoized_dir(&self.apps, || {
            self.configuration.settings().tool_root().join("apps")
        })
    }

    /// `<tool_root>/apps/<app_name>`, created if missing.
    pub fn dist(&self) -> Result<&Path> {
        let apps = self.apps()?;
        memoized_dir(&self.dist, || apps.join(&self.app_name))
    }

    /// The build artifact embedded into server-rendered pages.
    pub fn index_file(&self) -> Result<PathBuf> {
        Ok(self.dist()?.join("index.html"))
    }

    /// `<host_root>/log/<app_name>.<environment>.log`
    pub fn log(&self) -> PathBuf {
        self.configuration
            .host_root()
            .join("log")
            .join(format!("{}.{}.log", self.app_name, self.environment()))
    }

    /// Present while the build tool is building.
    pub fn lockfile(&self) -> Result<PathBuf> {
        Ok(self.tmp()?.join("build.lock"))
    }

    /// Holds the last build's failure output.
    pub fn error_file(&self) -> Result<PathBuf> {
        Ok(self.tmp()?.join("error.txt"))
    }

    pub fn package_json_file(&self) -> PathBuf {
        self.root().join("package.json")
    }

    pub fn bower_json_file(&self) -> PathBuf {
        self.root().join("bower.json")
    }

    pub fn node_modules(&self) -> PathBuf {
        self.root().join("node_modules")
    }

    /// Resolve `tool` inside `node_modules/.bin`.
    ///
    /// # Errors
    ///
    /// [`DependencyError::MissingTool`] when the file is absent or lacks an
    /// execute bit; the message tells the user to install dependencies.
    pub fn executable(&self, tool: &str) -> Result<PathBuf> {
        let path = self.node_modules().join(".bin").join(tool);
        if !is_executable(&path) {
            return Err(DependencyError::MissingTool {
                app: self.app_name.clone(),
                tool: tool.to_string(),
                path,
                root: self.root(),
            }
            .into());
        }
        Ok(path)
    }

    /// The app's build tool (`ember` unless overridden).
    pub fn tool(&self) -> Result<&Path> {
        let path = self
            .tool
            .get_or_try_init(|| self.executable(&self.options.tool()))?;
        Ok(path.as_path())
    }

    /// `npm` for this app: the per-app override, else the process-wide default.
    ///
    /// The override is returned unchanged.
    pub fn npm(&self) -> Result<PathBuf> {
        match &self.options.npm_path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.configuration.npm_path()?.to_path_buf()),
        }
    }

    /// `bower` for this app: the per-app override, else the process-wide
    /// default. Either must be executable.
    pub fn bower(&self) -> Result<&Path> {
        let path = self.bower.get_or_try_init(|| -> Result<PathBuf> {
            let path = match &self.options.bower_path {
                Some(path) => path.clone(),
                None => self.configuration.bower_path()?.to_path_buf(),
            };

            if !is_executable(&path) {
                return Err(DependencyError::NotExecutable {
                    name: "bower".to_string(),
                    path,
                    hint: "Bower is required by EmberCLI. Install it with `npm install -g bower`"
                        .to_string(),
                }
                .into());
            }
            Ok(path)
        })?;
        Ok(path.as_path())
    }
}

fn memoized_dir(cell: &OnceCell<PathBuf>, path: impl FnOnce() -> PathBuf) -> Result<&Path> {
    let dir = cell.get_or_try_init(|| -> Result<PathBuf> {
        let dir = path();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!("Ensured directory {}", dir.display());
        Ok(dir)
    })?;
    Ok(dir.as_path())
}

/// A regular file with at least one execute bit set.
#[cfg(unix)]
pub(crate) fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub(crate) fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    struct Roots {
        _temp: TempDir,
        host_root: PathBuf,
        tool_root: PathBuf,
    }

    fn roots() -> Roots {
        let temp = TempDir::new().unwrap();
        let host_root = temp.path().join("rails");
        let tool_root = temp.path().join("ember_cli");
        fs::create_dir_all(&host_root).unwrap();
        Roots {
            _temp: temp,
            host_root,
            tool_root,
        }
    }

    fn configuration(roots: &Roots, settings: Settings) -> Arc<Configuration> {
        Arc::new(Configuration::new(Settings {
            host_root: roots.host_root.clone(),
            tool_root: Some(roots.tool_root.clone()),
            ..settings
        }))
    }

    fn path_set(roots: &Roots, name: &str, options: AppOptions) -> PathSet {
        PathSet::new(name, options, configuration(roots, Settings::default()))
    }

    #[cfg(unix)]
    fn create_executable(path: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o777)).unwrap();
        path.to_path_buf()
    }

    #[test]
    fn test_root_depends_on_app_name() {
        let roots = roots();
        let paths = path_set(&roots, "foo", AppOptions::default());
        assert_eq!(paths.root(), roots.host_root.join("foo"));
    }

    #[test]
    fn test_root_relative_override() {
        let roots = roots();
        let paths = path_set(&roots, "foo", AppOptions::default().with_path("not-foo"));
        assert_eq!(paths.root(), roots.host_root.join("not-foo"));
    }

    #[test]
    fn test_root_absolute_override() {
        let roots = roots();
        let elsewhere = roots.tool_root.join("elsewhere");
        let paths = path_set(&roots, "foo", AppOptions::default().with_path(&elsewhere));
        assert_eq!(paths.root(), elsewhere);
    }

    #[test]
    fn test_tmp_is_created_child_of_root() {
        let roots = roots();
        let paths = path_set(&roots, "foo", AppOptions::default());

        let tmp = paths.tmp().unwrap();
        assert!(tmp.is_dir());
        assert_eq!(tmp, roots.host_root.join("foo").join("tmp"));
    }

    #[test]
    fn test_dist_is_created_under_apps() {
        let roots = roots();
        let paths = path_set(&roots, "foo", AppOptions::default());

        assert!(paths.apps().unwrap().is_dir());
        assert_eq!(paths.apps().unwrap(), roots.tool_root.join("apps"));

        let dist = paths.dist().unwrap();
        assert!(dist.is_dir());
        assert_eq!(dist, roots.tool_root.join("apps").join("foo"));
        assert_eq!(paths.index_file().unwrap(), dist.join("index.html"));
    }

    #[test]
    fn test_dist_is_memoized() {
        let roots = roots();
        let paths = path_set(&roots, "foo", AppOptions::default());

        let first = paths.dist().unwrap();
        let second = paths.dist().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_concurrent_first_access() {
        let roots = roots();
        let paths = Arc::new(path_set(&roots, "foo", AppOptions::default()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let paths = Arc::clone(&paths);
                std::thread::spawn(move || paths.dist().map(Path::to_path_buf))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    }

    #[test]
    fn test_log_depends_on_environment() {
        let roots = roots();
        let configuration = configuration(
            &roots,
            Settings {
                environment: Environment::Test,
                ..Settings::default()
            },
        );
        let paths = PathSet::new("foo", AppOptions::default(), configuration);

        assert_eq!(paths.log(), roots.host_root.join("log").join("foo.test.log"));
    }

    #[test]
    fn test_markers_are_children_of_tmp() {
        let roots = roots();
        let paths = path_set(&roots, "foo", AppOptions::default());
        let tmp = paths.tmp().unwrap().to_path_buf();

        assert_eq!(paths.lockfile().unwrap(), tmp.join("build.lock"));
        assert_eq!(paths.error_file().unwrap(), tmp.join("error.txt"));
        assert_eq!(paths.package_json_file(), paths.root().join("package.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_child_of_node_modules() {
        let roots = roots();
        let ember = create_executable(
            &roots
                .host_root
                .join("foo")
                .join("node_modules")
                .join(".bin")
                .join("ember"),
        );
        let paths = path_set(&roots, "foo", AppOptions::default());

        assert_eq!(paths.executable("ember").unwrap(), ember);
        assert_eq!(paths.tool().unwrap(), ember);
    }

    #[test]
    fn test_executable_missing_raises_dependency_error() {
        let roots = roots();
        let paths = path_set(&roots, "foo", AppOptions::default());

        let err = paths.executable("ember").unwrap_err();
        assert!(matches!(
            err,
            Error::Dependency(DependencyError::MissingTool { .. })
        ));
        assert!(err.to_string().contains("npm install"));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_without_execute_bit() {
        use std::os::unix::fs::PermissionsExt;

        let roots = roots();
        let bin = roots.host_root.join("foo").join("node_modules").join(".bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("ember"), "").unwrap();
        fs::set_permissions(bin.join("ember"), fs::Permissions::from_mode(0o644)).unwrap();
        let paths = path_set(&roots, "foo", AppOptions::default());

        assert!(paths.executable("ember").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_bower_can_be_overridden() {
        let roots = roots();
        let fake_bower = create_executable(&roots.tool_root.join("bower"));
        let paths = path_set(&roots, "foo", AppOptions::default().with_bower_path(&fake_bower));

        assert_eq!(paths.bower().unwrap(), fake_bower);
    }

    #[cfg(unix)]
    #[test]
    fn test_bower_can_be_configured() {
        let roots = roots();
        let fake_bower = create_executable(&roots.tool_root.join("bower"));
        let configuration = configuration(
            &roots,
            Settings {
                bower_path: Some(fake_bower.clone()),
                ..Settings::default()
            },
        );
        let paths = PathSet::new("foo", AppOptions::default(), configuration);

        assert_eq!(paths.bower().unwrap(), fake_bower);
    }

    #[test]
    fn test_bower_not_executable() {
        let roots = roots();
        let paths = path_set(
            &roots,
            "foo",
            AppOptions::default().with_bower_path(roots.tool_root.join("missing-bower")),
        );

        let err = paths.bower().unwrap_err();
        assert!(matches!(
            err,
            Error::Dependency(DependencyError::NotExecutable { .. })
        ));
    }

    #[test]
    fn test_npm_can_be_overridden() {
        let roots = roots();
        let paths = path_set(&roots, "foo", AppOptions::default().with_npm_path("npm-path"));
        assert_eq!(paths.npm().unwrap(), PathBuf::from("npm-path"));
    }

    #[test]
    fn test_npm_can_be_configured() {
        let roots = roots();
        let configuration = configuration(
            &roots,
            Settings {
                npm_path: Some(PathBuf::from("npm-path")),
                ..Settings::default()
            },
        );
        let paths = PathSet::new("foo", AppOptions::default(), configuration);
        assert_eq!(paths.npm().unwrap(), PathBuf::from("npm-path"));
    }

    #[test]
    fn test_npm_override_beats_configuration() {
        let roots = roots();
        let configuration = configuration(
            &roots,
            Settings {
                npm_path: Some(PathBuf::from("configured-npm")),
                ..Settings::default()
            },
        );
        let paths = PathSet::new(
            "foo",
            AppOptions::default().with_npm_path("app-npm"),
            configuration,
        );
        assert_eq!(paths.npm().unwrap(), PathBuf::from("app-npm"));
    }
}
