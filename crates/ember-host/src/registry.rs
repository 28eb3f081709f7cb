//! The set of front-end applications a host process serves.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::app::App;
use crate::config::{AppOptions, Configuration};
use crate::error::{Error, Result};
use crate::runner::{Runner, Shell};

/// Named applications sharing one [`Configuration`], kept in registration
/// order.
pub struct Registry {
    configuration: Arc<Configuration>,
    runner: Arc<dyn Runner>,
    apps: IndexMap<String, App>,
}

impl Registry {
    /// Registry running real subprocesses, pre-populated with every app
    /// declared in the settings.
    pub fn new(configuration: Arc<Configuration>) -> Self {
        Self::with_runner(configuration, Arc::new(Shell::new()))
    }

    pub fn with_runner(configuration: Arc<Configuration>, runner: Arc<dyn Runner>) -> Self {
        let declared = configuration.settings().apps.clone();
        let mut registry = Self {
            configuration,
            runner,
            apps: IndexMap::with_capacity(declared.len()),
        };
        for (name, options) in declared {
            registry.register(name, options);
        }
        registry
    }

    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }

    /// Add an application. Registering a name again replaces the previous
    /// instance but keeps its position.
    pub fn register(&mut self, name: impl Into<String>, options: AppOptions) -> &App {
        let name = name.into();
        tracing::debug!("Registering app `{}`", name);
        let app = App::with_runner(
            name.clone(),
            options,
            Arc::clone(&self.configuration),
            Arc::clone(&self.runner),
        );
        let (index, _) = self.apps.insert_full(name, app);
        &self.apps[index]
    }

    pub fn app(&self, name: &str) -> Result<&App> {
        self.apps
            .get(name)
            .ok_or_else(|| Error::UnknownApp(name.to_string()))
    }

    pub fn apps(&self) -> impl Iterator<Item = &App> {
        self.apps.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn build(&self, name: &str) -> Result<()> {
        self.app(name)?.build()
    }

    /// Build `name` and embed the caller's fragments into its `index.html`.
    pub fn render(&self, name: &str, head: &str, body: &str) -> Result<String> {
        let app = self.app(name)?;
        app.build()?;
        app.render(head, body)
    }

    pub fn install_all(&self) -> Result<()> {
        self.each(App::install_dependencies)
    }

    pub fn compile_all(&self) -> Result<()> {
        self.each(App::compile)
    }

    pub fn test_all(&self) -> Result<()> {
        self.each(App::test)
    }

    /// Stop every watcher this process started.
    pub fn shutdown(&self) -> Result<()> {
        self.each(App::stop_watching)
    }

    fn each(&self, operation: impl Fn(&App) -> Result<()>) -> Result<()> {
        self.apps.values().try_for_each(operation)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("environment", &self.configuration.environment())
            .field("apps", &self.apps)
            .finish_non_exhaustive()
    }
}
