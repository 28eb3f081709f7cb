//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ember_host::{App, Configuration, Environment, Overrides, Registry, Settings};

use crate::error::{CliError, Result};
use crate::ui;

/// Load settings and register every configured app.
pub fn load_registry(
    config: Option<&Path>,
    root: Option<PathBuf>,
    environment: Option<Environment>,
) -> Result<Registry> {
    let overrides = Overrides {
        host_root: root,
        environment,
    };
    let settings = Settings::load(config, &overrides)?;
    tracing::debug!(
        "Loaded settings for {} in {}",
        settings.host_root.display(),
        settings.environment
    );
    Ok(Registry::new(Arc::new(Configuration::new(settings))))
}

/// The named app, or every configured app when no name is given.
pub fn select_apps<'r>(registry: &'r Registry, name: Option<&str>) -> Result<Vec<&'r App>> {
    match name {
        Some(name) => Ok(vec![registry.app(name)?]),
        None if registry.is_empty() => Err(CliError::InvalidArgument(
            "no apps are configured\n\nHint: Declare apps under [apps] in ember-host.toml"
                .to_string(),
        )),
        None => Ok(registry.apps().collect()),
    }
}

/// Warn when the skip switch turns the command into a no-op.
///
/// Returns `true` when the command should not do anything.
pub fn warn_if_skipped(registry: &Registry, command: &str) -> bool {
    let skip = registry.configuration().settings().skip;
    if skip {
        ui::warning(&format!(
            "SKIP_EMBER is set; `{}` will not invoke the build tool",
            command
        ));
    }
    skip
}
