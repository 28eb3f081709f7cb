use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use indexmap::IndexSet;
use toml_edit::{DocumentMut, Item};

use crate::config::{CONFIG_FILE_NAME, ENV_PREFIX, SKIP_VARIABLE, Settings};
use crate::environment::Environment;
use crate::error::{ConfigError, Result};

/// Values that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host_root: Option<PathBuf>,
    pub environment: Option<Environment>,
}

impl Settings {
    /// Load settings from multiple sources.
    /// Priority: overrides > environment variables > config file > defaults
    ///
    /// An explicit `config_path` must exist; otherwise `ember-host.toml` is
    /// picked up from the host root (or the working directory) when present.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let base = overrides.host_root.clone().unwrap_or_else(|| PathBuf::from("."));
                let default_path = base.join(CONFIG_FILE_NAME);
                default_path.exists().then_some(default_path)
            }
        };

        if let Some(path) = &config_file {
            tracing::debug!("Loading settings from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // EMBER_HOST_ENVIRONMENT, EMBER_HOST_APPS__ADMIN__PATH, ...
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut settings: Settings = figment.extract().map_err(ConfigError::from)?;

        // Figment merges into sorted maps; restore the order apps were written in.
        if let Some(path) = &config_file {
            let declared = declared_app_order(path)?;
            settings
                .apps
                .sort_by_cached_key(|name, _| declared.get_index_of(name).unwrap_or(usize::MAX));
        }

        if let Some(root) = &overrides.host_root {
            settings.host_root = root.clone();
        }
        if let Some(environment) = overrides.environment {
            settings.environment = environment;
        }
        if skip_requested() {
            settings.skip = true;
        }

        settings.finalize()?;
        Ok(settings)
    }

    /// Make roots absolute and reject values that cannot work.
    pub fn finalize(&mut self) -> Result<()> {
        self.host_root = absolutize(&self.host_root)?;
        if let Some(tool_root) = &self.tool_root {
            let resolved = if tool_root.is_absolute() {
                tool_root.clone()
            } else {
                self.host_root.join(tool_root)
            };
            self.tool_root = Some(path_clean::clean(resolved));
        }

        self.validate()
    }

    /// Validate settings for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".to_string(),
            )
            .into());
        }

        if self.mode_variable.trim().is_empty() {
            return Err(ConfigError::Invalid("mode_variable cannot be empty".to_string()).into());
        }

        for name in self.apps.keys() {
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(ConfigError::Invalid(format!(
                    "app name '{}' must be a plain directory name",
                    name
                ))
                .into());
            }
        }

        Ok(())
    }
}

/// Whether the skip switch is set in the process environment.
pub fn skip_requested() -> bool {
    std::env::var_os(SKIP_VARIABLE).is_some_and(|value| !value.is_empty())
}

/// Names under `[apps]` in the order they appear in the file.
fn declared_app_order(path: &Path) -> Result<IndexSet<String>> {
    let content = std::fs::read_to_string(path)?;
    let document = content
        .parse::<DocumentMut>()
        .map_err(|err| ConfigError::Invalid(err.to_string()))?;

    Ok(document
        .get("apps")
        .and_then(Item::as_table_like)
        .map(|apps| apps.iter().map(|(name, _)| name.to_string()).collect())
        .unwrap_or_default())
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(path_clean::clean(joined))
}
