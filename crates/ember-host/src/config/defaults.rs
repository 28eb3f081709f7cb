use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "ember-host.toml";

pub const ENV_PREFIX: &str = "EMBER_HOST_";

/// Setting this to any non-empty value disables every build-tool invocation.
pub const SKIP_VARIABLE: &str = "SKIP_EMBER";

pub fn default_host_root() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_mode_variable() -> String {
    "APP_ENV".to_string()
}

pub fn default_poll_interval_ms() -> u64 {
    500
}

pub fn default_tool() -> String {
    "ember".to_string()
}
