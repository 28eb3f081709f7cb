//! Install command implementation.

use ember_host::Registry;

use crate::cli::AppArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Install npm (and bower) dependencies for the selected apps.
pub fn execute(args: AppArgs, registry: &Registry) -> Result<()> {
    let apps = utils::select_apps(registry, args.app.as_deref())?;
    if utils::warn_if_skipped(registry, "install") {
        return Ok(());
    }

    for app in apps {
        ui::info(&format!("Installing dependencies for `{}`...", app.name()));
        app.install_dependencies()?;
        ui::success(&format!("Installed dependencies for `{}`", app.name()));
    }
    Ok(())
}
