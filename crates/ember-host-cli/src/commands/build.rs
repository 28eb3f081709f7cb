//! Build command implementation.

use ember_host::{Environment, Registry};

use crate::cli::AppArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Make a build available for each selected app and wait for it.
///
/// In development the watcher outlives this command and keeps writing to
/// the app's log file.
pub fn execute(args: AppArgs, registry: &Registry) -> Result<()> {
    let apps = utils::select_apps(registry, args.app.as_deref())?;
    if utils::warn_if_skipped(registry, "build") {
        return Ok(());
    }

    let environment = registry.configuration().environment();
    for app in apps {
        ui::info(&format!("Building `{}` for {}...", app.name(), environment));
        app.build()?;

        if environment == Environment::Development && app.is_watching() {
            ui::success(&format!(
                "`{}` is built; the watcher keeps running and logs to {}",
                app.name(),
                app.paths().log().display()
            ));
        } else {
            ui::success(&format!("`{}` is built", app.name()));
        }
    }
    Ok(())
}
