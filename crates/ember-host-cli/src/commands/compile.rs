//! Compile command implementation.
//!
//! Used ahead of deploys: the production environment never builds on its
//! own, so the artifact has to exist before the server starts.

use std::time::Instant;

use ember_host::Registry;

use crate::cli::AppArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Compile each selected app once and fail on the first build error.
pub fn execute(args: AppArgs, registry: &Registry) -> Result<()> {
    let apps = utils::select_apps(registry, args.app.as_deref())?;
    if utils::warn_if_skipped(registry, "compile") {
        return Ok(());
    }

    for app in apps {
        let started = Instant::now();
        ui::info(&format!("Compiling `{}`...", app.name()));
        app.compile()?;
        ui::success(&format!(
            "Compiled `{}` in {:.1}s",
            app.name(),
            started.elapsed().as_secs_f64()
        ));
    }
    Ok(())
}
