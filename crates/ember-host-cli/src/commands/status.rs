//! Status command implementation.

use ember_host::{BuildStatus, Registry};

use crate::cli::StatusArgs;
use crate::error::Result;
use crate::ui;

/// Report the build state read from the app's lock and error files.
pub fn execute(args: StatusArgs, registry: &Registry) -> Result<()> {
    let app = registry.app(&args.app)?;

    match app.status()? {
        BuildStatus::NotStarted => ui::info(&format!("`{}` has not been built", app.name())),
        BuildStatus::InProgress => ui::info(&format!("`{}` is building", app.name())),
        BuildStatus::Succeeded => ui::success(&format!(
            "`{}` is built: {}",
            app.name(),
            app.paths().index_file()?.display()
        )),
        BuildStatus::Failed { error } => {
            ui::error(&format!("The last build of `{}` failed:", app.name()));
            eprintln!("{}", error.trim_end());
        }
    }
    Ok(())
}
