//! Render command implementation.

use std::io::Write;

use ember_host::Registry;

use crate::cli::RenderArgs;
use crate::error::{Result, ResultExt};

/// Build the app if needed and print its merged `index.html` to stdout.
pub fn execute(args: RenderArgs, registry: &Registry) -> Result<()> {
    let html = registry.render(&args.app, &args.head, &args.body)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(html.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write rendered markup")?;
    Ok(())
}
