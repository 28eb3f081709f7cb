//! Command implementations for the ember-host CLI.
//!
//! Each command lives in its own module and exposes an `execute` function
//! taking its parsed arguments and the loaded [`Registry`].

pub mod build;
pub mod compile;
pub mod install;
pub mod paths;
pub mod render;
pub mod status;
pub(crate) mod utils;

use ember_host::Registry;

use crate::cli::{Cli, Command};
use crate::error::Result;

pub use build::execute as build_execute;
pub use compile::execute as compile_execute;
pub use install::execute as install_execute;
pub use paths::execute as paths_execute;
pub use render::execute as render_execute;
pub use status::execute as status_execute;
pub use test::execute as test_execute;

/// Load settings from the global flags and run the selected command.
pub fn execute(cli: Cli) -> Result<()> {
    let registry: Registry =
        utils::load_registry(cli.config.as_deref(), cli.root, cli.environment)?;

    match cli.command {
        Command::Install(args) => install_execute(args, &registry),
        Command::Compile(args) => compile_execute(args, &registry),
        Command::Build(args) => build_execute(args, &registry),
        Command::Test(args) => test_execute(args, &registry),
        Command::Render(args) => render_execute(args, &registry),
        Command::Paths(args) => paths_execute(args, &registry),
        Command::Status(args) => status_execute(args, &registry),
    }
}
