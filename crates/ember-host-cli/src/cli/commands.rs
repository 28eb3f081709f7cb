use clap::{Args, Subcommand};

/// Available ember-host subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install dependencies
    ///
    /// Runs `npm prune` and `npm install` in the app root, then `bower prune`
    /// and `bower install` when the app has a bower.json.
    Install(AppArgs),

    /// Build once and fail on a recorded build error
    Compile(AppArgs),

    /// Make a build available for the current environment
    ///
    /// development starts the watcher, test compiles once, production only
    /// waits for a build already in progress.
    Build(AppArgs),

    /// Run the app's test suite
    Test(AppArgs),

    /// Print the built index.html with extra markup appended
    Render(RenderArgs),

    /// Show the filesystem locations derived for an app
    Paths(PathsArgs),

    /// Report the state of the last build
    Status(StatusArgs),
}

/// Arguments for commands that run for one app or all of them
#[derive(Args, Debug)]
pub struct AppArgs {
    /// Application name; every configured app when omitted
    #[arg(value_name = "APP")]
    pub app: Option<String>,
}

/// Arguments for the render command
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Application name
    #[arg(value_name = "APP")]
    pub app: String,

    /// Markup appended to the end of <head>
    #[arg(long, default_value = "", value_name = "HTML")]
    pub head: String,

    /// Markup appended to the end of <body>
    #[arg(long, default_value = "", value_name = "HTML")]
    pub body: String,
}

/// Arguments for the paths command
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Application name
    #[arg(value_name = "APP")]
    pub app: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Application name
    #[arg(value_name = "APP")]
    pub app: String,
}
