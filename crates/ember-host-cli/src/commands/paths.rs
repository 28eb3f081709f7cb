//! Paths command implementation.

use std::path::PathBuf;

use ember_host::{Environment, PathSet, Registry};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::PathsArgs;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Derived locations for one app.
#[derive(Debug, Serialize)]
pub struct PathsReport {
    pub app: String,
    pub environment: Environment,
    pub root: PathBuf,
    pub tmp: PathBuf,
    pub dist: PathBuf,
    pub index_file: PathBuf,
    pub log: PathBuf,
    pub lockfile: PathBuf,
    pub error_file: PathBuf,
    pub package_json_file: PathBuf,
    pub bower_json_file: PathBuf,
    pub node_modules: PathBuf,
    /// `None` until dependencies are installed
    pub tool: Option<PathBuf>,
}

impl PathsReport {
    pub fn collect(paths: &PathSet) -> Result<Self> {
        Ok(Self {
            app: paths.app_name().to_string(),
            environment: paths.environment(),
            root: paths.root(),
            tmp: paths.tmp()?.to_path_buf(),
            dist: paths.dist()?.to_path_buf(),
            index_file: paths.index_file()?,
            log: paths.log(),
            lockfile: paths.lockfile()?,
            error_file: paths.error_file()?,
            package_json_file: paths.package_json_file(),
            bower_json_file: paths.bower_json_file(),
            node_modules: paths.node_modules(),
            tool: paths.tool().ok().map(|tool| tool.to_path_buf()),
        })
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let tool = match &self.tool {
            Some(tool) => tool.display().to_string(),
            None => "(not installed)".to_string(),
        };
        vec![
            ("root", self.root.display().to_string()),
            ("tmp", self.tmp.display().to_string()),
            ("dist", self.dist.display().to_string()),
            ("index", self.index_file.display().to_string()),
            ("log", self.log.display().to_string()),
            ("lockfile", self.lockfile.display().to_string()),
            ("error file", self.error_file.display().to_string()),
            ("package.json", self.package_json_file.display().to_string()),
            ("bower.json", self.bower_json_file.display().to_string()),
            ("node_modules", self.node_modules.display().to_string()),
            ("tool", tool),
        ]
    }
}

pub fn execute(args: PathsArgs, registry: &Registry) -> Result<()> {
    let app = registry.app(&args.app)?;
    let report = PathsReport::collect(app.paths())?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize paths")?;
        println!("{json}");
        return Ok(());
    }

    println!("{} ({})", report.app, report.environment);
    for (label, value) in report.rows() {
        if ui::colors_enabled() {
            println!("  {:<13} {}", label.dimmed(), value);
        } else {
            println!("  {:<13} {}", label, value);
        }
    }
    Ok(())
}
