//! Miette diagnostic conversion for CLI errors.

use ember_host::{BuildError, Error};
use miette::Report;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Host(e) => host_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a library error to miette Report
pub fn host_error_to_miette(err: Error) -> Report {
    match err {
        Error::Build(BuildError::Failed { app, output }) => {
            miette::miette!("Build of `{}` failed:\n\n{}", app, output.trim_end())
        }
        Error::Command { label, status } => {
            miette::miette!(
                "`{}` exited with {}\n\nHint: The output above and the app's log file have the details",
                label,
                status
            )
        }
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_failure_names_the_app() {
        let report = cli_error_to_miette(CliError::Host(
            BuildError::Failed {
                app: "frontend".to_string(),
                output: "Syntax error on line 3\n".to_string(),
            }
            .into(),
        ));
        assert_eq!(
            report.to_string(),
            "Build of `frontend` failed:\n\nSyntax error on line 3"
        );
    }

    #[test]
    fn test_other_errors_keep_their_message() {
        let report = cli_error_to_miette(CliError::Host(Error::UnknownApp("admin".to_string())));
        assert!(report.to_string().starts_with("\"admin\" app is not defined"));
    }
}
