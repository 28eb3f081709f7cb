#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use ember_host::Environment;
    use std::path::PathBuf;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ember-host",
            "build",
            "frontend",
            "--root",
            "/srv/app",
            "--environment",
            "production",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/srv/app")));
        assert_eq!(cli.environment, Some(Environment::Production));
        match cli.command {
            Command::Build(args) => assert_eq!(args.app.as_deref(), Some("frontend")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_environment_aliases() {
        let cli = Cli::try_parse_from(["ember-host", "-e", "prod", "status", "frontend"]).unwrap();
        assert_eq!(cli.environment, Some(Environment::Production));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let err = Cli::try_parse_from(["ember-host", "-e", "staging", "status", "frontend"])
            .unwrap_err();
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_app_is_optional_for_bulk_commands() {
        let cli = Cli::try_parse_from(["ember-host", "compile"]).unwrap();
        match cli.command {
            Command::Compile(args) => assert!(args.app.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_render_fragments_default_to_empty() {
        let cli = Cli::try_parse_from(["ember-host", "render", "frontend", "--head", "<meta>"])
            .unwrap();
        match cli.command {
            Command::Render(args) => {
                assert_eq!(args.app, "frontend");
                assert_eq!(args.head, "<meta>");
                assert_eq!(args.body, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_render_requires_app() {
        assert!(Cli::try_parse_from(["ember-host", "render"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["ember-host", "-v", "-q", "status", "frontend"]).is_err());
    }

    #[test]
    fn test_paths_json_flag() {
        let cli = Cli::try_parse_from(["ember-host", "paths", "admin", "--json"]).unwrap();
        match cli.command {
            Command::Paths(args) => {
                assert_eq!(args.app, "admin");
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
