//! Command line interface definition

use clap::Parser;
use drvup_types::{BackendKind, ColorChoice};
use std::path::PathBuf;

/// drvup - one-pass driver update agent
#[derive(Parser)]
#[command(name = "drvup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search, download, and install driver updates in one pass")]
#[command(long_about = None)]
pub struct Cli {
    /// Report available updates without downloading or installing
    #[arg(long)]
    pub dry_run: bool,

    /// Append a transcript of the run to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Update service backend
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Path to the sim backend catalog
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Color output control
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        // A bare invocation is a full update pass
        let cli = Cli::parse_from(["drvup"]);
        assert!(!cli.dry_run);
        assert!(!cli.global.json);
        assert!(cli.log_file.is_none());

        let cli = Cli::parse_from(["drvup", "--dry-run", "--json", "--debug"]);
        assert!(cli.dry_run);
        assert!(cli.global.json);
        assert!(cli.global.debug);
    }

    #[test]
    fn test_path_flags() {
        let cli = Cli::parse_from([
            "drvup",
            "--log-file",
            "/tmp/run.log",
            "--catalog",
            "/tmp/catalog.toml",
            "--config",
            "/tmp/drvup.toml",
        ]);
        assert_eq!(
            cli.log_file.as_deref(),
            Some(std::path::Path::new("/tmp/run.log"))
        );
        assert_eq!(
            cli.catalog.as_deref(),
            Some(std::path::Path::new("/tmp/catalog.toml"))
        );
        assert_eq!(
            cli.global.config.as_deref(),
            Some(std::path::Path::new("/tmp/drvup.toml"))
        );
    }

    #[test]
    fn test_value_enums() {
        let cli = Cli::parse_from(["drvup", "--backend", "sim", "--color", "never"]);
        assert_eq!(cli.backend, Some(BackendKind::Sim));
        assert_eq!(cli.global.color, Some(ColorChoice::Never));

        assert!(Cli::try_parse_from(["drvup", "--backend", "native"]).is_err());
        assert!(Cli::try_parse_from(["drvup", "--color", "sometimes"]).is_err());
    }
}
