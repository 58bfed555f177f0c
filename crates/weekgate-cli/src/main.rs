//! # weekgate CLI entry point
//!
//! Parses command-line arguments, initializes tracing, resolves the
//! repository root and runs the gate.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use weekgate_cli::find_repo_root;
use weekgate_cli::validate::{run_validate, ValidateArgs};

/// Validate a weekly chapter package against the release gate for a mode.
///
/// Runs every check the mode enables and reports all problems at once.
/// Exits 0 when the package passes, 2 otherwise.
#[derive(Parser, Debug)]
#[command(name = "weekgate", version, about, long_about = None)]
struct Cli {
    /// Print details for each check. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    args: ValidateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the verbosity flag.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("weekgate CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let repo_root = cli.args.repo_root.clone().unwrap_or_else(|| {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        find_repo_root(&cwd).unwrap_or_else(|| {
            tracing::warn!("Could not locate repository root; using current directory");
            cwd
        })
    });

    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    match run_validate(&cli.args, &repo_root) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekgate_core::ValidationMode;

    #[test]
    fn cli_parse_minimal() {
        let cli = Cli::try_parse_from(["weekgate", "--week", "week_03", "--mode", "drafting"]).unwrap();
        assert_eq!(cli.args.week.as_dir_name(), "week_03");
        assert_eq!(cli.args.mode, ValidationMode::Drafting);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.args.json);
        assert!(cli.args.config.is_none());
        assert!(cli.args.repo_root.is_none());
    }

    #[test]
    fn cli_parse_short_week_forms() {
        for form in ["7", "07", "week_07"] {
            let cli = Cli::try_parse_from(["weekgate", "--week", form, "--mode", "idle"]).unwrap();
            assert_eq!(cli.args.week.number(), 7);
        }
    }

    #[test]
    fn cli_parse_verbose_count() {
        let cli =
            Cli::try_parse_from(["weekgate", "-vv", "--week", "1", "--mode", "release"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["weekgate", "--verbose", "--week", "1", "--mode", "release"])
            .unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn cli_parse_all_options() {
        let cli = Cli::try_parse_from([
            "weekgate",
            "--week",
            "12",
            "--mode",
            "release",
            "--config",
            "ci/weekgate.yaml",
            "--repo-root",
            "/srv/book",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.args.config, Some(PathBuf::from("ci/weekgate.yaml")));
        assert_eq!(cli.args.repo_root, Some(PathBuf::from("/srv/book")));
        assert!(cli.args.json);
    }

    #[test]
    fn cli_rejects_invalid_week() {
        for bad in ["0", "100", "wk_07", "week_7x", ""] {
            assert!(
                Cli::try_parse_from(["weekgate", "--week", bad, "--mode", "idle"]).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["weekgate", "--week", "3", "--mode", "final"]).is_err());
    }

    #[test]
    fn cli_requires_week_and_mode() {
        assert!(Cli::try_parse_from(["weekgate", "--mode", "idle"]).is_err());
        assert!(Cli::try_parse_from(["weekgate", "--week", "3"]).is_err());
    }
}
