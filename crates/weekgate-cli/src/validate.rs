//! # Validate: run the gate for one package.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use weekgate_core::{GateConfig, ValidationMode, WeekId};
use weekgate_pack::{run_gate, Package, ProcessRunner};

use crate::report;

/// Arguments selecting the package, mode and output.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Week identifier (e.g. 7, 07, week_07).
    #[arg(long)]
    pub week: WeekId,

    /// Validation strictness: drafting | idle | release.
    #[arg(long)]
    pub mode: ValidationMode,

    /// Gate configuration file (defaults to <repo-root>/weekgate.yaml when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Repository root containing `chapters/` and `shared/`.
    #[arg(long)]
    pub repo_root: Option<PathBuf>,

    /// Also write a JSON report to stdout.
    #[arg(long)]
    pub json: bool,
}

/// Execute a gate run and return the process exit code.
///
/// Invocation problems (unreadable config, missing package directory) are
/// returned as errors; gate findings are reported and mapped to exit 2.
pub fn run_validate(args: &ValidateArgs, repo_root: &Path) -> Result<u8> {
    let config_path = args
        .config
        .as_deref()
        .map(|p| crate::resolve_path(p, repo_root));
    let config = GateConfig::discover(repo_root, config_path.as_deref())
        .context("failed to load gate configuration")?;
    tracing::debug!(?config, "gate configuration");

    let package = Package::locate(repo_root, args.week)?;
    let runner = ProcessRunner::new();
    let report = run_gate(&package, args.mode, &config, &runner);

    report::emit(&report, args.json)?;
    Ok(report.exit_code())
}
