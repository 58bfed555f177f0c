//! Rendering a [`GateReport`] for humans and for machines.

use chrono::{DateTime, Utc};
use serde::Serialize;
use weekgate_core::ValidationMode;
use weekgate_pack::{GateReport, Violation};

/// Prefix on every summary line.
pub const TAG: &str = "[weekgate]";

/// One-line success summary.
pub fn success_line(report: &GateReport) -> String {
    format!("{TAG} OK: {} (mode={})", report.week, report.mode)
}

/// Failure summary: headline, `Problems:`, then one `- ` line per problem.
pub fn failure_text(report: &GateReport) -> String {
    let mut out = format!("{TAG} FAILED: {} (mode={})\nProblems:\n", report.week, report.mode);
    for violation in report.result.violations() {
        out.push_str("- ");
        out.push_str(&violation.message);
        out.push('\n');
    }
    out
}

/// Machine-readable report written by `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub ok: bool,
    pub week: String,
    pub mode: ValidationMode,
    pub language: &'static str,
    pub generated_at: DateTime<Utc>,
    pub problems: &'a [Violation],
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a GateReport, generated_at: DateTime<Utc>) -> Self {
        Self {
            ok: report.is_ok(),
            week: report.week.to_string(),
            mode: report.mode,
            language: report.language.as_str(),
            generated_at,
            problems: report.result.violations(),
        }
    }
}

/// Print the report. Text goes to stdout on success and stderr on
/// failure; with `json`, the JSON document owns stdout and the text
/// summary moves to stderr.
pub fn emit(report: &GateReport, json: bool) -> anyhow::Result<()> {
    if json {
        let doc = JsonReport::new(report, Utc::now());
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }
    if report.is_ok() {
        if json {
            eprintln!("{}", success_line(report));
        } else {
            println!("{}", success_line(report));
        }
    } else {
        eprint!("{}", failure_text(report));
    }
    Ok(())
}
