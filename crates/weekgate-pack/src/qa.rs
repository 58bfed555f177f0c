//! # QA Blocker Scanner
//!
//! Finds the blocking-items section of the QA report and fails on the
//! first unchecked checklist item outside a comment span.

use crate::package::{Package, QA_REPORT_FILE};
use crate::parser;
use crate::validation::{ValidationResult, ViolationKind};

/// Accepted headings for the blocking-items section.
pub const BLOCKING_HEADINGS: &[&str] = &["## 阻塞项", "## Blocking Items"];

const UNCHECKED_ITEM: &str = "- [ ]";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Result of scanning a QA report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockerScan {
    /// No accepted blocking heading was found.
    MissingSection,
    /// The section exists and has no live unchecked item.
    Clear { heading: &'static str },
    /// The first live unchecked item, with its 1-based line number.
    Unresolved { heading: &'static str, line: usize },
}

fn heading_of(line: &str) -> Option<&'static str> {
    let trimmed = line.trim();
    BLOCKING_HEADINGS
        .iter()
        .copied()
        .find(|h| trimmed.starts_with(h))
}

fn ends_section(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("# ") || trimmed.starts_with("## ")
}

/// Scan report text.
///
/// The section runs from the line after the heading to the next `# ` or
/// `## ` heading. A line that opens a comment is skipped whole, as is every
/// line up to and including the one that closes it.
pub fn scan_blockers(text: &str) -> BlockerScan {
    let mut lines = text.lines().enumerate();
    let Some(heading) = lines.by_ref().find_map(|(_, line)| heading_of(line)) else {
        return BlockerScan::MissingSection;
    };

    let mut in_comment = false;
    for (idx, line) in lines {
        if !in_comment && ends_section(line) {
            break;
        }
        if line.contains(COMMENT_OPEN) {
            in_comment = true;
        }
        if in_comment {
            if line.contains(COMMENT_CLOSE) {
                in_comment = false;
            }
            continue;
        }
        if line.contains(UNCHECKED_ITEM) {
            return BlockerScan::Unresolved {
                heading,
                line: idx + 1,
            };
        }
    }
    BlockerScan::Clear { heading }
}

/// Read the package's QA report and report at most one blocker error.
pub fn check_qa_blockers(pkg: &Package) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let path = pkg.path(QA_REPORT_FILE);
    let text = match parser::read_text(&path) {
        Ok(text) => text,
        Err(e) if e.is_not_found() => {
            tracing::info!("{QA_REPORT_FILE} not present; skipping QA blocker check");
            return result;
        }
        Err(e) => {
            result.add(
                ViolationKind::MalformedData,
                e.relative_to(&pkg.root).to_string(),
            );
            return result;
        }
    };

    match scan_blockers(&text) {
        BlockerScan::MissingSection => result.add(
            ViolationKind::QaBlocker,
            format!(
                "{QA_REPORT_FILE} missing '{}' section: {QA_REPORT_FILE}",
                BLOCKING_HEADINGS[0]
            ),
        ),
        BlockerScan::Unresolved { heading, line } => {
            tracing::debug!(line, "unchecked blocking item");
            result.add(
                ViolationKind::QaBlocker,
                format!("QA blocking item not resolved (found unchecked '{UNCHECKED_ITEM}' under '{heading}')"),
            );
        }
        BlockerScan::Clear { .. } => tracing::info!("OK: no unresolved QA blockers"),
    }
    result
}
