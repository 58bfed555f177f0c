//! # Anchor Resolution
//!
//! Anchors are verifiable claims. Each needs an id, a claim, evidence and
//! a verification string; when the verification names a test by node id
//! (`path::name`), the test file must exist.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use weekgate_core::language::all_profiles;
use weekgate_core::SidecarKind;

use crate::package::Package;
use crate::parser::{self, Item};
use crate::records::{non_empty, AnchorEntry};
use crate::validation::{ValidationResult, ViolationKind};

/// A test reference extracted from a verification string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReference<'a> {
    /// Path part before the first `::`.
    pub file: &'a str,
    /// Everything after the first `::`.
    pub test: &'a str,
}

/// Extract a test node id from a verification string.
///
/// Accepted forms are `path::name` and `<tag>: path::name` where `<tag>`
/// is a known runner tag (`pytest`, `junit`). A reference never contains
/// whitespace. Anything else (prose, shell commands) is not a reference.
pub fn parse_test_reference(verification: &str) -> Option<TestReference<'_>> {
    let mut v = verification.trim();
    for profile in all_profiles() {
        if let Some(rest) = v
            .strip_prefix(profile.anchor_tag)
            .and_then(|r| r.strip_prefix(':'))
        {
            v = rest.trim();
            break;
        }
    }
    if v.is_empty() || v.chars().any(char::is_whitespace) {
        return None;
    }
    let (file, test) = v.split_once("::")?;
    if file.is_empty() {
        return None;
    }
    Some(TestReference { file, test })
}

/// Places a referenced test file may live: as given when absolute,
/// otherwise relative to the package, then to the repository root.
pub fn candidate_paths(pkg: &Package, file: &str) -> Vec<PathBuf> {
    let p = Path::new(file);
    if p.is_absolute() {
        vec![p.to_path_buf()]
    } else {
        vec![pkg.dir.join(p), pkg.root.join(p)]
    }
}

/// Load the package's `ANCHORS.yml` and validate every anchor.
pub fn check_anchors(pkg: &Package) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let rel = SidecarKind::Anchors.relative_path();
    let items = match parser::load_items::<AnchorEntry>(&pkg.path(rel)) {
        Ok(items) => items,
        Err(e) if e.is_not_found() => {
            tracing::info!("{rel} not present; skipping anchor checks");
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
    result.merge(check_anchor_items(pkg, items));
    result
}

pub fn check_anchor_items(pkg: &Package, items: Vec<Item<AnchorEntry>>) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let rel = SidecarKind::Anchors.relative_path();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut resolved = 0usize;

    for item in items {
        let (index, entry) = match item {
            Ok(pair) => pair,
            Err(e) => {
                result.add(ViolationKind::MalformedData, e.describe(rel));
                continue;
            }
        };

        let id = non_empty(&entry.id);
        match id {
            None => result.add(
                ViolationKind::MalformedData,
                format!("{rel} item #{index} missing non-empty 'id'"),
            ),
            Some(id) => {
                if !seen.insert(id.to_string()) {
                    result.add(
                        ViolationKind::CrossReference,
                        format!("duplicate anchor id: '{id}'"),
                    );
                }
            }
        }
        let label = id.unwrap_or("?");

        for (field, value) in [("claim", &entry.claim), ("evidence", &entry.evidence)] {
            if non_empty(value).is_none() {
                result.add(
                    ViolationKind::MalformedData,
                    format!("{rel} item #{index} ({label}) missing non-empty '{field}'"),
                );
            }
        }

        let Some(verification) = non_empty(&entry.verification) else {
            result.add(
                ViolationKind::MalformedData,
                format!("{rel} item #{index} ({label}) missing non-empty 'verification'"),
            );
            continue;
        };

        let Some(reference) = parse_test_reference(verification) else {
            continue;
        };
        if candidate_paths(pkg, reference.file).iter().any(|c| c.exists()) {
            resolved += 1;
        } else {
            result.add(
                ViolationKind::CrossReference,
                format!(
                    "{rel} item #{index} ({label}) verification refers to missing test file: '{}'",
                    reference.file
                ),
            );
        }
    }

    if result.is_valid() {
        tracing::info!(anchors = seen.len(), resolved, "OK: {rel}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekgate_core::WeekId;

    fn package(root: &Path) -> Package {
        std::fs::create_dir_all(root.join("chapters/week_06/tests")).unwrap();
        std::fs::write(root.join("chapters/week_06/tests/test_loops.py"), "").unwrap();
        Package::locate(root, WeekId::parse("6").unwrap()).unwrap()
    }

    fn write_anchors(pkg: &Package, yaml: &str) {
        std::fs::write(pkg.path("ANCHORS.yml"), yaml).unwrap();
    }

    #[test]
    fn test_parse_plain_node_id() {
        let r = parse_test_reference("tests/test_loops.py::test_sum").unwrap();
        assert_eq!(r.file, "tests/test_loops.py");
        assert_eq!(r.test, "test_sum");
    }

    #[test]
    fn test_parse_tagged_node_ids() {
        let r = parse_test_reference("pytest: tests/test_loops.py::test_sum").unwrap();
        assert_eq!(r.file, "tests/test_loops.py");
        let r = parse_test_reference("junit:src/test/java/FlowTest.java::adds").unwrap();
        assert_eq!(r.file, "src/test/java/FlowTest.java");
    }

    #[test]
    fn test_prose_is_not_a_reference() {
        assert!(parse_test_reference("run python3 -m pytest").is_none());
        assert!(parse_test_reference("pytest: tests/a.py :: b").is_none());
        assert!(parse_test_reference("manual review").is_none());
        assert!(parse_test_reference("::only_name").is_none());
        assert!(parse_test_reference("   ").is_none());
    }

    #[test]
    fn test_resolvable_anchor_passes() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = package(tmp.path());
        write_anchors(
            &pkg,
            "- id: W06-A1\n  claim: sum works\n  evidence: CHAPTER.md#loops\n  verification: pytest:tests/test_loops.py::test_sum\n",
        );
        assert!(check_anchors(&pkg).is_valid());
    }

    #[test]
    fn test_root_relative_reference_resolves() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = package(tmp.path());
        write_anchors(
            &pkg,
            "- id: A\n  claim: c\n  evidence: e\n  verification: chapters/week_06/tests/test_loops.py::t\n",
        );
        assert!(check_anchors(&pkg).is_valid());
    }

    #[test]
    fn test_missing_test_file_is_one_error() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = package(tmp.path());
        write_anchors(
            &pkg,
            "- id: W06-A1\n  claim: c\n  evidence: e\n  verification: tests/test_gone.py::test_x\n",
        );
        assert_eq!(
            check_anchors(&pkg).messages(),
            vec!["ANCHORS.yml item #1 (W06-A1) verification refers to missing test file: 'tests/test_gone.py'"]
        );
    }

    #[test]
    fn test_field_and_duplicate_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = package(tmp.path());
        write_anchors(
            &pkg,
            "- id: A\n  claim: c\n  evidence: e\n  verification: manual\n\
             - id: A\n  evidence: e\n  verification: manual\n\
             - claim: c\n  evidence: e\n",
        );
        assert_eq!(
            check_anchors(&pkg).messages(),
            vec![
                "duplicate anchor id: 'A'",
                "ANCHORS.yml item #2 (A) missing non-empty 'claim'",
                "ANCHORS.yml item #3 missing non-empty 'id'",
                "ANCHORS.yml item #3 (?) missing non-empty 'verification'",
            ]
        );
    }

    #[test]
    fn test_empty_anchor_file_passes() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = package(tmp.path());
        write_anchors(&pkg, "");
        assert!(check_anchors(&pkg).is_valid());
    }
}
