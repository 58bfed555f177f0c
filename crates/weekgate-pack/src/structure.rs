//! # Structural Checks
//!
//! Required files and directories, test-file presence, and example
//! presence. Each missing path is its own violation; nothing here stops at
//! the first problem.

use weekgate_core::language::EXAMPLES_DIR;
use weekgate_core::scan;

use crate::package::Package;
use crate::requirements::Requirements;
use crate::validation::{ValidationResult, ViolationKind};

/// Report every required file and directory that is missing.
pub fn check_required_paths(pkg: &Package, req: &Requirements) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for rel in &req.files {
        let path = pkg.path(rel);
        if path.is_file() {
            tracing::info!("OK file: {}", pkg.display(&path));
        } else {
            result.add(
                ViolationKind::Structural,
                format!("missing required file: {}", pkg.display(&path)),
            );
        }
    }

    for rel in &req.dirs {
        let path = pkg.path(rel);
        if path.is_dir() {
            tracing::info!("OK dir: {}", pkg.display(&path));
        } else {
            result.add(
                ViolationKind::Structural,
                format!("missing required dir: {}", pkg.display(&path)),
            );
        }
    }

    result
}

/// Require at least one test file in the language's test tree.
///
/// When the test tree is itself a required directory and is missing, the
/// absence was already reported by [`check_required_paths`] and nothing is
/// added here.
pub fn check_test_files(pkg: &Package) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let profile = pkg.profile();
    let dir = pkg.path(profile.test_source_dir);

    if !dir.is_dir() && profile.tests_dir.is_some() {
        return result;
    }

    let rule = &profile.test_file_rule;
    let found = if rule.is_recursive() {
        scan::find_files(&dir, |name| rule.matches(name))
    } else {
        scan::list_files(&dir, |name| rule.matches(name))
    };

    if found.is_empty() {
        result.add(
            ViolationKind::Structural,
            format!(
                "{} has no {} files: {}",
                profile.test_source_dir,
                rule.describe(),
                pkg.display(&dir)
            ),
        );
    } else {
        tracing::info!(
            "OK: {} has {} {} file(s)",
            pkg.display(&dir),
            found.len(),
            rule.describe()
        );
    }
    result
}

/// Require at least one source file directly inside `examples/`.
pub fn check_examples(pkg: &Package) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let dir = pkg.path(EXAMPLES_DIR);
    if !dir.is_dir() {
        return result;
    }

    let extension = pkg.profile().source_extension;
    let examples = scan::list_files(&dir, scan::has_extension(extension));
    if examples.is_empty() {
        result.add(
            ViolationKind::Structural,
            format!(
                "{EXAMPLES_DIR}/ has no .{extension} files: {}",
                pkg.display(&dir)
            ),
        );
    } else {
        tracing::info!(
            "OK: {EXAMPLES_DIR}/ has {} .{extension} file(s)",
            examples.len()
        );
    }
    result
}
