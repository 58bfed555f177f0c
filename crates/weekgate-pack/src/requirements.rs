//! Required-path sets per mode and language.

use weekgate_core::language::{EXAMPLES_DIR, SOLUTION_DIR};
use weekgate_core::{LanguageProfile, SidecarKind, ValidationMode};

use crate::package::{ASSIGNMENT_FILE, NARRATIVE_FILE, QA_REPORT_FILE, RUBRIC_FILE};

/// What must exist in a package for a given mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirements {
    /// Package-relative files, in reporting order.
    pub files: Vec<&'static str>,
    /// Package-relative directories, in reporting order.
    pub dirs: Vec<&'static str>,
    /// At least one source file in `examples/`.
    pub requires_examples: bool,
    /// At least one test file in the language's test tree.
    pub requires_tests: bool,
}

/// Resolve the required set for `mode` and the package's language.
///
/// Drafting requires only the narrative; idle and release require the
/// full document set, both package sidecars, the solution file (when the
/// language has a single one), and the standard directories.
pub fn resolve(mode: ValidationMode, profile: &LanguageProfile) -> Requirements {
    let policy = mode.policy();
    if !policy.full_required_set {
        return Requirements {
            files: vec![NARRATIVE_FILE],
            dirs: Vec::new(),
            requires_examples: false,
            requires_tests: false,
        };
    }

    let mut files = vec![
        NARRATIVE_FILE,
        ASSIGNMENT_FILE,
        RUBRIC_FILE,
        QA_REPORT_FILE,
        SidecarKind::Anchors.relative_path(),
        SidecarKind::Terms.relative_path(),
    ];
    files.extend(profile.solution_file);

    let mut dirs = vec![EXAMPLES_DIR, SOLUTION_DIR];
    dirs.extend(profile.tests_dir);

    Requirements {
        files,
        dirs,
        requires_examples: policy.check_examples,
        requires_tests: policy.require_test_files,
    }
}
