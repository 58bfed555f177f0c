//! # Language Profiles
//!
//! A package belongs to one of two source ecosystems. Each ecosystem has
//! its own directory conventions and test-invocation contract, captured as
//! a static [`LanguageProfile`] record. Checkers read the profile; they do
//! not branch on [`Language`] directly.
//!
//! ## Detection
//!
//! [`detect_language`] checks, in order:
//!
//! 1. `starter_code/pom.xml` exists (strongest signal);
//! 2. a `.java` file sits directly in `examples/`;
//! 3. a `.java` file exists anywhere under `starter_code/src/`.
//!
//! The first hit wins. With no signal the package is Python.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scan;

/// Source ecosystem of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
}

impl Language {
    /// Lowercase name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// The conventions for this ecosystem.
    pub fn profile(&self) -> &'static LanguageProfile {
        match self {
            Self::Python => &PYTHON_PROFILE,
            Self::Java => &JAVA_PROFILE,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External test runner used by a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunnerKind {
    /// `python -m pytest <tests dir> -q`
    Pytest,
    /// `mvn test -f <pom.xml> -q`
    Maven,
}

impl RunnerKind {
    /// Short name used in error lines ("pytest failed").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pytest => "pytest",
            Self::Maven => "mvn",
        }
    }
}

/// Naming rule for test source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFileRule {
    /// Direct children of the test directory named `<prefix>*.<extension>`.
    Prefixed {
        prefix: &'static str,
        extension: &'static str,
    },
    /// Any file below the test directory ending in one of `suffixes`.
    Suffixed { suffixes: &'static [&'static str] },
}

impl TestFileRule {
    /// Whether a file name satisfies the rule.
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::Prefixed { prefix, extension } => {
                file_name.starts_with(prefix) && scan::has_extension(extension)(file_name)
            }
            Self::Suffixed { suffixes } => suffixes.iter().any(|s| file_name.ends_with(s)),
        }
    }

    /// Whether matching files are searched recursively.
    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::Suffixed { .. })
    }

    /// Human-readable pattern for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Prefixed { prefix, extension } => format!("{prefix}*.{extension}"),
            Self::Suffixed { suffixes } => suffixes
                .iter()
                .map(|s| format!("*{s}"))
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

/// Directory, file and test conventions of one ecosystem.
///
/// All paths are relative to the package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    pub language: Language,
    /// Display name ("Python").
    pub display_name: &'static str,
    /// Source file extension without the dot.
    pub source_extension: &'static str,
    /// Canonical single-file solution, when the ecosystem has one.
    pub solution_file: Option<&'static str>,
    /// Dedicated tests directory that must exist, when the ecosystem has one.
    pub tests_dir: Option<&'static str>,
    /// Where test sources are searched for.
    pub test_source_dir: &'static str,
    pub test_file_rule: TestFileRule,
    /// Build descriptor the test runner is pointed at.
    pub build_descriptor: Option<&'static str>,
    /// Running example project that release narratives must mention.
    pub project_name: &'static str,
    /// Runner tag accepted as a prefix on anchor verification references.
    pub anchor_tag: &'static str,
    pub runner: RunnerKind,
}

/// Package directories common to every ecosystem.
pub const EXAMPLES_DIR: &str = "examples";
/// Starter/solution subtree.
pub const SOLUTION_DIR: &str = "starter_code";

static PYTHON_PROFILE: LanguageProfile = LanguageProfile {
    language: Language::Python,
    display_name: "Python",
    source_extension: "py",
    solution_file: Some("starter_code/solution.py"),
    tests_dir: Some("tests"),
    test_source_dir: "tests",
    test_file_rule: TestFileRule::Prefixed {
        prefix: "test_",
        extension: "py",
    },
    build_descriptor: None,
    project_name: "PyHelper",
    anchor_tag: "pytest",
    runner: RunnerKind::Pytest,
};

static JAVA_PROFILE: LanguageProfile = LanguageProfile {
    language: Language::Java,
    display_name: "Java",
    source_extension: "java",
    solution_file: None,
    tests_dir: None,
    test_source_dir: "starter_code/src/test/java",
    test_file_rule: TestFileRule::Suffixed {
        suffixes: &["Test.java", "Tests.java"],
    },
    build_descriptor: Some("starter_code/pom.xml"),
    project_name: "CampusFlow",
    anchor_tag: "junit",
    runner: RunnerKind::Maven,
};

/// Every known profile.
pub fn all_profiles() -> [&'static LanguageProfile; 2] {
    [&PYTHON_PROFILE, &JAVA_PROFILE]
}

/// Classify a package by its file layout. Never fails.
pub fn detect_language(week_dir: &Path) -> Language {
    let solution_dir = week_dir.join(SOLUTION_DIR);

    if solution_dir.join("pom.xml").is_file() {
        tracing::debug!("language signal: starter_code/pom.xml");
        return Language::Java;
    }

    let is_java = scan::has_extension("java");
    if !scan::list_files(&week_dir.join(EXAMPLES_DIR), &is_java).is_empty() {
        tracing::debug!("language signal: .java file in examples/");
        return Language::Java;
    }

    if scan::any_file(&solution_dir.join("src"), &is_java) {
        tracing::debug!("language signal: .java file under starter_code/src/");
        return Language::Java;
    }

    Language::Python
}
