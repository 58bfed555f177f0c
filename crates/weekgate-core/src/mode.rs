//! # Validation Modes
//!
//! The three strictness tiers of a gate run and the policy table that
//! decides what each tier checks.
//!
//! ```text
//! drafting  ──▶  idle  ──▶  release
//! (narrative)   (all files, QA)   (all files, QA, pedagogy, anchors, tests)
//! ```
//!
//! Each later mode's policy is a superset of the earlier one. All
//! mode-dependent behavior is looked up here; checkers do not compare
//! modes themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Strictness tier of a validation run, ordered from most lenient to strictest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Writing/polishing stage: only the narrative is required.
    Drafting,
    /// Pre-release stage: every file present, QA blockers resolved, no tests run.
    Idle,
    /// Release stage: everything, including pedagogy checks and the test suite.
    Release,
}

impl ValidationMode {
    /// Every mode, in strictness order.
    pub fn all() -> &'static [ValidationMode] {
        &[Self::Drafting, Self::Idle, Self::Release]
    }

    /// Lowercase name as used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drafting => "drafting",
            Self::Idle => "idle",
            Self::Release => "release",
        }
    }

    /// The check table for this mode.
    pub fn policy(&self) -> &'static ModePolicy {
        match self {
            Self::Drafting => &DRAFTING_POLICY,
            Self::Idle => &IDLE_POLICY,
            Self::Release => &RELEASE_POLICY,
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drafting" => Ok(Self::Drafting),
            "idle" => Ok(Self::Idle),
            "release" => Ok(Self::Release),
            other => Err(CoreError::InvalidMode(other.to_string())),
        }
    }
}

/// Which checks run in a mode.
///
/// | Check | drafting | idle | release |
/// |---|---|---|---|
/// | full required set + test files | | ✓ | ✓ |
/// | examples present | | ✓ | ✓ |
/// | release TODO threshold | | | ✓ |
/// | solution / narrative / characters | | | ✓ |
/// | concept budget / review bridges | | | ✓ |
/// | QA blockers | | ✓ | ✓ |
/// | test dispatch | | | ✓ |
///
/// The DoD marker and skeleton TODO threshold run in every mode. Sidecar
/// checks are governed by [`SidecarKind::presence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    pub full_required_set: bool,
    pub require_test_files: bool,
    pub check_examples: bool,
    pub enforce_release_todo_limit: bool,
    pub check_solution_customized: bool,
    pub check_progress_narrative: bool,
    pub check_characters: bool,
    pub check_concept_budget: bool,
    pub check_review_bridges: bool,
    pub check_qa_blockers: bool,
    pub run_tests: bool,
}

const DRAFTING_POLICY: ModePolicy = ModePolicy {
    full_required_set: false,
    require_test_files: false,
    check_examples: false,
    enforce_release_todo_limit: false,
    check_solution_customized: false,
    check_progress_narrative: false,
    check_characters: false,
    check_concept_budget: false,
    check_review_bridges: false,
    check_qa_blockers: false,
    run_tests: false,
};

const IDLE_POLICY: ModePolicy = ModePolicy {
    full_required_set: true,
    require_test_files: true,
    check_examples: true,
    check_qa_blockers: true,
    ..DRAFTING_POLICY
};

const RELEASE_POLICY: ModePolicy = ModePolicy {
    enforce_release_todo_limit: true,
    check_solution_customized: true,
    check_progress_narrative: true,
    check_characters: true,
    check_concept_budget: true,
    check_review_bridges: true,
    run_tests: true,
    ..IDLE_POLICY
};

/// How a sidecar's absence is treated in a given mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The sidecar is not consulted in this mode.
    Skipped,
    /// Checked when present; absence is tolerated.
    Optional,
    /// Absence is an error.
    Required,
}

/// The structured sidecar files read by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidecarKind {
    /// Package-local `TERMS.yml`.
    Terms,
    /// Package-local `ANCHORS.yml`.
    Anchors,
    /// Shared `shared/glossary.yml`.
    Glossary,
    /// Shared `shared/concept_map.yml`.
    ConceptMap,
    /// Shared `shared/characters.yml`.
    Characters,
}

impl SidecarKind {
    /// Path of the sidecar, relative to the package directory for local
    /// sidecars and to the repository root for shared ones.
    pub fn relative_path(&self) -> &'static str {
        match self {
            Self::Terms => "TERMS.yml",
            Self::Anchors => "ANCHORS.yml",
            Self::Glossary => "shared/glossary.yml",
            Self::ConceptMap => "shared/concept_map.yml",
            Self::Characters => "shared/characters.yml",
        }
    }

    /// Absence policy for this sidecar under `mode`.
    ///
    /// Required package-local sidecars are also part of the required file
    /// set, so their absence is reported once by the structural check and
    /// the sidecar checker then skips.
    pub fn presence(&self, mode: ValidationMode) -> Presence {
        match (self, mode) {
            (Self::Terms, ValidationMode::Drafting) => Presence::Optional,
            (Self::Terms, _) => Presence::Required,
            (Self::Anchors, ValidationMode::Release) => Presence::Required,
            (Self::Anchors, _) => Presence::Skipped,
            (Self::Glossary, _) => Presence::Required,
            (Self::ConceptMap | Self::Characters, ValidationMode::Release) => Presence::Optional,
            (Self::ConceptMap | Self::Characters, _) => Presence::Skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_are_ordered_by_strictness() {
        assert!(ValidationMode::Drafting < ValidationMode::Idle);
        assert!(ValidationMode::Idle < ValidationMode::Release);
    }

    #[test]
    fn as_str_roundtrip() {
        for mode in ValidationMode::all() {
            let parsed: ValidationMode = mode.as_str().parse().unwrap();
            assert_eq!(*mode, parsed);
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("Release".parse::<ValidationMode>().is_err());
        assert!("strict".parse::<ValidationMode>().is_err());
    }

    #[test]
    fn serde_is_lowercase() {
        let yaml = serde_yaml::to_string(&ValidationMode::Idle).unwrap();
        assert_eq!(yaml.trim(), "idle");
    }

    fn enabled(p: &ModePolicy) -> Vec<bool> {
        vec![
            p.full_required_set,
            p.require_test_files,
            p.check_examples,
            p.enforce_release_todo_limit,
            p.check_solution_customized,
            p.check_progress_narrative,
            p.check_characters,
            p.check_concept_budget,
            p.check_review_bridges,
            p.check_qa_blockers,
            p.run_tests,
        ]
    }

    #[test]
    fn each_policy_is_a_superset_of_the_previous() {
        let modes = ValidationMode::all();
        for pair in modes.windows(2) {
            let lower = enabled(pair[0].policy());
            let upper = enabled(pair[1].policy());
            for (l, u) in lower.iter().zip(&upper) {
                assert!(!l || *u, "{} enables a check {} does not", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn drafting_runs_no_optional_checks() {
        assert!(enabled(ValidationMode::Drafting.policy()).iter().all(|b| !b));
    }

    #[test]
    fn only_release_runs_tests() {
        assert!(!ValidationMode::Idle.policy().run_tests);
        assert!(ValidationMode::Release.policy().run_tests);
        assert!(ValidationMode::Idle.policy().check_qa_blockers);
    }

    #[test]
    fn sidecar_presence_table() {
        use ValidationMode::*;
        assert_eq!(SidecarKind::Terms.presence(Drafting), Presence::Optional);
        assert_eq!(SidecarKind::Terms.presence(Idle), Presence::Required);
        assert_eq!(SidecarKind::Anchors.presence(Idle), Presence::Skipped);
        assert_eq!(SidecarKind::Anchors.presence(Release), Presence::Required);
        assert_eq!(SidecarKind::Glossary.presence(Drafting), Presence::Required);
        assert_eq!(SidecarKind::ConceptMap.presence(Release), Presence::Optional);
        assert_eq!(SidecarKind::Characters.presence(Idle), Presence::Skipped);
    }

    #[test]
    fn shared_sidecars_live_under_shared() {
        for kind in [SidecarKind::Glossary, SidecarKind::ConceptMap, SidecarKind::Characters] {
            assert!(kind.relative_path().starts_with("shared/"));
        }
        assert!(!SidecarKind::Terms.relative_path().contains('/'));
    }
}
