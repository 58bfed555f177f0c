//! # Gate Configuration
//!
//! Thresholds and runner commands, with defaults matching the course
//! conventions. A repository may override any of them in `weekgate.yaml`
//! at its root, or the CLI may point at another file with `--config`.
//!
//! ```yaml
//! release_todo_max_percent: 20
//! skeleton_todo_percent: 50
//! min_characters: 2
//! bridge_min_percent: 50
//! concept_budget:
//!   exceptions: { 2: 5 }
//!   phases:
//!     - { through: 5, budget: 4 }
//!     - { through: 10, budget: 5 }
//!   default: 4
//! test_timeout_secs: 900
//! python: python3
//! maven: mvn
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::week::WeekId;

/// File name looked up at the repository root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "weekgate.yaml";

/// Tunable thresholds and commands for a gate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Release mode fails when more than this percentage of narrative lines are TODO.
    pub release_todo_max_percent: u32,
    /// Any mode fails when at least this percentage of narrative lines are TODO.
    pub skeleton_todo_percent: u32,
    /// Distinct recurring characters a release narrative must mention.
    pub min_characters: usize,
    /// Minimum percentage of review-bridge targets the narrative must mention.
    pub bridge_min_percent: u32,
    pub concept_budget: ConceptBudget,
    /// Test-suite timeout in seconds; `0` waits forever.
    pub test_timeout_secs: u64,
    /// Python interpreter used to launch pytest.
    pub python: String,
    /// Maven executable.
    pub maven: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            release_todo_max_percent: 20,
            skeleton_todo_percent: 50,
            min_characters: 2,
            bridge_min_percent: 50,
            concept_budget: ConceptBudget::default(),
            test_timeout_secs: 900,
            python: "python3".to_string(),
            maven: "mvn".to_string(),
        }
    }
}

impl GateConfig {
    /// Load a config file. An empty file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Resolve the config for a run: the explicit path if given, else
    /// `<repo_root>/weekgate.yaml` if it exists, else the defaults.
    pub fn discover(repo_root: &Path, explicit: Option<&Path>) -> Result<Self, CoreError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading explicit config");
            return Self::load(path);
        }
        let candidate = repo_root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading repository config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// The test-suite timeout, or `None` when disabled.
    pub fn test_timeout(&self) -> Option<Duration> {
        (self.test_timeout_secs > 0).then(|| Duration::from_secs(self.test_timeout_secs))
    }
}

/// One step of the concept budget: weeks up to and including `through`
/// may introduce at most `budget` concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPhase {
    pub through: u8,
    pub budget: usize,
}

/// Step function from week ordinal to the maximum number of newly
/// introduced concepts.
///
/// `exceptions` are authored per-week overrides and win over the phases.
/// Week 2 is a front-loaded foundational unit and is allowed five.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConceptBudget {
    pub exceptions: BTreeMap<u8, usize>,
    pub phases: Vec<BudgetPhase>,
    pub default: usize,
}

impl Default for ConceptBudget {
    fn default() -> Self {
        Self {
            exceptions: BTreeMap::from([(2, 5)]),
            phases: vec![
                BudgetPhase {
                    through: 5,
                    budget: 4,
                },
                BudgetPhase {
                    through: 10,
                    budget: 5,
                },
            ],
            default: 4,
        }
    }
}

impl ConceptBudget {
    /// Budget for `week`.
    pub fn budget_for(&self, week: WeekId) -> usize {
        let n = week.number();
        if let Some(budget) = self.exceptions.get(&n) {
            return *budget;
        }
        self.phases
            .iter()
            .filter(|p| n <= p.through)
            .min_by_key(|p| p.through)
            .map_or(self.default, |p| p.budget)
    }
}
