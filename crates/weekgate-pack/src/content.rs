//! # Content-Quality Checks
//!
//! Shallow textual metrics over the narrative and the solution file. Every
//! check takes already-read text so the narrative is read once per run.

use weekgate_core::{GateConfig, LanguageProfile, ModePolicy};

use crate::package::{Package, NARRATIVE_FILE};
use crate::parser;
use crate::records::{non_empty, CharacterEntry};
use crate::registry::Registry;
use crate::validation::{ValidationResult, ViolationKind};

/// Accepted spellings of the Definition-of-Done marker.
pub const DOD_MARKERS: &[&str] = &["DoD", "Definition of Done", "本周 DoD"];

/// Substring marking a placeholder line.
pub const TODO_MARKER: &str = "TODO";

/// Both lines must be present for a solution to count as the untouched scaffold.
pub const SCAFFOLD_MARKERS: &[&str] = &["# Default: identity transform", "return text"];

// ---------------------------------------------------------------------------
// Definition of Done
// ---------------------------------------------------------------------------

pub fn check_dod(narrative: &str) -> ValidationResult {
    let mut result = ValidationResult::ok();
    if DOD_MARKERS.iter().any(|m| narrative.contains(m)) {
        tracing::info!("OK: DoD marker present");
    } else {
        result.add(
            ViolationKind::ContentQuality,
            format!("{NARRATIVE_FILE} missing DoD section/mention: {NARRATIVE_FILE}"),
        );
    }
    result
}

// ---------------------------------------------------------------------------
// TODO ratio
// ---------------------------------------------------------------------------

/// Line counts behind the TODO ratio. Blank lines are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoStats {
    pub lines: usize,
    pub todo_lines: usize,
}

impl TodoStats {
    pub fn measure(text: &str) -> Self {
        let mut stats = Self {
            lines: 0,
            todo_lines: 0,
        };
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            stats.lines += 1;
            if line.contains(TODO_MARKER) {
                stats.todo_lines += 1;
            }
        }
        stats
    }

    /// Whether the ratio is strictly above `percent`.
    pub fn exceeds(&self, percent: u32) -> bool {
        self.todo_lines * 100 > percent as usize * self.lines
    }

    /// Whether the ratio is at or above `percent`.
    pub fn reaches(&self, percent: u32) -> bool {
        self.todo_lines * 100 >= percent as usize * self.lines
    }

    /// Rounded percentage for messages.
    pub fn percent(&self) -> usize {
        if self.lines == 0 {
            return 0;
        }
        (self.todo_lines * 100 + self.lines / 2) / self.lines
    }
}

/// At most one error: empty narrative, release limit, or skeleton limit.
pub fn check_todo_ratio(narrative: &str, policy: &ModePolicy, config: &GateConfig) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let stats = TodoStats::measure(narrative);
    if stats.lines == 0 {
        result.add(
            ViolationKind::ContentQuality,
            format!("{NARRATIVE_FILE} is empty"),
        );
        return result;
    }

    tracing::info!(
        lines = stats.lines,
        todo_lines = stats.todo_lines,
        "{NARRATIVE_FILE}: {}% TODO lines",
        stats.percent()
    );

    if policy.enforce_release_todo_limit && stats.exceeds(config.release_todo_max_percent) {
        result.add(
            ViolationKind::ContentQuality,
            format!(
                "{NARRATIVE_FILE} still has {}% TODO lines (release requires <={}%)",
                stats.percent(),
                config.release_todo_max_percent
            ),
        );
    } else if stats.reaches(config.skeleton_todo_percent) {
        result.add(
            ViolationKind::ContentQuality,
            format!(
                "{NARRATIVE_FILE} has {}% TODO lines (>={}%, still a skeleton)",
                stats.percent(),
                config.skeleton_todo_percent
            ),
        );
    }
    result
}

// ---------------------------------------------------------------------------
// Solution customization
// ---------------------------------------------------------------------------

/// Fail when the canonical solution file is still the untouched scaffold.
/// Languages without a single solution file, and missing files, pass.
pub fn check_solution_customized(pkg: &Package) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let Some(rel) = pkg.profile().solution_file else {
        tracing::info!(language = pkg.language.as_str(), "no single solution file; skipping");
        return result;
    };
    let text = match parser::read_text(&pkg.path(rel)) {
        Ok(text) => text,
        Err(e) if e.is_not_found() => return result,
        Err(e) => {
            result.add(
                ViolationKind::MalformedData,
                e.relative_to(&pkg.root).to_string(),
            );
            return result;
        }
    };

    if SCAFFOLD_MARKERS.iter().all(|m| text.contains(m)) {
        result.add(
            ViolationKind::ContentQuality,
            format!("{rel} is still the default template (not customised for this week)"),
        );
    } else {
        tracing::info!("OK: {rel} customised");
    }
    result
}

// ---------------------------------------------------------------------------
// Progress narrative and recurring characters
// ---------------------------------------------------------------------------

/// The narrative must mention the language's running example project.
pub fn check_progress_narrative(narrative: &str, profile: &LanguageProfile) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let name = profile.project_name;
    if narrative.contains(name) || narrative.contains(&name.to_lowercase()) {
        tracing::info!("OK: {name} mention found in {NARRATIVE_FILE}");
    } else {
        result.add(
            ViolationKind::ContentQuality,
            format!("{NARRATIVE_FILE} missing {name} progress section"),
        );
    }
    result
}

/// Registered character names that appear verbatim in the narrative, in
/// registry order, without duplicates.
pub fn characters_found<'a>(narrative: &str, characters: &'a [CharacterEntry]) -> Vec<&'a str> {
    let mut found: Vec<&str> = Vec::new();
    for name in characters.iter().filter_map(|c| non_empty(&c.name)) {
        if narrative.contains(name) && !found.contains(&name) {
            found.push(name);
        }
    }
    found
}

pub fn check_characters(
    narrative: &str,
    characters: &Registry<CharacterEntry>,
    min_characters: usize,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let Some(entries) = characters.entries() else {
        tracing::info!("character registry unavailable; skipping character check");
        return result;
    };

    let found = characters_found(narrative, entries);
    if found.len() < min_characters {
        let listed = if found.is_empty() {
            "none".to_string()
        } else {
            found.join(", ")
        };
        result.add(
            ViolationKind::ContentQuality,
            format!(
                "{NARRATIVE_FILE} uses only {} recurring character(s) (found: {listed}; need at least {min_characters} from shared/characters.yml)",
                found.len()
            ),
        );
    } else {
        tracing::info!(found = ?found, "OK: recurring characters");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekgate_core::{Language, ValidationMode, WeekId};

    fn lines(total: usize, todo: usize) -> String {
        let mut text = String::new();
        for i in 0..total {
            if i < todo {
                text.push_str("- TODO: write this\n");
            } else {
                text.push_str("real prose\n\n");
            }
        }
        text
    }

    fn release() -> &'static ModePolicy {
        ValidationMode::Release.policy()
    }

    fn drafting() -> &'static ModePolicy {
        ValidationMode::Drafting.policy()
    }

    #[test]
    fn test_dod_markers() {
        assert!(check_dod("## 本周 DoD\n").is_valid());
        assert!(check_dod("See the Definition of Done.").is_valid());
        let result = check_dod("# Week 3\nNothing here\n");
        assert_eq!(
            result.messages(),
            vec!["CHAPTER.md missing DoD section/mention: CHAPTER.md"]
        );
    }

    #[test]
    fn test_todo_stats_ignore_blank_lines() {
        let stats = TodoStats::measure("TODO\n\n   \ntext\n");
        assert_eq!(stats, TodoStats { lines: 2, todo_lines: 1 });
        assert_eq!(stats.percent(), 50);
    }

    #[test]
    fn test_release_boundary_twenty_percent() {
        let config = GateConfig::default();
        assert!(check_todo_ratio(&lines(100, 20), release(), &config).is_valid());
        let result = check_todo_ratio(&lines(100, 21), release(), &config);
        assert_eq!(
            result.messages(),
            vec!["CHAPTER.md still has 21% TODO lines (release requires <=20%)"]
        );
    }

    #[test]
    fn test_skeleton_boundary_fifty_percent() {
        let config = GateConfig::default();
        assert!(check_todo_ratio(&lines(100, 49), drafting(), &config).is_valid());
        let result = check_todo_ratio(&lines(100, 50), drafting(), &config);
        assert_eq!(
            result.messages(),
            vec!["CHAPTER.md has 50% TODO lines (>=50%, still a skeleton)"]
        );
    }

    #[test]
    fn test_release_message_takes_precedence() {
        let config = GateConfig::default();
        let result = check_todo_ratio(&lines(10, 8), release(), &config);
        assert_eq!(result.len(), 1);
        assert!(result.messages()[0].contains("release requires"));
    }

    #[test]
    fn test_empty_narrative() {
        let config = GateConfig::default();
        let result = check_todo_ratio("\n  \n", drafting(), &config);
        assert_eq!(result.messages(), vec!["CHAPTER.md is empty"]);
    }

    #[test]
    fn test_progress_narrative_accepts_lowercase() {
        let profile = Language::Python.profile();
        assert!(check_progress_narrative("updating pyhelper today", profile).is_valid());
        let result = check_progress_narrative("nothing", Language::Java.profile());
        assert_eq!(
            result.messages(),
            vec!["CHAPTER.md missing CampusFlow progress section"]
        );
    }

    #[test]
    fn test_characters_counted_once() {
        let registry = Registry::Loaded(vec![
            CharacterEntry {
                name: Some("小北".to_string()),
            },
            CharacterEntry {
                name: Some("阿码".to_string()),
            },
            CharacterEntry {
                name: Some("小北".to_string()),
            },
        ]);
        let result = check_characters("小北 和 小北", &registry, 2);
        assert_eq!(
            result.messages(),
            vec!["CHAPTER.md uses only 1 recurring character(s) (found: 小北; need at least 2 from shared/characters.yml)"]
        );
        assert!(check_characters("小北 问 阿码", &registry, 2).is_valid());
    }

    #[test]
    fn test_absent_character_registry_skips() {
        assert!(check_characters("", &Registry::Absent, 2).is_valid());
    }

    #[test]
    fn test_scaffold_solution_detected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("chapters/week_05/starter_code");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("solution.py"),
            "def solve(text):\n    # Default: identity transform\n    return text\n",
        )
        .unwrap();
        let pkg = Package::locate(tmp.path(), WeekId::parse("5").unwrap()).unwrap();
        assert_eq!(
            check_solution_customized(&pkg).messages(),
            vec!["starter_code/solution.py is still the default template (not customised for this week)"]
        );

        std::fs::write(dir.join("solution.py"), "def solve(text):\n    return text.upper()\n").unwrap();
        assert!(check_solution_customized(&pkg).is_valid());
    }
}
