//! # Concept Accounting
//!
//! Two checks over `shared/concept_map.yml`: how many concepts a week
//! introduces (against the pacing budget), and whether the narrative
//! revisits the earlier concepts the map schedules for this week.

use weekgate_core::{ConceptBudget, WeekId};

use crate::package::NARRATIVE_FILE;
use crate::records::ConceptEntry;
use crate::registry::Registry;
use crate::validation::{ValidationResult, ViolationKind};

/// Names of concepts the map introduces in `week`, in map order.
pub fn introduced_in<'a>(week: &str, concepts: &'a [ConceptEntry]) -> Vec<&'a str> {
    concepts
        .iter()
        .filter(|c| c.is_introduced_in(week))
        .map(ConceptEntry::display_name)
        .collect()
}

/// Concepts introduced earlier and scheduled to be revisited in `week`.
pub fn bridge_targets<'a>(week: &str, concepts: &'a [ConceptEntry]) -> Vec<&'a str> {
    concepts
        .iter()
        .filter(|c| !c.is_introduced_in(week) && c.is_revisited_in(week))
        .map(ConceptEntry::display_name)
        .collect()
}

pub fn check_concept_budget(
    week: WeekId,
    concepts: &Registry<ConceptEntry>,
    budget: &ConceptBudget,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let Some(entries) = concepts.entries() else {
        tracing::info!("concept map unavailable; skipping concept budget check");
        return result;
    };

    let name = week.as_dir_name();
    let allowed = budget.budget_for(week);
    let introduced = introduced_in(&name, entries);
    if introduced.len() > allowed {
        result.add(
            ViolationKind::CrossReference,
            format!(
                "concept budget exceeded: {} concepts introduced in {name} (budget: {allowed}). Concepts: [{}]",
                introduced.len(),
                introduced.join(", ")
            ),
        );
    } else {
        tracing::info!("OK: concept budget {}/{allowed} for {name}", introduced.len());
    }
    result
}

pub fn check_review_bridges(
    week: WeekId,
    narrative: &str,
    concepts: &Registry<ConceptEntry>,
    min_percent: u32,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    if week.number() <= 1 {
        tracing::info!("first week has nothing to review; skipping review bridges");
        return result;
    }
    let Some(entries) = concepts.entries() else {
        tracing::info!("concept map unavailable; skipping review bridge check");
        return result;
    };

    let name = week.as_dir_name();
    let targets = bridge_targets(&name, entries);
    if targets.is_empty() {
        tracing::info!("no review bridge targets scheduled for {name}");
        return result;
    }

    let (found, missing): (Vec<&str>, Vec<&str>) =
        targets.iter().partition(|t| narrative.contains(**t));
    if found.len() * 100 < min_percent as usize * targets.len() {
        result.add(
            ViolationKind::CrossReference,
            format!(
                "review bridges insufficient: only {}/{} bridge targets found in {NARRATIVE_FILE} (need >={min_percent}%). Missing: [{}]",
                found.len(),
                targets.len(),
                missing.join(", ")
            ),
        );
    } else {
        tracing::info!("OK: review bridges {}/{} mentioned", found.len(), targets.len());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(name: &str, introduced: &str, revisited: &[&str]) -> ConceptEntry {
        ConceptEntry {
            concept: Some(name.to_string()),
            introduced: Some(introduced.to_string()),
            revisited: revisited.iter().map(|w| w.to_string()).collect(),
        }
    }

    fn week(n: u32) -> WeekId {
        WeekId::new(n).unwrap()
    }

    fn map_with_introductions(week_name: &str, count: usize) -> Registry<ConceptEntry> {
        Registry::Loaded(
            (0..count)
                .map(|i| concept(&format!("c{i}"), week_name, &[]))
                .collect(),
        )
    }

    #[test]
    fn test_budget_exactly_at_limit_passes() {
        let budget = ConceptBudget::default();
        assert!(check_concept_budget(week(4), &map_with_introductions("week_04", 4), &budget).is_valid());
        assert!(check_concept_budget(week(2), &map_with_introductions("week_02", 5), &budget).is_valid());
        assert!(check_concept_budget(week(8), &map_with_introductions("week_08", 5), &budget).is_valid());
    }

    #[test]
    fn test_budget_plus_one_fails() {
        let budget = ConceptBudget::default();
        let result = check_concept_budget(week(4), &map_with_introductions("week_04", 5), &budget);
        assert_eq!(
            result.messages(),
            vec!["concept budget exceeded: 5 concepts introduced in week_04 (budget: 4). Concepts: [c0, c1, c2, c3, c4]"]
        );
        assert!(!check_concept_budget(week(12), &map_with_introductions("week_12", 5), &budget).is_valid());
    }

    #[test]
    fn test_budget_skipped_without_map() {
        let budget = ConceptBudget::default();
        assert!(check_concept_budget(week(4), &Registry::Absent, &budget).is_valid());
    }

    #[test]
    fn test_bridge_targets_exclude_same_week() {
        let concepts = vec![
            concept("变量", "week_01", &["week_03"]),
            concept("函数", "week_03", &["week_03"]),
            concept("列表", "week_02", &["week_04"]),
        ];
        assert_eq!(bridge_targets("week_03", &concepts), vec!["变量"]);
    }

    #[test]
    fn test_bridges_half_found_passes() {
        let map = Registry::Loaded(vec![
            concept("变量", "week_01", &["week_03"]),
            concept("列表", "week_02", &["week_03"]),
        ]);
        assert!(check_review_bridges(week(3), "回顾一下变量", &map, 50).is_valid());
    }

    #[test]
    fn test_bridges_below_threshold_lists_all_missing() {
        let map = Registry::Loaded(vec![
            concept("变量", "week_01", &["week_05"]),
            concept("列表", "week_02", &["week_05"]),
            concept("字典", "week_03", &["week_05"]),
        ]);
        let result = check_review_bridges(week(5), "只提到了变量", &map, 50);
        assert_eq!(
            result.messages(),
            vec!["review bridges insufficient: only 1/3 bridge targets found in CHAPTER.md (need >=50%). Missing: [列表, 字典]"]
        );
    }

    #[test]
    fn test_first_week_skips_bridges() {
        let map = Registry::Loaded(vec![concept("x", "week_00", &["week_01"])]);
        assert!(check_review_bridges(week(1), "", &map, 50).is_valid());
    }

    #[test]
    fn test_no_targets_passes() {
        let map = Registry::Loaded(vec![concept("x", "week_02", &[])]);
        assert!(check_review_bridges(week(6), "", &map, 50).is_valid());
    }
}
