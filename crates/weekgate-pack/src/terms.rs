//! # Term / Glossary Synchronization
//!
//! Every term a package introduces must be complete, must claim this week
//! as its first appearance, and must also exist in the shared glossary.

use std::collections::BTreeSet;

use weekgate_core::SidecarKind;

use crate::package::Package;
use crate::parser::{self, Item};
use crate::records::{non_empty, GlossaryEntry, TermEntry};
use crate::registry::Registry;
use crate::validation::{ValidationResult, ViolationKind};

/// Load the package's `TERMS.yml` and check it against the glossary.
///
/// An absent `TERMS.yml` is skipped here: in modes that require it the
/// structural check has already reported it.
pub fn check_terms(pkg: &Package, glossary: &Registry<GlossaryEntry>) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let rel = SidecarKind::Terms.relative_path();
    let path = pkg.path(rel);
    let items = match parser::load_items::<TermEntry>(&path) {
        Ok(items) => items,
        Err(e) if e.is_not_found() => {
            tracing::info!("{rel} not present; skipping term checks");
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

    result.merge(check_term_items(&pkg.name(), items, glossary));
    result
}

/// Glossary terms, trimmed.
pub fn glossary_terms(entries: &[GlossaryEntry]) -> BTreeSet<&str> {
    entries.iter().filter_map(|e| non_empty(&e.term)).collect()
}

/// Validate decoded term items for the week named `week`.
pub fn check_term_items(
    week: &str,
    items: Vec<Item<TermEntry>>,
    glossary: &Registry<GlossaryEntry>,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let rel = SidecarKind::Terms.relative_path();
    let known = glossary.entries().map(glossary_terms);
    let total = items.len();

    for item in items {
        let (index, entry) = match item {
            Ok(pair) => pair,
            Err(e) => {
                result.add(ViolationKind::MalformedData, e.describe(rel));
                continue;
            }
        };

        let Some(term) = non_empty(&entry.term) else {
            result.add(
                ViolationKind::MalformedData,
                format!("{rel} item #{index} missing non-empty 'term_zh'"),
            );
            continue;
        };

        if non_empty(&entry.definition).is_none() {
            result.add(
                ViolationKind::MalformedData,
                format!("{rel} item #{index} ({term}) missing non-empty 'definition_zh'"),
            );
        }

        let first_seen = non_empty(&entry.first_seen);
        if first_seen != Some(week) {
            result.add(
                ViolationKind::CrossReference,
                format!(
                    "{rel} item #{index} ({term}) first_seen must be '{week}' (got {})",
                    first_seen.map_or_else(|| "none".to_string(), |w| format!("'{w}'"))
                ),
            );
        }

        if let Some(known) = &known {
            if !known.contains(term) {
                result.add(
                    ViolationKind::CrossReference,
                    format!(
                        "term missing from {}: '{term}'",
                        SidecarKind::Glossary.relative_path()
                    ),
                );
            }
        }
    }

    if result.is_valid() {
        tracing::info!(terms = total, "OK: {rel} in sync with glossary");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decode_items;

    fn items(yaml: &str) -> Vec<Item<TermEntry>> {
        let values: Vec<serde_yaml::Value> = serde_yaml::from_str(yaml).unwrap();
        decode_items(values)
    }

    fn glossary(terms: &[&str]) -> Registry<GlossaryEntry> {
        Registry::Loaded(
            terms
                .iter()
                .map(|t| GlossaryEntry {
                    term: Some(t.to_string()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_synced_terms_pass() {
        let result = check_term_items(
            "week_03",
            items("- term_zh: 函数\n  definition_zh: 可复用的代码块\n  first_seen: week_03\n"),
            &glossary(&["函数"]),
        );
        assert!(result.is_valid(), "{:?}", result.messages());
    }

    #[test]
    fn test_term_missing_from_glossary_is_one_error() {
        let result = check_term_items(
            "week_03",
            items("- term_zh: 函数\n  definition_zh: 可复用的代码块\n  first_seen: week_03\n"),
            &glossary(&["变量"]),
        );
        assert_eq!(
            result.messages(),
            vec!["term missing from shared/glossary.yml: '函数'"]
        );
    }

    #[test]
    fn test_field_errors() {
        let result = check_term_items(
            "week_03",
            items(
                "- definition_zh: orphan\n\
                 - term_zh: 列表\n  first_seen: week_02\n\
                 - 42\n",
            ),
            &glossary(&["列表"]),
        );
        assert_eq!(
            result.messages(),
            vec![
                "TERMS.yml item #1 missing non-empty 'term_zh'",
                "TERMS.yml item #2 (列表) missing non-empty 'definition_zh'",
                "TERMS.yml item #2 (列表) first_seen must be 'week_03' (got 'week_02')",
                "TERMS.yml item #3 must be a mapping",
            ]
        );
    }

    #[test]
    fn test_missing_first_seen() {
        let result = check_term_items(
            "week_03",
            items("- term: loop\n  definition: repeat\n"),
            &Registry::Absent,
        );
        assert_eq!(
            result.messages(),
            vec!["TERMS.yml item #1 (loop) first_seen must be 'week_03' (got none)"]
        );
    }

    #[test]
    fn test_unusable_glossary_skips_membership() {
        let result = check_term_items(
            "week_03",
            items("- term_zh: 函数\n  definition_zh: d\n  first_seen: week_03\n"),
            &Registry::Unusable,
        );
        assert!(result.is_valid());
    }

    #[test]
    fn test_absent_terms_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("chapters/week_03")).unwrap();
        let pkg = Package::locate(tmp.path(), weekgate_core::WeekId::parse("3").unwrap()).unwrap();
        assert!(check_terms(&pkg, &glossary(&[])).is_valid());

        std::fs::write(pkg.path("TERMS.yml"), "term_zh: x\n").unwrap();
        assert_eq!(
            check_terms(&pkg, &glossary(&[])).messages(),
            vec!["TERMS.yml must be a list: chapters/week_03/TERMS.yml"]
        );
    }
}
