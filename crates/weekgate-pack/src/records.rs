//! Typed sidecar records.
//!
//! Field names follow the on-disk YAML keys; short English aliases are
//! accepted for authors who do not use the localized key names. Every
//! field is optional at the serde layer so presence and emptiness are
//! judged by the checkers, which produce one message per problem.

use serde::{Deserialize, Serialize};

/// Trimmed, non-empty view of an optional string field.
pub fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// One entry of a package's `TERMS.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    #[serde(rename = "term_zh", alias = "term", default)]
    pub term: Option<String>,
    #[serde(rename = "definition_zh", alias = "definition", default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub first_seen: Option<String>,
}

/// One entry of `shared/glossary.yml`. Only the term takes part in
/// checks; other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    #[serde(rename = "term_zh", alias = "term", default)]
    pub term: Option<String>,
}

/// One entry of a package's `ANCHORS.yml`: a verifiable claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub claim: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub verification: Option<String>,
}

/// One entry of `shared/concept_map.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptEntry {
    #[serde(rename = "concept_zh", alias = "concept", default)]
    pub concept: Option<String>,
    #[serde(alias = "introduced_in", default)]
    pub introduced: Option<String>,
    #[serde(alias = "revisited_in", default)]
    pub revisited: Vec<String>,
}

impl ConceptEntry {
    /// Concept name for messages; `?` when the entry has none.
    pub fn display_name(&self) -> &str {
        non_empty(&self.concept).unwrap_or("?")
    }

    pub fn is_introduced_in(&self, week: &str) -> bool {
        self.introduced.as_deref().map(str::trim) == Some(week)
    }

    pub fn is_revisited_in(&self, week: &str) -> bool {
        self.revisited.iter().any(|w| w.trim() == week)
    }
}

/// One entry of `shared/characters.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_entry_localized_keys() {
        let entry: TermEntry = serde_yaml::from_str(
            "term_zh: 变量\ndefinition_zh: 存放值的名字\nfirst_seen: week_01\n",
        )
        .unwrap();
        assert_eq!(entry.term.as_deref(), Some("变量"));
        assert_eq!(entry.first_seen.as_deref(), Some("week_01"));
    }

    #[test]
    fn test_term_entry_english_aliases() {
        let entry: TermEntry =
            serde_yaml::from_str("term: variable\ndefinition: a name for a value\n").unwrap();
        assert_eq!(entry.term.as_deref(), Some("variable"));
        assert_eq!(entry.definition.as_deref(), Some("a name for a value"));
        assert!(entry.first_seen.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let entry: AnchorEntry =
            serde_yaml::from_str("id: A1\nclaim: c\nnotes: extra\n").unwrap();
        assert_eq!(entry.id.as_deref(), Some("A1"));
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty(&Some("  x ".to_string())), Some("x"));
        assert_eq!(non_empty(&Some("   ".to_string())), None);
        assert_eq!(non_empty(&None), None);
    }

    #[test]
    fn test_concept_entry_weeks() {
        let entry: ConceptEntry = serde_yaml::from_str(
            "concept_zh: 循环\nintroduced: week_02\nrevisited: [week_04, week_06]\n",
        )
        .unwrap();
        assert!(entry.is_introduced_in("week_02"));
        assert!(entry.is_revisited_in("week_04"));
        assert!(!entry.is_revisited_in("week_05"));
        assert_eq!(entry.display_name(), "循环");
    }

    #[test]
    fn test_concept_entry_without_name() {
        let entry: ConceptEntry = serde_yaml::from_str("introduced: week_02\n").unwrap();
        assert_eq!(entry.display_name(), "?");
        assert!(entry.revisited.is_empty());
    }
}
