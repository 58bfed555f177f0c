//! # Gate Orchestrator
//!
//! Runs every checker enabled by the mode's [`ModePolicy`] in a fixed
//! order and concatenates their results. Shared registries and the
//! narrative are read once and passed to each checker that needs them.
//!
//! Order: structure, DoD, TODO ratio, examples, solution, progress
//! narrative, characters, concept budget, review bridges, terms, anchors,
//! QA blockers, tests.

use weekgate_core::{GateConfig, Language, Presence, SidecarKind, ValidationMode, WeekId};

use crate::package::{Package, NARRATIVE_FILE};
use crate::records::{CharacterEntry, ConceptEntry, GlossaryEntry};
use crate::registry;
use crate::runner::{self, TestRunner};
use crate::validation::{ValidationResult, ViolationKind};
use crate::{anchors, concepts, content, parser, qa, requirements, structure, terms};

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct GateReport {
    pub week: WeekId,
    pub mode: ValidationMode,
    pub language: Language,
    pub result: ValidationResult,
}

impl GateReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_valid()
    }

    /// Process exit code: 0 on pass, 2 on any violation.
    pub fn exit_code(&self) -> u8 {
        if self.is_ok() {
            0
        } else {
            2
        }
    }
}

/// Read the narrative, reporting anything other than absence.
fn read_narrative(pkg: &Package, result: &mut ValidationResult) -> Option<String> {
    match parser::read_text(&pkg.path(NARRATIVE_FILE)) {
        Ok(text) => Some(text),
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            result.add(
                ViolationKind::MalformedData,
                e.relative_to(&pkg.root).to_string(),
            );
            None
        }
    }
}

/// Run the gate for `pkg` under `mode`.
pub fn run_gate(
    pkg: &Package,
    mode: ValidationMode,
    config: &GateConfig,
    runner: &dyn TestRunner,
) -> GateReport {
    let policy = mode.policy();
    let profile = pkg.profile();
    let mut result = ValidationResult::ok();
    tracing::info!(week = %pkg.id, %mode, language = pkg.language.as_str(), "running gate");

    let req = requirements::resolve(mode, profile);
    result.merge(structure::check_required_paths(pkg, &req));
    if req.requires_tests {
        result.merge(structure::check_test_files(pkg));
    }

    let narrative = read_narrative(pkg, &mut result);
    if let Some(text) = &narrative {
        result.merge(content::check_dod(text));
        result.merge(content::check_todo_ratio(text, policy, config));
    }

    if req.requires_examples {
        result.merge(structure::check_examples(pkg));
    }
    if policy.check_solution_customized {
        result.merge(content::check_solution_customized(pkg));
    }

    if let Some(text) = &narrative {
        if policy.check_progress_narrative {
            result.merge(content::check_progress_narrative(text, profile));
        }
        if policy.check_characters {
            let (characters, loaded) =
                registry::load::<CharacterEntry>(pkg, SidecarKind::Characters, mode);
            result.merge(loaded);
            result.merge(content::check_characters(
                text,
                &characters,
                config.min_characters,
            ));
        }
    }

    if policy.check_concept_budget || policy.check_review_bridges {
        let (concept_map, loaded) =
            registry::load::<ConceptEntry>(pkg, SidecarKind::ConceptMap, mode);
        result.merge(loaded);
        if policy.check_concept_budget {
            result.merge(concepts::check_concept_budget(
                pkg.id,
                &concept_map,
                &config.concept_budget,
            ));
        }
        if policy.check_review_bridges {
            if let Some(text) = &narrative {
                result.merge(concepts::check_review_bridges(
                    pkg.id,
                    text,
                    &concept_map,
                    config.bridge_min_percent,
                ));
            }
        }
    }

    if pkg.path(SidecarKind::Terms.relative_path()).is_file() {
        let (glossary, loaded) = registry::load::<GlossaryEntry>(pkg, SidecarKind::Glossary, mode);
        result.merge(loaded);
        result.merge(terms::check_terms(pkg, &glossary));
    } else if SidecarKind::Terms.presence(mode) == Presence::Optional {
        tracing::info!("TERMS.yml not present; skipping term checks");
    } else {
        tracing::debug!("TERMS.yml absence already reported");
    }

    if SidecarKind::Anchors.presence(mode) != Presence::Skipped {
        result.merge(anchors::check_anchors(pkg));
    }
    if policy.check_qa_blockers {
        result.merge(qa::check_qa_blockers(pkg));
    }
    if policy.run_tests {
        result.merge(runner::dispatch_tests(pkg, config, runner));
    }

    tracing::info!(problems = result.len(), "gate finished");
    GateReport {
        week: pkg.id,
        mode,
        language: pkg.language,
        result,
    }
}
