//! Shared registries under `shared/`.
//!
//! Each registry is loaded at most once per run by the orchestrator and
//! handed to every checker that needs it. Load problems are reported once,
//! at load time; checkers only see whether usable entries exist.

use serde::de::DeserializeOwned;
use weekgate_core::{Presence, SidecarKind, ValidationMode};

use crate::package::Package;
use crate::parser;
use crate::validation::{ValidationResult, ViolationKind};

/// Outcome of loading one shared registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registry<T> {
    /// Not present, or not consulted in this mode.
    Absent,
    /// Present but unreadable as a list; already reported.
    Unusable,
    /// Decoded entries. Items that failed to decode are left out.
    Loaded(Vec<T>),
}

impl<T> Registry<T> {
    pub fn entries(&self) -> Option<&[T]> {
        match self {
            Self::Loaded(entries) => Some(entries),
            Self::Absent | Self::Unusable => None,
        }
    }
}

/// Load the shared registry `kind`, applying its absence policy for `mode`.
pub fn load<T: DeserializeOwned>(
    pkg: &Package,
    kind: SidecarKind,
    mode: ValidationMode,
) -> (Registry<T>, ValidationResult) {
    let mut result = ValidationResult::ok();
    let rel = kind.relative_path();
    let presence = kind.presence(mode);
    if presence == Presence::Skipped {
        return (Registry::Absent, result);
    }

    let path = pkg.root_path(rel);
    let items = match parser::load_items::<T>(&path) {
        Ok(items) => items,
        Err(e) if e.is_not_found() => {
            if presence == Presence::Required {
                result.add(
                    ViolationKind::Structural,
                    format!("missing shared registry: {rel}"),
                );
            } else {
                tracing::info!("{rel} not found; skipping dependent checks");
            }
            return (Registry::Absent, result);
        }
        Err(e) => {
            result.add(
                ViolationKind::MalformedData,
                e.relative_to(&pkg.root).to_string(),
            );
            return (Registry::Unusable, result);
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Ok((_, entry)) => entries.push(entry),
            Err(e) => result.add(ViolationKind::MalformedData, e.describe(rel)),
        }
    }
    tracing::debug!(registry = rel, entries = entries.len(), "loaded shared registry");
    (Registry::Loaded(entries), result)
}
