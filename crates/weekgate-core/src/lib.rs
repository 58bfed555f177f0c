//! # weekgate-core: Foundational Types for the Release Gate
//!
//! This crate defines the vocabulary shared by the gate engine and the CLI.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated identifiers.** A [`WeekId`] can only be built through
//!    [`WeekId::parse`] or [`WeekId::new`], so every downstream path
//!    computation works on a canonical `week_NN` name.
//!
//! 2. **Mode behavior is a table.** [`ValidationMode::policy`] returns a
//!    [`ModePolicy`] describing which checks run and which thresholds apply.
//!    Checkers consult the policy instead of comparing modes.
//!
//! 3. **Language conventions are data.** A [`LanguageProfile`] captures
//!    extension, directory layout, test-file rule and test runner for one
//!    ecosystem. Adding an ecosystem means adding a profile.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `weekgate-*` crates (this is the leaf of the DAG).
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod language;
pub mod mode;
pub mod scan;
pub mod week;

pub use config::{BudgetPhase, ConceptBudget, GateConfig, CONFIG_FILE_NAME};
pub use error::CoreError;
pub use language::{detect_language, Language, LanguageProfile, RunnerKind, TestFileRule};
pub use mode::{ModePolicy, Presence, SidecarKind, ValidationMode};
pub use week::WeekId;
