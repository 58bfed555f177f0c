//! # weekgate-pack: Release Gate Engine
//!
//! Decides whether a weekly chapter package may move to the next pipeline
//! stage. A run is a fixed sequence of independent checkers, each
//! returning a [`ValidationResult`]; the orchestrator concatenates them in
//! execution order.
//!
//! ## Validation Layers
//!
//! 1. **Structure** (`requirements.rs`, `structure.rs`): required files and
//!    directories for the mode, at least one test file and one example.
//! 2. **Content quality** (`content.rs`): DoD marker, TODO ratio, scaffold
//!    solution, running-example mention, recurring characters.
//! 3. **Cross references** (`terms.rs`, `anchors.rs`, `concepts.rs`):
//!    term/glossary sync, anchor evidence resolution, concept budget,
//!    review bridges.
//! 4. **QA blockers** (`qa.rs`): unchecked items in the blocking section.
//! 5. **Tests** (`runner.rs`): the package's own suite, release mode only.
//!
//! ## Crate Policy
//!
//! - Checkers never return `Err` for an expected failure; they record a
//!   [`Violation`] and let later checkers run.
//! - The engine reads package content and never writes it.

pub mod anchors;
pub mod concepts;
pub mod content;
pub mod error;
pub mod gate;
pub mod package;
pub mod parser;
pub mod qa;
pub mod records;
pub mod registry;
pub mod requirements;
pub mod runner;
pub mod structure;
pub mod terms;
pub mod validation;

pub use error::{PackError, PackResult};
pub use gate::{run_gate, GateReport};
pub use package::Package;
pub use runner::{ProcessRunner, RunnerError, TestInvocation, TestOutcome, TestRunner};
pub use validation::{ValidationResult, Violation, ViolationKind};
