//! # Validation Results
//!
//! The accumulator every checker returns. A run is the concatenation of
//! checker results in execution order; the package passes iff no violation
//! was recorded.

use std::fmt;

use serde::Serialize;

/// Category of a recorded problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required file or directory is missing.
    Structural,
    /// A sidecar or registry failed to parse or has the wrong shape.
    MalformedData,
    /// The narrative or solution fails a content check.
    ContentQuality,
    /// A term, anchor, or concept reference does not resolve.
    CrossReference,
    /// The QA report has an unresolved blocking item.
    QaBlocker,
    /// The test suite failed or could not be started.
    TestFailure,
    /// The test suite exceeded its time limit.
    TestTimeout,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::MalformedData => "malformed_data",
            Self::ContentQuality => "content_quality",
            Self::CrossReference => "cross_reference",
            Self::QaBlocker => "qa_blocker",
            Self::TestFailure => "test_failure",
            Self::TestTimeout => "test_timeout",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single human-readable problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered list of violations produced by one or more checkers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    /// Create an empty (passing) result.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn add(&mut self, kind: ViolationKind, message: impl Into<String>) {
        self.violations.push(Violation {
            kind,
            message: message.into(),
        });
    }

    /// Append another result, preserving order.
    pub fn merge(&mut self, other: ValidationResult) {
        self.violations.extend(other.violations);
    }

    /// Whether no violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Messages in execution order.
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    /// Number of violations of one kind.
    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

impl From<Violation> for ValidationResult {
    fn from(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}
