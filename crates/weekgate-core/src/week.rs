//! # Week Identifier
//!
//! Newtype wrapper for a package identifier. The canonical form is
//! `week_NN` with a two-digit, zero-padded ordinal. Users may type the
//! bare ordinal (`7`), the padded ordinal (`07`) or the canonical id
//! (`week_07`); everything else is rejected rather than coerced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const PREFIX: &str = "week_";

/// Canonical identifier of one weekly chapter package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId(u8);

impl WeekId {
    /// Lowest valid ordinal.
    pub const MIN: u8 = 1;
    /// Highest valid ordinal; the canonical form has two digits.
    pub const MAX: u8 = 99;

    /// Build a week id from its ordinal.
    pub fn new(number: u32) -> Result<Self, CoreError> {
        if number < u32::from(Self::MIN) || number > u32::from(Self::MAX) {
            return Err(CoreError::InvalidWeekId {
                input: number.to_string(),
                reason: format!("ordinal must be between {} and {}", Self::MIN, Self::MAX),
            });
        }
        // Range checked above.
        Ok(Self(number as u8))
    }

    /// Normalize a user-supplied identifier.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidWeekId {
            input: raw.to_string(),
            reason: reason.to_string(),
        };

        let digits = raw.strip_prefix(PREFIX).unwrap_or(raw);
        if digits.is_empty() {
            return Err(invalid("expected 'week_NN' or a week number"));
        }
        if digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected 'week_NN' or a one/two digit week number"));
        }
        let number: u32 = digits
            .parse()
            .map_err(|_| invalid("week number is not a valid integer"))?;
        Self::new(number).map_err(|_| {
            invalid(&format!(
                "week number must be between {} and {}",
                Self::MIN,
                Self::MAX
            ))
        })
    }

    /// The ordinal (1-based).
    pub fn number(self) -> u8 {
        self.0
    }

    /// Canonical directory name, e.g. `week_07`.
    pub fn as_dir_name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{:02}", self.0)
    }
}

impl FromStr for WeekId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WeekId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WeekId> for String {
    fn from(value: WeekId) -> Self {
        value.to_string()
    }
}
