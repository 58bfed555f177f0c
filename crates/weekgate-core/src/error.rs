//! # Error Types
//!
//! Errors raised before any checker runs: a malformed week identifier,
//! an unknown mode name, or an unreadable configuration file. These are
//! invocation errors; checker findings are never represented here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the foundational types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The user-supplied package identifier is not a valid week id.
    #[error("invalid week id {input:?}: {reason}")]
    InvalidWeekId {
        /// The raw identifier as supplied.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The mode name is not one of `drafting`, `idle`, `release`.
    #[error("invalid mode {0:?} (expected one of: drafting, idle, release)")]
    InvalidMode(String),

    /// The configuration file exists but could not be read.
    #[error("failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`crate::GateConfig`].
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
