//! Pack-specific error types.
//!
//! Structured errors for locating packages and loading sidecar files.
//! "File does not exist" and "file exists but is malformed" are distinct
//! variants so callers can apply each sidecar's absence policy.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while locating a package or loading its data.
#[derive(Debug, Error)]
pub enum PackError {
    /// The package directory does not exist.
    #[error("missing week dir: {path}/ (create the package first)")]
    PackageNotFound { path: PathBuf },

    /// A sidecar or document was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The sidecar parsed but its top level is not a list.
    #[error("{name} must be a list: {path}")]
    NotAList { name: String, path: PathBuf },

    /// I/O error other than not-found.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PackError {
    /// Rewrite the path carried by the error relative to `root`, for
    /// user-facing messages.
    pub fn relative_to(self, root: &Path) -> Self {
        let rel = |p: PathBuf| p.strip_prefix(root).map(Path::to_path_buf).unwrap_or(p);
        match self {
            Self::PackageNotFound { path } => Self::PackageNotFound { path: rel(path) },
            Self::FileNotFound { path } => Self::FileNotFound { path: rel(path) },
            Self::YamlParse { path, source } => Self::YamlParse {
                path: rel(path),
                source,
            },
            Self::NotAList { name, path } => Self::NotAList {
                name,
                path: rel(path),
            },
            Self::Io { path, source } => Self::Io {
                path: rel(path),
                source,
            },
        }
    }

    /// Whether this error means the file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. } | Self::PackageNotFound { .. })
    }
}

/// Result type alias for pack operations.
pub type PackResult<T> = Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_not_found_display() {
        let err = PackError::PackageNotFound {
            path: PathBuf::from("chapters/week_03"),
        };
        assert_eq!(
            err.to_string(),
            "missing week dir: chapters/week_03/ (create the package first)"
        );
    }

    #[test]
    fn not_a_list_display() {
        let err = PackError::NotAList {
            name: "TERMS.yml".to_string(),
            path: PathBuf::from("chapters/week_03/TERMS.yml"),
        };
        assert_eq!(
            err.to_string(),
            "TERMS.yml must be a list: chapters/week_03/TERMS.yml"
        );
    }

    #[test]
    fn relative_to_strips_root() {
        let err = PackError::FileNotFound {
            path: PathBuf::from("/repo/shared/glossary.yml"),
        }
        .relative_to(Path::new("/repo"));
        assert_eq!(err.to_string(), "required file not found: shared/glossary.yml");
    }

    #[test]
    fn relative_to_keeps_foreign_paths() {
        let err = PackError::FileNotFound {
            path: PathBuf::from("/elsewhere/x.yml"),
        }
        .relative_to(Path::new("/repo"));
        assert!(err.to_string().contains("/elsewhere/x.yml"));
    }

    #[test]
    fn not_found_classification() {
        assert!(PackError::FileNotFound {
            path: PathBuf::from("x")
        }
        .is_not_found());
        assert!(!PackError::NotAList {
            name: "x".to_string(),
            path: PathBuf::from("x")
        }
        .is_not_found());
    }
}
