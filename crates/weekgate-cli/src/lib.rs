//! # weekgate-cli: Release Gate Command
//!
//! Provides the `weekgate` command-line interface:
//!
//! ```bash
//! weekgate --week week_03 --mode drafting
//! weekgate --week 07 --mode release -v
//! weekgate --week 7 --mode idle --json
//! ```
//!
//! Exit code 0 means the package passed; 2 means at least one problem was
//! found or the invocation itself was invalid.

pub mod report;
pub mod validate;

use std::path::{Path, PathBuf};

/// Directory whose presence marks the repository root.
pub const ROOT_MARKER_DIR: &str = "chapters";

/// Walk up from `start` to the first directory containing `chapters/`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(ROOT_MARKER_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `repo_root` resolves there; otherwise it is left relative to the
/// current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}
