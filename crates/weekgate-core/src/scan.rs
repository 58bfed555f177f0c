//! # Directory Scanning
//!
//! Small read-only helpers for finding files by name. Unreadable
//! directories are treated as empty; the gate reports missing paths
//! through its own structural checks.

use std::path::{Path, PathBuf};

/// Files (not directories) directly inside `dir` whose name satisfies `pred`,
/// sorted by path.
pub fn list_files(dir: &Path, pred: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && file_name_matches(&path, &pred) {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

/// Files anywhere below `dir` whose name satisfies `pred`, sorted by path.
pub fn find_files(dir: &Path, pred: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(dir, &pred, &mut found, false);
    found.sort();
    found
}

/// Whether any file below `dir` satisfies `pred`. Stops at the first hit.
pub fn any_file(dir: &Path, pred: impl Fn(&str) -> bool) -> bool {
    let mut found = Vec::new();
    walk(dir, &pred, &mut found, true);
    !found.is_empty()
}

/// Predicate matching names with the given extension (without the dot).
pub fn has_extension(extension: &str) -> impl Fn(&str) -> bool + '_ {
    move |name: &str| {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == extension)
    }
}

fn walk(dir: &Path, pred: &dyn Fn(&str) -> bool, found: &mut Vec<PathBuf>, first_only: bool) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        if first_only && !found.is_empty() {
            return;
        }
        let path = entry.path();
        if path.is_dir() {
            walk(&path, pred, found, first_only);
        } else if path.is_file() && file_name_matches(&path, pred) {
            found.push(path);
        }
    }
}

fn file_name_matches(path: &Path, pred: &dyn Fn(&str) -> bool) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| pred(n))
}
