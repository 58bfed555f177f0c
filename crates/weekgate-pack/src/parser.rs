//! Shared YAML sidecar loading.
//!
//! Every sidecar (package-local or shared) is a YAML sequence of mappings.
//! Loading happens in two steps: [`load_list`] reads the file and checks
//! the top-level shape, then [`decode_items`] turns each element into a
//! typed record, keeping per-item failures so checkers can report them
//! with the item's 1-based position.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::{PackError, PackResult};

/// Failure to decode one element of a sidecar list.
#[derive(Debug)]
pub enum ItemError {
    /// The element is a scalar or sequence instead of a mapping.
    NotAMapping { index: usize },
    /// The element is a mapping but a field has the wrong type.
    Malformed {
        index: usize,
        source: serde_yaml::Error,
    },
}

impl ItemError {
    /// Render the failure for a sidecar named `name`.
    pub fn describe(&self, name: &str) -> String {
        match self {
            Self::NotAMapping { index } => format!("{name} item #{index} must be a mapping"),
            Self::Malformed { index, source } => {
                format!("{name} item #{index} is malformed: {source}")
            }
        }
    }
}

/// A decoded element together with its 1-based position.
pub type Item<T> = Result<(usize, T), ItemError>;

/// Read a file to a string, mapping a missing file to
/// [`PackError::FileNotFound`].
pub fn read_text(path: &Path) -> PackResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PackError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Load a YAML file whose top level must be a sequence.
///
/// An empty file or a document that is `null` is an empty list.
pub fn load_list(path: &Path) -> PackResult<Vec<Value>> {
    let content = read_text(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_yaml::from_str(&content).map_err(|e| PackError::YamlParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => Ok(items),
        _ => Err(PackError::NotAList {
            name: file_label(path),
            path: path.to_path_buf(),
        }),
    }
}

/// Decode raw list elements into typed records.
pub fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<Item<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let index = i + 1;
            if !value.is_mapping() {
                return Err(ItemError::NotAMapping { index });
            }
            serde_yaml::from_value(value)
                .map(|record| (index, record))
                .map_err(|source| ItemError::Malformed { index, source })
        })
        .collect()
}

/// Load and decode a sidecar in one step.
pub fn load_items<T: DeserializeOwned>(path: &Path) -> PackResult<Vec<Item<T>>> {
    load_list(path).map(decode_items)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
