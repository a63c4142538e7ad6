//! Script Entry Model
//!
//! A runnable script discovered by a catalog scan, and the category that
//! groups entries by containing directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single runnable script found in the catalog
///
/// Identity is the path. Entries are rebuilt on every scan and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Containing directory name
    pub category: String,

    /// File stem shown to the user
    pub display_name: String,

    /// Absolute path to the script file
    pub path: PathBuf,

    /// Whether an undo counterpart existed at scan time
    pub has_undo: bool,
}

impl ScriptEntry {
    /// Create an entry; the display name is derived from the file stem
    pub fn new(category: impl Into<String>, path: PathBuf, has_undo: bool) -> Self {
        let display_name = display_name_for(&path);
        Self {
            category: category.into(),
            display_name,
            path,
            has_undo,
        }
    }

    /// Identifier used by selections
    pub fn id(&self) -> &Path {
        &self.path
    }
}

/// File stem of `path`, or the full file name when it has no stem
pub fn display_name_for(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Entries grouped under one category directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptCategory {
    /// Directory name
    pub name: String,

    /// Entries in directory enumeration order
    pub entries: Vec<ScriptEntry>,
}

impl ScriptCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
