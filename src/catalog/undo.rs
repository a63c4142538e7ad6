//! Undo counterpart lookup
//!
//! A script `D/B.ext` is reversed by `D/B.undo.ext` or, failing that,
//! `D/B-undo.ext`. The pairing is a filesystem lookup, never stored state.

use std::path::{Path, PathBuf};

use crate::models::{BatchItem, ScriptEntry};

/// Suffixes tried in order; the first existing file wins
const UNDO_SUFFIXES: [&str; 2] = [".undo", "-undo"];

/// Candidate counterpart paths for `script`, in lookup order
pub fn undo_candidates(script: &Path) -> Vec<PathBuf> {
    let Some(stem) = script.file_stem() else {
        return Vec::new();
    };
    let dir = script.parent().unwrap_or_else(|| Path::new(""));
    let extension = script.extension();

    UNDO_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut name = stem.to_os_string();
            name.push(suffix);
            if let Some(ext) = extension {
                name.push(".");
                name.push(ext);
            }
            dir.join(name)
        })
        .collect()
}

/// The existing counterpart of `script`, if any
pub fn undo_counterpart(script: &Path) -> Option<PathBuf> {
    undo_candidates(script)
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Whether `script` has a counterpart on disk right now
pub fn has_undo(script: &Path) -> bool {
    undo_counterpart(script).is_some()
}

/// Whether `script` is itself a counterpart by name (`*.undo.ext`, `*-undo.ext`)
pub fn is_undo_script(script: &Path) -> bool {
    script
        .file_stem()
        .map(|stem| {
            let stem = stem.to_string_lossy();
            UNDO_SUFFIXES
                .iter()
                .any(|suffix| stem.len() > suffix.len() && stem.ends_with(suffix))
        })
        .unwrap_or(false)
}

/// Outcome of resolving a selection to its undo batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoResolution {
    /// No selected entry has a counterpart; the runner must not be invoked
    NothingToUndo,
    /// Counterparts to run, in selection order
    Batch(Vec<BatchItem>),
}

impl UndoResolution {
    pub fn is_empty(&self) -> bool {
        matches!(self, UndoResolution::NothingToUndo)
    }
}

/// Map each selected entry to its counterpart, dropping entries without one
///
/// Existence is checked now rather than trusting `has_undo` from the last scan.
pub fn resolve_undo<'a, I>(entries: I) -> UndoResolution
where
    I: IntoIterator<Item = &'a ScriptEntry>,
{
    let items: Vec<BatchItem> = entries
        .into_iter()
        .filter_map(|entry| undo_counterpart(&entry.path))
        .map(BatchItem::from_path)
        .collect();

    if items.is_empty() {
        UndoResolution::NothingToUndo
    } else {
        UndoResolution::Batch(items)
    }
}
