//! Selection State
//!
//! The set of entries the user has ticked, keyed by script path. A front end
//! mutates it with explicit toggle calls; the launcher reads it when a batch
//! is requested.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::models::ScriptEntry;

/// Set of selected entry identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<PathBuf>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the selection state of `id`, returning whether it is now selected
    pub fn toggle(&mut self, id: impl AsRef<Path>) -> bool {
        let id = id.as_ref();
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_path_buf());
            true
        }
    }

    pub fn select(&mut self, id: impl Into<PathBuf>) {
        self.selected.insert(id.into());
    }

    pub fn deselect(&mut self, id: impl AsRef<Path>) {
        self.selected.remove(id.as_ref());
    }

    /// Select every entry in `entries`
    pub fn select_all<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a ScriptEntry>,
    {
        self.selected
            .extend(entries.into_iter().map(|entry| entry.id().to_path_buf()));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: impl AsRef<Path>) -> bool {
        self.selected.contains(id.as_ref())
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected entries of `entries`, in `entries` order
    ///
    /// Identifiers that no longer match an entry (e.g. after a rescan) are
    /// ignored.
    pub fn pick<'a, I>(&self, entries: I) -> Vec<&'a ScriptEntry>
    where
        I: IntoIterator<Item = &'a ScriptEntry>,
    {
        entries
            .into_iter()
            .filter(|entry| self.contains(entry.id()))
            .collect()
    }

    /// Drop identifiers that are not in `entries`
    pub fn retain_known<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a ScriptEntry>,
    {
        let known: HashSet<&Path> = entries.into_iter().map(ScriptEntry::id).collect();
        self.selected.retain(|id| known.contains(id.as_path()));
    }
}
