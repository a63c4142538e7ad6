//! Script catalog
//!
//! Scans a scripts root laid out as `<root>/<category>/<name>.<ext>` and
//! groups the files it finds by category. The scan never fails: an unreadable
//! directory contributes nothing and is reported to the audit log.
//!
//! Order is whatever the filesystem enumerates; nothing is sorted.

pub mod undo;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::audit::AuditLog;
use crate::models::{ScriptCategory, ScriptEntry};

pub use undo::{has_undo, resolve_undo, undo_counterpart, UndoResolution};

/// Discovers runnable scripts and their undo pairing
pub struct ScriptCatalog {
    /// Extension of runnable scripts, without the dot
    extension: String,
    /// Leave `*.undo.ext` / `*-undo.ext` out of the entry lists
    hide_undo_scripts: bool,
    audit: Arc<AuditLog>,
}

impl ScriptCatalog {
    /// Create a catalog for scripts with `extension` (e.g. `ps1`)
    pub fn new(extension: impl Into<String>, audit: Arc<AuditLog>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            hide_undo_scripts: false,
            audit,
        }
    }

    /// Hide undo counterparts from the entry lists
    pub fn with_hidden_undo_scripts(mut self, hide: bool) -> Self {
        self.hide_undo_scripts = hide;
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Scan `root`, creating it when absent
    ///
    /// Returns one category per immediate subdirectory that holds at least one
    /// matching file.
    pub fn scan(&self, root: &Path) -> Vec<ScriptCategory> {
        if !root.exists() {
            self.audit
                .log(format!("Scripts folder not found, creating: {}", root.display()));
            if let Err(e) = fs::create_dir_all(root) {
                warn!("Failed to create scripts folder {}: {}", root.display(), e);
                self.audit.log(format!(
                    "Failed to create scripts folder {}: {}",
                    root.display(),
                    e
                ));
            }
            return Vec::new();
        }

        let dirs = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read scripts folder {}: {}", root.display(), e);
                self.audit
                    .log(format!("Failed to read scripts folder {}: {}", root.display(), e));
                return Vec::new();
            }
        };

        let mut categories = Vec::new();
        for dir in dirs.flatten() {
            let path = dir.path();
            if !path.is_dir() {
                continue;
            }

            let name = dir.file_name().to_string_lossy().into_owned();
            let category = self.scan_category(&name, &path);
            if category.is_empty() {
                debug!("Skipping empty category '{}'", name);
                continue;
            }
            categories.push(category);
        }

        info!(
            "Catalog scan of {} found {} categories, {} scripts",
            root.display(),
            categories.len(),
            categories.iter().map(ScriptCategory::len).sum::<usize>()
        );
        categories
    }

    /// Collect the matching files directly inside one category directory
    fn scan_category(&self, name: &str, dir: &Path) -> ScriptCategory {
        let mut category = ScriptCategory::new(name);

        let files = match fs::read_dir(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("Failed to read category folder {}: {}", dir.display(), e);
                self.audit
                    .log(format!("Failed to read category folder {}: {}", dir.display(), e));
                return category;
            }
        };

        for file in files.flatten() {
            let path = absolute(file.path());
            if !path.is_file() || !self.matches_extension(&path) {
                continue;
            }
            if self.hide_undo_scripts && undo::is_undo_script(&path) {
                continue;
            }

            let has_undo = undo::has_undo(&path);
            category.entries.push(ScriptEntry::new(name, path, has_undo));
        }

        category
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

/// All entries of a scan result, category by category
pub fn all_entries(categories: &[ScriptCategory]) -> impl Iterator<Item = &ScriptEntry> {
    categories.iter().flat_map(|category| category.entries.iter())
}
