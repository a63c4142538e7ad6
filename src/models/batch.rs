//! Batch Model
//!
//! Items submitted to the batch runner, the events it emits while working
//! through them and the summary it returns at the end.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::script_entry::{display_name_for, ScriptEntry};

/// One script queued for execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Script file to run
    pub path: PathBuf,

    /// Name used in status messages
    pub display_name: String,
}

impl BatchItem {
    pub fn new(path: PathBuf, display_name: impl Into<String>) -> Self {
        Self {
            path,
            display_name: display_name.into(),
        }
    }

    /// Item named after the file stem of `path`
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::new(path.to_path_buf(), display_name_for(path))
    }
}

impl From<&ScriptEntry> for BatchItem {
    fn from(entry: &ScriptEntry) -> Self {
        Self::new(entry.path.clone(), entry.display_name.clone())
    }
}

impl From<ScriptEntry> for BatchItem {
    fn from(entry: ScriptEntry) -> Self {
        Self::new(entry.path, entry.display_name)
    }
}

/// Stream form of the runner's callback surface
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// Batch accepted; run-triggering affordances should be disabled
    Started { total: usize },
    /// Status line changed
    Status(String),
    /// Text to append to the output view
    Output(String),
    /// Completed fraction in `0.0..=1.0`
    Progress(f64),
    /// Batch over; affordances can be re-enabled
    Finished(BatchSummary),
}

/// Aggregate outcome of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Unique identifier, also written to the audit log
    pub batch_id: String,

    /// Items submitted
    pub total: usize,

    /// Items that were run, whatever their exit code
    pub completed: usize,

    /// Items that ran with a non-zero exit code
    pub failed: usize,

    /// Whether the batch stopped early on cancellation
    pub cancelled: bool,

    /// When the batch started (local time)
    pub started_at: DateTime<Local>,

    /// When the batch finished (None while running)
    pub finished_at: Option<DateTime<Local>>,
}

impl BatchSummary {
    pub fn new(total: usize) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            total,
            completed: 0,
            failed: 0,
            cancelled: false,
            started_at: Local::now(),
            finished_at: None,
        }
    }

    /// Record one finished item
    pub fn record(&mut self, exit_code: i32) {
        self.completed += 1;
        if exit_code != 0 {
            self.failed += 1;
        }
    }

    pub fn mark_finished(&mut self) {
        self.finished_at = Some(Local::now());
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// Items that ran with exit code zero
    pub fn succeeded(&self) -> usize {
        self.completed - self.failed
    }

    /// Items never started because the batch was cancelled
    pub fn skipped(&self) -> usize {
        self.total - self.completed
    }
}

/// Progress after `done` of `total` items
pub fn progress_fraction(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    done as f64 / total as f64
}
