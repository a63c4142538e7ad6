//! Execution Result Model
//!
//! Outcome of one script run: the exit code plus stdout and stderr folded
//! into a single display string.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Exit code reported when no process ran to completion
pub const FAILED_TO_RUN: i32 = -1;

/// Marker placed between stdout and stderr in the combined output
pub const STDERR_SEPARATOR: &str = "--- STDERR ---";

/// Result of running a single script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Child exit code, or `-1` when the script never ran to completion
    pub exit_code: i32,

    /// stdout, then an stderr section when stderr has non-whitespace content
    pub combined_output: String,
}

impl ExecutionResult {
    /// Result of a completed process
    pub fn completed(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            exit_code,
            combined_output: combine_output(stdout, stderr),
        }
    }

    /// The script file did not exist; nothing was spawned
    pub fn not_found(path: &Path) -> Self {
        Self {
            exit_code: FAILED_TO_RUN,
            combined_output: format!("Script not found: {}", path.display()),
        }
    }

    /// Spawning or talking to the process failed
    pub fn execution_error(message: impl std::fmt::Display) -> Self {
        Self {
            exit_code: FAILED_TO_RUN,
            combined_output: format!("Execution error: {}", message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Fold both streams into one display string
///
/// stdout is always present followed by a newline. stderr is appended under
/// [`STDERR_SEPARATOR`] only when it contains something other than whitespace.
pub fn combine_output(stdout: &str, stderr: &str) -> String {
    let mut combined = String::with_capacity(stdout.len() + stderr.len() + 32);
    combined.push_str(stdout);
    combined.push('\n');

    if !stderr.trim().is_empty() {
        combined.push_str(STDERR_SEPARATOR);
        combined.push('\n');
        combined.push_str(stderr);
        combined.push('\n');
    }

    combined
}
