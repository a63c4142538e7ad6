//! Session audit log
//!
//! One append-only text file per session under the logs folder, named
//! `log_<yyyyMMdd_HHmmss>.txt`, one `<yyyy-MM-dd HH:mm:ss> - <message>` line per
//! event. Every component gets the same [`AuditLog`] handle injected.
//!
//! Writing is best effort: a failure to create the folder or append a line is
//! reported through `tracing` and otherwise swallowed. Lines are written with a
//! single `write_all` while holding the log's mutex, so concurrent callers never
//! interleave partial lines.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Timestamp format used at the start of every line
const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format used in the session file name
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Append-only, timestamped event sink for one session
#[derive(Debug)]
pub struct AuditLog {
    /// Folder holding the session files
    log_folder: PathBuf,
    /// This session's file
    current_log_file: PathBuf,
    /// Serializes appends
    write_lock: Mutex<()>,
}

impl AuditLog {
    /// Open a new session log under `log_folder`
    ///
    /// The folder is created if needed. Never fails; see the module docs.
    pub fn open(log_folder: impl Into<PathBuf>) -> Self {
        let log_folder = log_folder.into();
        if let Err(e) = fs::create_dir_all(&log_folder) {
            warn!(
                "Could not create log folder {}: {}",
                log_folder.display(),
                e
            );
        }

        let file_name = format!("log_{}.txt", Local::now().format(FILE_TIMESTAMP_FORMAT));
        let log = Self {
            current_log_file: log_folder.join(file_name),
            log_folder,
            write_lock: Mutex::new(()),
        };
        log.log("Logger initialized.");
        log
    }

    /// Append one line
    pub fn log(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        debug!(target: "scriptdeck::audit", "{}", message);

        let line = format_line(message);
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.current_log_file)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = result {
            // Best effort: never surface to the caller
            warn!(
                "Audit log write to {} failed: {}",
                self.current_log_file.display(),
                e
            );
        }
    }

    /// Folder holding the session files
    pub fn log_folder(&self) -> &Path {
        &self.log_folder
    }

    /// This session's log file
    pub fn current_log_file(&self) -> &Path {
        &self.current_log_file
    }
}

/// Render one log line including the trailing newline
fn format_line(message: &str) -> String {
    format!(
        "{} - {}{}",
        Local::now().format(LINE_TIMESTAMP_FORMAT),
        message,
        LINE_ENDING
    )
}

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";
