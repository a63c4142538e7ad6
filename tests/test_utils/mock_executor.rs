//! Mock Script Executor
//!
//! Stands in for the interpreter so batch and launcher behaviour can be
//! checked without spawning anything.

use async_trait::async_trait;
use scriptdeck::{ExecutionResult, ScriptExecutor};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records every call and answers with a configured exit code
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<PathBuf>>,
    spawns: AtomicUsize,
    exit_codes: HashMap<String, i32>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make scripts named `stem` exit with `code`
    pub fn with_exit_code(mut self, stem: &str, code: i32) -> Self {
        self.exit_codes.insert(stem.to_string(), code);
        self
    }

    /// Paths passed to `run`, in call order
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of runs that would have started a process
    pub fn spawn_count(&self) -> usize {
        self.spawns.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptExecutor for MockExecutor {
    async fn run(&self, script: &Path) -> ExecutionResult {
        self.calls.lock().unwrap().push(script.to_path_buf());

        // Same precondition as the real executor
        if !script.exists() {
            return ExecutionResult::not_found(script);
        }
        self.spawns.fetch_add(1, Ordering::SeqCst);

        let stem = script
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let code = self.exit_codes.get(&stem).copied().unwrap_or(0);
        ExecutionResult::completed(code, &format!("mock ran {}", stem), "")
    }
}
