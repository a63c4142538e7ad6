//! Platform-specific operation traits
//!
//! These traits define the interface for platform-specific operations,
//! allowing for clean abstraction and easier testing.

use crate::error::Result;
use std::path::PathBuf;

/// Interpreter invocation a platform uses when none is configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterDefaults {
    /// Interpreter executable
    pub program: PathBuf,
    /// Arguments placed before the script path
    pub args: Vec<String>,
    /// Script extension handled by this interpreter, without the dot
    pub extension: String,
}

/// Platform-specific script interpreter operations
pub trait InterpreterOps: Send + Sync {
    /// Interpreter used when the configuration does not name one
    fn default_interpreter(&self) -> InterpreterDefaults;

    /// Detect installed interpreters as `(name, path)` pairs
    fn detect_interpreters(&self) -> Vec<(String, PathBuf)>;

    /// Apply platform process flags before spawning (hidden console window etc.)
    fn prepare_command(&self, command: &mut tokio::process::Command);
}

/// Privilege checks for the current process
pub trait PrivilegeOps: Send + Sync {
    /// Whether the process runs with administrator (Windows) or root (Unix) rights
    fn is_elevated(&self) -> bool;
}

/// Platform-specific path operations
pub trait PathOps: Send + Sync {
    /// Get configuration directory
    fn config_dir(&self) -> Result<PathBuf>;
}
