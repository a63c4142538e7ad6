//! Configuration management for ScriptDeck
//!
//! Where scripts live, where the audit log is written, which interpreter runs
//! a script file and whether batches need confirmation. Every section has
//! defaults, so a config file only needs the keys it wants to change.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// Main configuration structure for ScriptDeck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filesystem layout
    pub paths: PathsConfig,

    /// Catalog listing options
    pub catalog: CatalogConfig,

    /// Script interpreter invocation
    pub interpreter: InterpreterConfig,

    /// Batch runner behaviour
    pub runner: RunnerConfig,
}

impl Config {
    /// Base directory that relative paths are resolved against
    pub fn app_root(&self) -> PathBuf {
        self.paths
            .app_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Absolute scripts root (`<app_root>/scripts` by default)
    pub fn scripts_dir(&self) -> PathBuf {
        resolve(&self.app_root(), &self.paths.scripts_dir)
    }

    /// Absolute audit log folder (`<app_root>/logs` by default)
    pub fn logs_dir(&self) -> PathBuf {
        resolve(&self.app_root(), &self.paths.logs_dir)
    }

    /// Same config rooted at `root`
    pub fn with_app_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.paths.app_root = Some(root.into());
        self
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Filesystem layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Application root; the current directory when unset
    pub app_root: Option<PathBuf>,

    /// Scripts root, one subdirectory per category
    pub scripts_dir: PathBuf,

    /// Audit log folder
    pub logs_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            app_root: None,
            scripts_dir: PathBuf::from("scripts"),
            logs_dir: PathBuf::from("logs"),
        }
    }
}

/// Catalog listing options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Leave `*.undo.<ext>` and `*-undo.<ext>` files out of the listing
    pub hide_undo_scripts: bool,
}

/// How a script file is handed to its interpreter
///
/// The script path is appended after `args`, so for PowerShell the args end
/// with `-File`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Interpreter executable
    pub program: PathBuf,

    /// Arguments placed before the script path
    pub args: Vec<String>,

    /// Script file extension without the leading dot
    pub extension: String,

    /// Working directory for scripts; inherited when unset
    pub working_directory: Option<PathBuf>,

    /// Extra environment variables
    pub environment: HashMap<String, String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        let defaults = Platform::interpreter().default_interpreter();
        Self {
            program: defaults.program,
            args: defaults.args,
            extension: defaults.extension,
            working_directory: None,
            environment: HashMap::new(),
        }
    }
}

/// Batch runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Ask the confirmation port before every batch
    pub confirm: bool,

    /// Warn before running the selection without administrator or root rights
    pub warn_when_not_elevated: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            confirm: true,
            warn_when_not_elevated: true,
        }
    }
}

/// Configuration utilities
pub mod utils {
    use super::*;

    /// Get configuration file format from path
    pub fn get_config_format(path: &Path) -> Option<loader::ConfigFormat> {
        match path.extension()?.to_str()? {
            "toml" => Some(loader::ConfigFormat::Toml),
            "json" => Some(loader::ConfigFormat::Json),
            _ => None,
        }
    }
}
