//! ScriptDeck - a launcher for categorized local scripts
//!
//! This library provides the core of ScriptDeck: it discovers scripts laid
//! out as `scripts/<category>/<name>.<ext>`, runs a selected batch of them one
//! at a time through the platform interpreter and reports progress to a front
//! end, keeping a per-session audit log as it goes. A script `name.<ext>` can
//! be reversed by a paired `name.undo.<ext>` or `name-undo.<ext>`.
//!
//! ## Module Organization
//!
//! - [`catalog`] - Directory scan, undo pairing and undo resolution
//! - [`execution`] - Running one script as a child process
//! - [`runner`] - Sequential batch runner and its observer surface
//! - [`audit`] - Timestamped, append-only session log
//! - [`launcher`] - Selection, confirmation and the three user actions
//! - [`config`] - Configuration loading and defaults
//! - [`platform`] - Interpreter defaults and platform directories
//! - [`models`] - Entries, execution results and batch types
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use scriptdeck::{AutoConfirm, Config, Launcher, NullObserver};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> scriptdeck::Result<()> {
//! let mut launcher = Launcher::new(Config::default(), Box::new(AutoConfirm));
//! let first = launcher.entries().next().map(|e| e.path.clone());
//! if let Some(path) = first {
//!     launcher.selection_mut().select(path);
//! }
//! let outcome = launcher
//!     .run_selected(&NullObserver, &CancellationToken::new())
//!     .await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Scripts never run in parallel. A batch runs as an async task so the caller
//! stays responsive, but each script is awaited before the next one starts.
//! Both output pipes of a child are drained concurrently, which keeps chatty
//! scripts from deadlocking on a full pipe buffer.

#![allow(unexpected_cfgs)]

#[macro_use]
extern crate tracing;

pub mod audit;
pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod launcher;
pub mod models;
pub mod platform;
pub mod runner;
pub mod state;

// Re-exports for core functionality
pub use audit::AuditLog;
pub use catalog::{resolve_undo, ScriptCatalog, UndoResolution};
pub use config::loader::ConfigLoader;
pub use config::Config;
pub use error::{Error, Result};
pub use execution::{InterpreterExecutor, ScriptExecutor};
pub use launcher::{AutoConfirm, ConfirmRequest, ConfirmationPort, LaunchOutcome, Launcher};
pub use models::{BatchEvent, BatchItem, BatchSummary, ExecutionResult, ScriptCategory, ScriptEntry};
pub use runner::{BatchObserver, BatchRunner, ChannelObserver, NullObserver, RecordingObserver};
pub use state::Selection;

// Version information
/// The current version of ScriptDeck from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
