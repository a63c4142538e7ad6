//! Core data models for ScriptDeck
//!
//! Catalog entries, execution results and the batch vocabulary shared by the
//! runner and its collaborators.

pub mod batch;
pub mod execution_result;
pub mod script_entry;

// Re-exports for convenience
pub use batch::{BatchEvent, BatchItem, BatchSummary};
pub use execution_result::ExecutionResult;
pub use script_entry::{ScriptCategory, ScriptEntry};
