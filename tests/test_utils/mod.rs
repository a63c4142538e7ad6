//! Test Utilities and Mocks
//!
//! Shared by the integration, contract and unit test targets. Each target
//! pulls this in with `#[path]`, so not every helper is used everywhere.

#![allow(dead_code)]

pub mod mock_executor;

// Re-exports for convenience
pub use fixtures::{shell_config, ScriptTree};
pub use mock_executor::MockExecutor;
