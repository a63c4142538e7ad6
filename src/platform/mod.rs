//! Platform abstraction layer
//!
//! This module provides a unified interface for platform-specific operations,
//! abstracting away differences between Unix and Windows.

mod traits;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use traits::*;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the platform-specific interpreter operations
    pub fn interpreter() -> Box<dyn InterpreterOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixInterpreter::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::WindowsInterpreter::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }

    /// Get the platform-specific privilege checks
    pub fn privileges() -> Box<dyn PrivilegeOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixPrivileges::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::WindowsPrivileges::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }

    /// Get the platform-specific path operations
    pub fn paths() -> Box<dyn PathOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixPaths::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::WindowsPaths::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }
}
