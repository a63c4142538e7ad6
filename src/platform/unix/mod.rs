//! Unix-specific platform implementations

mod interpreter;
mod paths;
mod privileges;

pub use interpreter::UnixInterpreter;
pub use paths::UnixPaths;
pub use privileges::UnixPrivileges;
