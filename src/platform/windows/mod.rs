//! Windows-specific platform implementations

mod interpreter;
mod paths;
mod privileges;

pub use interpreter::WindowsInterpreter;
pub use paths::WindowsPaths;
pub use privileges::WindowsPrivileges;
