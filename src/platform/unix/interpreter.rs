//! Unix interpreter operations

use crate::platform::traits::{InterpreterDefaults, InterpreterOps};
use std::path::PathBuf;

pub struct UnixInterpreter;

impl UnixInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl InterpreterOps for UnixInterpreter {
    fn default_interpreter(&self) -> InterpreterDefaults {
        // Scripts are run as a file argument, never through `-c`
        InterpreterDefaults {
            program: PathBuf::from("/bin/sh"),
            args: Vec::new(),
            extension: "sh".to_string(),
        }
    }

    fn detect_interpreters(&self) -> Vec<(String, PathBuf)> {
        let candidates = [
            ("sh", "/bin/sh"),
            ("bash", "/bin/bash"),
            ("zsh", "/bin/zsh"),
            ("pwsh", "/usr/bin/pwsh"),
            ("pwsh", "/usr/local/bin/pwsh"),
            ("pwsh", "/opt/microsoft/powershell/7/pwsh"),
        ];

        let mut found: Vec<(String, PathBuf)> = Vec::new();
        for (name, path) in candidates {
            let path_buf = PathBuf::from(path);
            if path_buf.exists() && !found.iter().any(|(n, _)| n == name) {
                found.push((name.to_string(), path_buf));
            }
        }

        found
    }

    fn prepare_command(&self, _command: &mut tokio::process::Command) {}
}
