//! Windows interpreter operations

use crate::platform::traits::{InterpreterDefaults, InterpreterOps};
use std::path::PathBuf;
use windows_sys::Win32::System::Threading::CREATE_NO_WINDOW;

const WINDOWS_POWERSHELL: &str = r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe";
const POWERSHELL_CORE: &str = r"C:\Program Files\PowerShell\7\pwsh.exe";

pub struct WindowsInterpreter;

impl WindowsInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl InterpreterOps for WindowsInterpreter {
    fn default_interpreter(&self) -> InterpreterDefaults {
        let program = if PathBuf::from(WINDOWS_POWERSHELL).exists() {
            PathBuf::from(WINDOWS_POWERSHELL)
        } else {
            // Let PATH resolve it
            PathBuf::from("powershell.exe")
        };

        InterpreterDefaults {
            program,
            args: vec![
                "-NoProfile".to_string(),
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-File".to_string(),
            ],
            extension: "ps1".to_string(),
        }
    }

    fn detect_interpreters(&self) -> Vec<(String, PathBuf)> {
        let candidates = [
            ("powershell", WINDOWS_POWERSHELL),
            ("pwsh", POWERSHELL_CORE),
            ("cmd", r"C:\Windows\System32\cmd.exe"),
        ];

        candidates
            .into_iter()
            .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
            .filter(|(_, path)| path.exists())
            .collect()
    }

    fn prepare_command(&self, command: &mut tokio::process::Command) {
        command.creation_flags(CREATE_NO_WINDOW);
    }
}
