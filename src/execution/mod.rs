//! Script execution
//!
//! Runs one script file through its interpreter as a child process and
//! returns an [`ExecutionResult`]. Nothing here returns an error: a missing
//! file, an interpreter that will not start or a broken pipe all become a `-1`
//! result so the batch runner can move on to the next script.
//!
//! stdout and stderr are drained concurrently and fully before waiting for
//! exit. Reading them one after the other deadlocks as soon as the child fills
//! the pipe buffer of the stream nobody is reading.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::audit::AuditLog;
use crate::config::InterpreterConfig;
use crate::models::ExecutionResult;
use crate::platform::Platform;

/// Runs a single script to completion
///
/// The seam between the batch runner and the operating system; tests drive
/// the runner with a mock implementation.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Run `script` and report its outcome. Must not panic or return early
    /// before the child has exited.
    async fn run(&self, script: &Path) -> ExecutionResult;
}

/// Executes scripts through a configured interpreter
pub struct InterpreterExecutor {
    /// Interpreter executable
    program: PathBuf,
    /// Arguments placed before the script path
    args: Vec<String>,
    /// Working directory; inherited when unset
    working_dir: Option<PathBuf>,
    /// Extra environment variables
    env_vars: HashMap<String, String>,
    audit: Arc<AuditLog>,
}

impl InterpreterExecutor {
    /// Create an executor from interpreter configuration
    pub fn new(config: &InterpreterConfig, audit: Arc<AuditLog>) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_directory.clone(),
            env_vars: config.environment.clone(),
            audit,
        }
    }

    /// Create an executor for an explicit program and leading arguments
    pub fn with_program(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
            env_vars: HashMap::new(),
            audit,
        }
    }

    /// Set working directory
    pub fn set_working_dir(&mut self, dir: PathBuf) {
        self.working_dir = Some(dir);
    }

    /// Set environment variable
    pub fn set_env(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }

    /// Interpreter command line for `script`, for display and logging
    pub fn command_line(&self, script: &Path) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.push(format!("\"{}\"", script.display()));
        parts.join(" ")
    }

    /// Spawn the interpreter and capture `(stdout, stderr, exit_code)`
    async fn spawn_and_capture(&self, script: &Path) -> io::Result<(String, String, i32)> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(script)
            .envs(&self.env_vars)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Only reached if capture fails or the run future is dropped
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        Platform::interpreter().prepare_command(&mut command);

        let mut child = command.spawn()?;
        debug!("Spawned {} (pid {:?})", self.command_line(script), child.id());

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("stderr was not captured"))?;

        let (stdout, stderr) = drain_concurrently(stdout, stderr).await?;
        let status = child.wait().await?;

        // A child killed by a signal has no exit code
        Ok((stdout, stderr, status.code().unwrap_or(-1)))
    }
}

#[async_trait]
impl ScriptExecutor for InterpreterExecutor {
    async fn run(&self, script: &Path) -> ExecutionResult {
        if !script.exists() {
            warn!("Script not found: {}", script.display());
            return ExecutionResult::not_found(script);
        }

        match self.spawn_and_capture(script).await {
            Ok((stdout, stderr, exit_code)) => {
                debug!(
                    "{} exited with {} ({} bytes stdout, {} bytes stderr)",
                    script.display(),
                    exit_code,
                    stdout.len(),
                    stderr.len()
                );
                ExecutionResult::completed(exit_code, &stdout, &stderr)
            }
            Err(e) => {
                error!("Failed to run {}: {}", script.display(), e);
                self.audit.log(format!(
                    "Script execution error: {} ({:?}) while running {}",
                    e,
                    e.kind(),
                    self.command_line(script)
                ));
                ExecutionResult::execution_error(e)
            }
        }
    }
}

/// Read two streams to the end at the same time
///
/// Both reads are polled together, so a child blocked writing to one pipe is
/// never waiting on us to finish the other.
pub async fn drain_concurrently<A, B>(first: A, second: B) -> io::Result<(String, String)>
where
    A: AsyncRead + Unpin,
    B: AsyncRead + Unpin,
{
    tokio::try_join!(drain(first), drain(second))
}

/// Read a stream to the end as (lossy) UTF-8
async fn drain<R>(mut reader: R) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
