//! Type-safe external tool command builder
//!
//! A fluent API for building and executing the external binaries the
//! pipeline delegates to (`wkg`, `wit-bindgen`, `wasm-tools`, `oras`),
//! ensuring consistent output capture, logging, and error mapping across
//! every invocation.
//!
//! Invocations are synchronous from the pipeline's point of view: each is
//! awaited to completion before the next file is processed, and no timeout
//! is applied by default - a hang in an external tool blocks the batch,
//! and cancellation is process-level only.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::WitpkgError;

/// Captured output of a completed tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Builder for one external tool invocation.
///
/// # Examples
///
/// ```rust,ignore
/// let output = ToolCommand::new("wkg")
///     .args(["wit", "build", "--wit-dir"])
///     .arg(staged.path().display().to_string())
///     .execute()
///     .await?;
/// ```
pub struct ToolCommand {
    /// Tool binary name, also used in error reporting
    program: String,
    /// Arguments passed to the tool
    args: Vec<String>,
    /// Working directory for the invocation (defaults to the process cwd)
    current_dir: Option<std::path::PathBuf>,
    /// Environment variables set for the child process
    env_vars: Vec<(String, String)>,
    /// Maximum duration to wait (None = wait indefinitely, the default)
    timeout_duration: Option<Duration>,
}

impl ToolCommand {
    /// Create a builder for `program` with no arguments, no timeout, and
    /// output capture enabled.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the invocation.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a timeout for the invocation (none is applied by default).
    #[must_use]
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Execute the command and return its captured output.
    ///
    /// # Errors
    ///
    /// [`WitpkgError::ExternalToolFailure`] when the tool exits non-zero;
    /// the captured stderr (or stdout when stderr is empty) is included so
    /// the operator sees the tool's own diagnostics.
    pub async fn execute(self) -> Result<ToolOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        tracing::debug!(
            target: "tool",
            "Executing command: {} {}",
            self.program,
            self.args.join(" ")
        );

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            timeout(duration, output_future)
                .await
                .map_err(|_| WitpkgError::ExternalToolFailure {
                    tool: self.program.clone(),
                    operation: self.operation(),
                    stderr: format!("timed out after {} seconds", duration.as_secs()),
                })?
                .context(format!("Failed to execute {}", self.program))?
        } else {
            output_future.await.context(format!("Failed to execute {}", self.program))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "tool",
                "{} exited with {:?}",
                self.program,
                output.status.code()
            );
            return Err(WitpkgError::ExternalToolFailure {
                tool: self.program.clone(),
                operation: self.operation(),
                stderr: if stderr.trim().is_empty() { stdout } else { stderr },
            }
            .into());
        }

        tracing::trace!(target: "tool", "{} completed successfully", self.program);
        Ok(ToolOutput { stdout, stderr })
    }

    /// Execute the command, discarding output on success.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await.map(|_| ())
    }

    /// First argument, used as the operation name in error reporting.
    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "run".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() -> Result<()> {
        let output = ToolCommand::new("echo").arg("hello").execute().await?;
        assert_eq!(output.stdout.trim(), "hello");
        Ok(())
    }

    #[tokio::test]
    async fn non_zero_exit_is_external_tool_failure() {
        let error = ToolCommand::new("false").execute().await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<WitpkgError>(),
            Some(WitpkgError::ExternalToolFailure { .. })
        ));
    }

    #[tokio::test]
    async fn reports_tool_and_operation_on_failure() {
        let error = ToolCommand::new("ls")
            .args(["--no-such-flag"])
            .execute()
            .await
            .unwrap_err();
        let message = format!("{error}");
        assert!(message.contains("ls"));
        assert!(message.contains("--no-such-flag"));
    }
}
