//! # Tool Executor
//!
//! Runs command lines as child processes for the `mcp_cli_tool` and the router's
//! shell directives. The line is split with POSIX shell-word rules and argv[0] is
//! executed directly: quoting is honoured, but no shell expands pipes, globs or
//! variables.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::domain::traits::CommandRunner;
use crate::domain::types::{ExecutionResult, ProcessError};
use crate::strings::messages;

/// Executes command lines, waiting for completion and capturing both streams.
#[derive(Debug, Default, Clone)]
pub struct ToolExecutor;

impl ToolExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Split `command` into argv. `None` when the line has unbalanced quotes.
    pub fn split_command(command: &str) -> Option<Vec<String>> {
        shlex::split(command)
    }

    pub async fn execute_command(&self, command: &str) -> Result<ExecutionResult, ProcessError> {
        if command.trim().is_empty() {
            return Err(ProcessError::Empty);
        }

        let argv = Self::split_command(command)
            .ok_or_else(|| ProcessError::NonZero(format!("malformed command (unmatched quotes): {command}")))?;
        let (program, args) = argv.split_first().ok_or(ProcessError::Empty)?;

        tracing::debug!(program = %program, args = ?args, "Spawning command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProcessError::NonZero(format!("failed to run '{program}': {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            tracing::debug!(status = %output.status, "Command exited unsuccessfully");
            return Err(ProcessError::NonZero(stderr.trim().to_string()));
        }

        let stdout = stdout.trim();
        if stdout.is_empty() {
            Ok(ExecutionResult::success(messages::NO_OUTPUT))
        } else {
            Ok(ExecutionResult::success(stdout))
        }
    }
}

#[async_trait]
impl CommandRunner for ToolExecutor {
    async fn run_command(&self, command: &str) -> Result<ExecutionResult, ProcessError> {
        self.execute_command(command).await
    }
}
