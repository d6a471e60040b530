//! Shell-command executions run by `depgraph run`.

use crate::error::ShellError;
use crate::execution::{DependencyExecutionIdentifier, ResultDependencyExecution};
use crate::manifest::ManifestEntry;
use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Captured output of a finished command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    /// `None` for entries without a command
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    fn skipped() -> Self {
        Self {
            code: None,
            stdout: String::new(),
        }
    }
}

/// Runs a manifest entry's command through a shell
#[derive(Debug, Clone)]
pub struct ShellExecution {
    entry: ManifestEntry,
    shell: String,
}

impl ShellExecution {
    pub fn new(entry: ManifestEntry, shell: impl Into<String>) -> Self {
        Self {
            entry,
            shell: shell.into(),
        }
    }
}

impl DependencyExecutionIdentifier<String> for ShellExecution {
    fn key(&self) -> &String {
        &self.entry.key
    }

    fn dependent_keys(&self) -> &[String] {
        &self.entry.depends_on
    }
}

#[async_trait]
impl ResultDependencyExecution<String, CommandOutput> for ShellExecution {
    type Error = ShellError;

    async fn execute(&self, cancellation: &CancellationToken) -> Result<CommandOutput, ShellError> {
        let Some(command) = self.entry.command.as_deref() else {
            return Ok(CommandOutput::skipped());
        };

        debug!(key = %self.entry.key, command, "spawning command");
        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Dropping the child on cancellation kills it
        let output = tokio::select! {
            output = child.wait_with_output() => output?,
            _ = cancellation.cancelled() => return Err(ShellError::Cancelled),
        };

        if !output.status.success() {
            return Err(ShellError::ExitStatus {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
