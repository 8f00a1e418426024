// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job that runs a shell command

use async_trait::async_trait;
use jr_core::{CancellationToken, Job, JobError};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Runs `sh -c <command>`. A non-zero exit is a failure carrying the last
/// line the command wrote to stderr; cancellation kills the child.
#[derive(Debug, Clone)]
pub struct ShellJob {
    name: String,
    command: String,
    cwd: Option<PathBuf>,
}

impl ShellJob {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl Job for ShellJob {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, cancel: CancellationToken) -> Result<(), JobError> {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        let mut child = command
            .spawn()
            .map_err(|e| JobError::failed(format!("spawn failed: {}", e)))?;
        tracing::debug!(job = %self.name, pid = child.id(), "spawned");

        // Drain stderr concurrently so a chatty command cannot block on a full pipe
        let stderr = child.stderr.take();
        let reader = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut buf).await;
            }
            buf
        });

        let status = tokio::select! {
            status = child.wait() => status.map_err(|e| JobError::failed(e.to_string()))?,
            _ = cancel.cancelled() => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(job = %self.name, error = %e, "kill failed (may be expected)");
                }
                reader.abort();
                return Err(JobError::Cancelled);
            }
        };

        if status.success() {
            return Ok(());
        }

        let stderr = reader.await.unwrap_or_default();
        let detail = last_line(&stderr);
        let message = match (status.code(), detail) {
            (Some(code), Some(line)) => format!("exit status {}: {}", code, line),
            (Some(code), None) => format!("exit status {}", code),
            (None, _) => "terminated by signal".to_string(),
        };
        Err(JobError::failed(message))
    }
}

fn last_line(output: &[u8]) -> Option<String> {
    String::from_utf8_lossy(output)
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
