//! CLI command building and subprocess execution.

use super::ClaudeCodeProvider;
use courier_core::error::CourierError;
use courier_core::invocation::Invocation;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

impl ClaudeCodeProvider {
    /// Run the claude CLI subprocess with a timeout.
    pub(super) async fn run_cli(
        &self,
        invocation: &Invocation,
    ) -> Result<std::process::Output, CourierError> {
        std::fs::create_dir_all(&self.working_dir).map_err(|e| {
            CourierError::Provider(format!(
                "failed to create working dir {}: {e}",
                self.working_dir.display()
            ))
        })?;

        let mut cmd = self.base_command();
        cmd.args(cli_args(invocation));

        debug!(
            resume = invocation.resume,
            "executing: claude --print ({} prompt chars)",
            invocation.prompt.len()
        );

        let output = execute_with_timeout(cmd, "claude", self.timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CourierError::Provider(format!(
                "claude exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output)
    }

    /// Build the base `Command` with working directory and environment.
    fn base_command(&self) -> Command {
        let mut cmd = Command::new("claude");
        cmd.current_dir(&self.working_dir);
        // Remove CLAUDECODE env var so the CLI doesn't think it's nested.
        cmd.env_remove("CLAUDECODE");
        // A timed-out child is killed, not orphaned.
        cmd.kill_on_drop(true);
        cmd
    }
}

/// Assemble the CLI argument list for an invocation. The prompt is always
/// the final argument.
pub(super) fn cli_args(invocation: &Invocation) -> Vec<String> {
    let mut args = vec!["--print".to_string()];

    // Session continuity: a freshly minted token opens a conversation under
    // that id, a known token resumes the existing one.
    if invocation.resume {
        args.push("--resume".to_string());
    } else {
        args.push("--session-id".to_string());
    }
    args.push(invocation.session_token.clone());

    // Non-interactive mode cannot prompt for tool approval.
    args.push("--dangerously-skip-permissions".to_string());

    if !invocation.system_prompt.is_empty() {
        args.push("--append-system-prompt".to_string());
        args.push(invocation.system_prompt.clone());
    }
    if !invocation.model.is_empty() {
        args.push("--model".to_string());
        args.push(invocation.model.clone());
    }

    args.push(invocation.prompt.clone());
    args
}

/// Run a command under a hard timeout, mapping the failure modes the
/// dispatcher distinguishes: timeout, missing executable, everything else.
pub(crate) async fn execute_with_timeout(
    mut cmd: Command,
    program: &str,
    timeout: Duration,
) -> Result<std::process::Output, CourierError> {
    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| CourierError::ProviderTimeout {
            seconds: timeout.as_secs(),
        })?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CourierError::ProviderNotFound {
                    program: program.to_string(),
                }
            } else {
                CourierError::Provider(format!("failed to run {program}: {e}"))
            }
        })?;

    Ok(output)
}
