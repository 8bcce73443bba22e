//! Shell command execution for the `/bash` command.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

use courier_core::error::CourierError;

use crate::claude_code::execute_with_timeout;
use crate::output::combine_output;

/// Runs one-off shell commands via `sh -c` under a hard timeout.
///
/// Unlike the assistant provider, a non-zero exit status is not an error:
/// whatever the command printed is the answer, and the exit code is logged.
pub struct ShellRunner {
    timeout: Duration,
    working_dir: PathBuf,
}

impl ShellRunner {
    pub fn new(timeout_secs: u64, working_dir: PathBuf) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            working_dir,
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run `command` and return its combined output.
    pub async fn run(&self, command: &str) -> Result<String, CourierError> {
        std::fs::create_dir_all(&self.working_dir).map_err(|e| {
            CourierError::Provider(format!(
                "failed to create working dir {}: {e}",
                self.working_dir.display()
            ))
        })?;

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd.current_dir(&self.working_dir);
        cmd.kill_on_drop(true);

        let output = execute_with_timeout(cmd, "sh", self.timeout).await?;

        let exit = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = combine_output(&stdout, &stderr);

        info!(exit, chars = combined.len(), "shell command finished");
        Ok(combined)
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(120, PathBuf::from("."))
    }
}
