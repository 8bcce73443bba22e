//! Claude Code CLI provider.
//!
//! Uses the locally installed `claude` CLI as a subprocess.
//! Zero API keys needed — relies on the user's existing `claude` authentication.

mod command;
mod mcp;
mod provider;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

pub(crate) use command::execute_with_timeout;
pub use mcp::mcp_tool_patterns;

/// Default timeout for the Claude Code CLI subprocess (5 minutes).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Claude Code CLI provider configuration.
pub struct ClaudeCodeProvider {
    /// Subprocess timeout.
    timeout: Duration,
    /// Working directory for the CLI subprocess, created when missing.
    working_dir: PathBuf,
}

impl ClaudeCodeProvider {
    /// Create a new Claude Code provider with default settings, running in
    /// the current directory.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            working_dir: PathBuf::from("."),
        }
    }

    /// Create a provider from config values.
    pub fn from_config(timeout_secs: u64, working_dir: PathBuf) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            working_dir,
        }
    }

    pub fn working_dir(&self) -> &PathBuf {
        &self.working_dir
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    /// Check if the `claude` CLI is installed and accessible.
    pub async fn check_cli() -> bool {
        Command::new("claude")
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for ClaudeCodeProvider {
    fn default() -> Self {
        Self::new()
    }
}
