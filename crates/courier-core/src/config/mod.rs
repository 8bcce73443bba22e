mod agents;
mod defaults;

#[cfg(test)]
mod tests;

pub use agents::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CourierError;
use crate::invocation::McpServer;
use defaults::*;

/// Top-level Courier configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub courier: CourierConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub claude: ClaudeConfig,
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
}

/// General bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Script spawned detached by `/restart`; it kills this process and
    /// starts a fresh one.
    #[serde(default = "default_restart_script")]
    pub restart_script: String,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            restart_script: default_restart_script(),
        }
    }
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// The single authorized chat ID. Messages from any other chat are
    /// dropped without a response. 0 = unset.
    #[serde(default)]
    pub allowed_chat_id: i64,
}

/// SMTP settings for 2FA code delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username, also the From address.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Code recipient. Empty = send to the username address.
    #[serde(default)]
    pub recipient: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            recipient: String::new(),
        }
    }
}

/// Claude Code CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeConfig {
    /// Working directory for the CLI subprocess.
    #[serde(default = "default_workspace_dir")]
    pub working_dir: String,
    /// Subprocess timeout in seconds.
    #[serde(default = "default_claude_timeout_secs")]
    pub timeout_secs: u64,
    /// MCP servers written into the workspace Claude settings before
    /// every invocation.
    #[serde(default)]
    pub mcp_servers: Vec<McpServer>,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            working_dir: default_workspace_dir(),
            timeout_secs: default_claude_timeout_secs(),
            mcp_servers: Vec::new(),
        }
    }
}

/// `/bash` command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Shell command timeout in seconds.
    #[serde(default = "default_shell_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_shell_timeout_secs(),
        }
    }
}

/// Audit mirror settings — a second bot that receives one card per
/// accepted request. Disabled unless both fields are set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifierConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: i64,
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, CourierError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| CourierError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CourierError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
