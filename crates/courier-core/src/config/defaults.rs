//! Default values for configuration fields.

pub fn default_data_dir() -> String {
    "~/.courier".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_restart_script() -> String {
    "./start.sh".to_string()
}

pub fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

pub fn default_smtp_port() -> u16 {
    587
}

pub fn default_workspace_dir() -> String {
    "~/.courier/workspace".to_string()
}

pub fn default_claude_timeout_secs() -> u64 {
    300
}

pub fn default_shell_timeout_secs() -> u64 {
    120
}

pub fn default_agent_id() -> String {
    "default".to_string()
}
