//! MCP server settings management for Claude Code CLI.
//!
//! Configured MCP servers are written into `.claude/settings.local.json` in
//! the workspace so the CLI subprocess picks them up. The file may also be
//! operator-managed, so existing keys are merged into rather than replaced.

use courier_core::{error::CourierError, invocation::McpServer};
use std::path::{Path, PathBuf};
use tracing::info;

/// Write MCP server configuration into `.claude/settings.local.json`.
///
/// Claude Code reads this file from `current_dir` on startup. The servers
/// and their tool allow-patterns are merged into existing settings; other
/// keys in the file are left untouched.
pub(super) fn write_mcp_settings(
    workspace: &Path,
    servers: &[McpServer],
) -> Result<PathBuf, CourierError> {
    let claude_dir = workspace.join(".claude");
    std::fs::create_dir_all(&claude_dir)
        .map_err(|e| CourierError::Provider(format!("failed to create .claude dir: {e}")))?;

    let path = claude_dir.join("settings.local.json");

    let mut root: serde_json::Map<String, serde_json::Value> = std::fs::read_to_string(&path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default();

    let mut mcp_servers = serde_json::Map::new();
    for srv in servers {
        let mut entry = serde_json::Map::new();
        entry.insert(
            "command".to_string(),
            serde_json::Value::String(srv.command.clone()),
        );
        entry.insert(
            "args".to_string(),
            serde_json::Value::Array(
                srv.args
                    .iter()
                    .map(|a| serde_json::Value::String(a.clone()))
                    .collect(),
            ),
        );
        mcp_servers.insert(srv.name.clone(), serde_json::Value::Object(entry));
    }
    root.insert(
        "mcpServers".to_string(),
        serde_json::Value::Object(mcp_servers),
    );
    root.insert(
        "enableAllProjectMcpServers".to_string(),
        serde_json::Value::Bool(true),
    );

    merge_allow_patterns(&mut root, servers);

    let json = serde_json::to_string_pretty(&root)
        .map_err(|e| CourierError::Provider(format!("failed to serialize MCP settings: {e}")))?;

    std::fs::write(&path, json)
        .map_err(|e| CourierError::Provider(format!("failed to write MCP settings: {e}")))?;

    info!("mcp: wrote settings to {}", path.display());
    Ok(path)
}

/// Union the `mcp__<name>__*` patterns into `permissions.allow`, keeping
/// whatever patterns the operator already granted.
fn merge_allow_patterns(
    root: &mut serde_json::Map<String, serde_json::Value>,
    servers: &[McpServer],
) {
    let permissions = root
        .entry("permissions".to_string())
        .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    if !permissions.is_object() {
        *permissions = serde_json::Value::Object(serde_json::Map::new());
    }
    let Some(permissions) = permissions.as_object_mut() else {
        return;
    };

    let allow = permissions
        .entry("allow".to_string())
        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
    if !allow.is_array() {
        *allow = serde_json::Value::Array(Vec::new());
    }
    let Some(allow) = allow.as_array_mut() else {
        return;
    };

    for pattern in mcp_tool_patterns(servers) {
        let value = serde_json::Value::String(pattern);
        if !allow.contains(&value) {
            allow.push(value);
        }
    }
}

/// Generate tool allow-patterns for MCP servers.
///
/// Each server gets a `mcp__<name>__*` wildcard pattern.
pub fn mcp_tool_patterns(servers: &[McpServer]) -> Vec<String> {
    servers
        .iter()
        .map(|s| format!("mcp__{}__*", s.name))
        .collect()
}
