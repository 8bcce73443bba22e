//! Tests for the Claude Code CLI provider.

use super::command::cli_args;
use super::mcp;
use super::*;
use courier_core::{
    invocation::{Invocation, McpServer},
    traits::Provider,
};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_provider() {
    let provider = ClaudeCodeProvider::new();
    assert_eq!(provider.name(), "claude-code");
    assert_eq!(provider.timeout, Duration::from_secs(300));
    assert_eq!(provider.working_dir, PathBuf::from("."));
}

#[test]
fn test_from_config() {
    let dir = PathBuf::from("/home/user/.courier/workspace");
    let provider = ClaudeCodeProvider::from_config(60, dir.clone());
    assert_eq!(provider.timeout, Duration::from_secs(60));
    assert_eq!(provider.working_dir, dir);
    assert_eq!(provider.timeout_secs(), 60);
}

// --- argument assembly ---

#[test]
fn test_cli_args_fresh_session() {
    let invocation = Invocation::new("hello", "tok-1");
    let args = cli_args(&invocation);
    assert_eq!(
        args,
        vec![
            "--print",
            "--session-id",
            "tok-1",
            "--dangerously-skip-permissions",
            "hello",
        ]
    );
}

#[test]
fn test_cli_args_resume_session() {
    let mut invocation = Invocation::new("hello", "tok-1");
    invocation.resume = true;
    let args = cli_args(&invocation);
    assert_eq!(args[1], "--resume");
    assert_eq!(args[2], "tok-1");
}

#[test]
fn test_cli_args_persona_fields() {
    let mut invocation = Invocation::new("review this", "tok-2");
    invocation.system_prompt = "You are a reviewer.".into();
    invocation.model = "opus".into();
    let args = cli_args(&invocation);

    let sp = args.iter().position(|a| a == "--append-system-prompt");
    let model = args.iter().position(|a| a == "--model");
    assert!(sp.is_some());
    assert_eq!(args[sp.unwrap() + 1], "You are a reviewer.");
    assert!(model.is_some());
    assert_eq!(args[model.unwrap() + 1], "opus");
    assert_eq!(args.last().map(String::as_str), Some("review this"));
}

#[test]
fn test_cli_args_empty_persona_fields_omitted() {
    let invocation = Invocation::new("hi", "tok-3");
    let args = cli_args(&invocation);
    assert!(!args.iter().any(|a| a == "--append-system-prompt"));
    assert!(!args.iter().any(|a| a == "--model"));
}

#[test]
fn test_cli_args_prompt_is_last_even_when_flag_like() {
    let invocation = Invocation::new("--help", "tok-4");
    let args = cli_args(&invocation);
    assert_eq!(args.last().map(String::as_str), Some("--help"));
}

// --- MCP tests ---

#[test]
fn test_mcp_tool_patterns_empty() {
    assert!(mcp::mcp_tool_patterns(&[]).is_empty());
}

#[test]
fn test_mcp_tool_patterns() {
    let servers = vec![
        McpServer {
            name: "playwright".into(),
            command: "npx".into(),
            args: vec!["@playwright/mcp".into()],
        },
        McpServer {
            name: "postgres".into(),
            command: "npx".into(),
            args: vec!["@pg/mcp".into()],
        },
    ];
    let patterns = mcp::mcp_tool_patterns(&servers);
    assert_eq!(patterns, vec!["mcp__playwright__*", "mcp__postgres__*"]);
}

#[test]
fn test_write_mcp_settings_fresh_file() {
    let tmp = tempfile::tempdir().unwrap();

    let servers = vec![McpServer {
        name: "playwright".into(),
        command: "npx".into(),
        args: vec!["@playwright/mcp".into(), "--headless".into()],
    }];

    let path = mcp::write_mcp_settings(tmp.path(), &servers).unwrap();
    assert!(path.ends_with(".claude/settings.local.json"));

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    let srv = &parsed["mcpServers"]["playwright"];
    assert_eq!(srv["command"], "npx");
    assert_eq!(srv["args"][0], "@playwright/mcp");
    assert_eq!(srv["args"][1], "--headless");
    assert_eq!(parsed["enableAllProjectMcpServers"], true);
    assert_eq!(parsed["permissions"]["allow"][0], "mcp__playwright__*");
}

#[test]
fn test_write_mcp_settings_merges_existing_keys() {
    let tmp = tempfile::tempdir().unwrap();
    let claude_dir = tmp.path().join(".claude");
    std::fs::create_dir_all(&claude_dir).unwrap();
    std::fs::write(
        claude_dir.join("settings.local.json"),
        r#"{"permissions": {"allow": ["Bash(ls:*)"]}, "env": {"FOO": "bar"}}"#,
    )
    .unwrap();

    let servers = vec![McpServer {
        name: "postgres".into(),
        command: "npx".into(),
        args: vec![],
    }];
    let path = mcp::write_mcp_settings(tmp.path(), &servers).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    // Operator keys survive.
    assert_eq!(parsed["env"]["FOO"], "bar");
    let allow = parsed["permissions"]["allow"].as_array().unwrap();
    assert!(allow.contains(&serde_json::json!("Bash(ls:*)")));
    assert!(allow.contains(&serde_json::json!("mcp__postgres__*")));
}

#[test]
fn test_write_mcp_settings_idempotent_patterns() {
    let tmp = tempfile::tempdir().unwrap();
    let servers = vec![McpServer {
        name: "playwright".into(),
        command: "npx".into(),
        args: vec![],
    }];

    mcp::write_mcp_settings(tmp.path(), &servers).unwrap();
    let path = mcp::write_mcp_settings(tmp.path(), &servers).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let allow = parsed["permissions"]["allow"].as_array().unwrap();
    assert_eq!(
        allow
            .iter()
            .filter(|v| *v == &serde_json::json!("mcp__playwright__*"))
            .count(),
        1,
        "pattern must not duplicate across invocations"
    );
}

#[test]
fn test_write_mcp_settings_recovers_from_malformed_file() {
    let tmp = tempfile::tempdir().unwrap();
    let claude_dir = tmp.path().join(".claude");
    std::fs::create_dir_all(&claude_dir).unwrap();
    std::fs::write(claude_dir.join("settings.local.json"), "{ broken").unwrap();

    let servers = vec![McpServer {
        name: "playwright".into(),
        command: "npx".into(),
        args: vec![],
    }];
    let path = mcp::write_mcp_settings(tmp.path(), &servers).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(parsed["mcpServers"]["playwright"].is_object());
}
