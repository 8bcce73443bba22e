use super::*;

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.courier.data_dir, "~/.courier");
    assert_eq!(config.courier.log_level, "info");
    assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
    assert_eq!(config.mail.smtp_port, 587);
    assert_eq!(config.claude.timeout_secs, 300);
    assert_eq!(config.shell.timeout_secs, 120);
    assert_eq!(config.telegram.allowed_chat_id, 0);
    assert!(config.notifier.bot_token.is_empty());
    assert_eq!(config.agents.default, "default");
    assert!(config.agents.list.is_empty());
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
        [telegram]
        bot_token = "tok:EN"
        allowed_chat_id = 42

        [mail]
        username = "bot@example.com"
        password = "hunter2"

        [claude]
        timeout_secs = 60

        [[agents.list]]
        id = "dev"
        name = "Developer"
        emoji = "🔧"
        system_prompt = "You are a developer."
        model = "opus"
    "#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.telegram.bot_token, "tok:EN");
    assert_eq!(config.telegram.allowed_chat_id, 42);
    assert_eq!(config.mail.username, "bot@example.com");
    assert_eq!(config.mail.recipient, "", "recipient falls back to username");
    assert_eq!(config.claude.timeout_secs, 60);
    assert_eq!(config.agents.list.len(), 1);
    assert_eq!(config.agents.list[0].id, "dev");
    assert_eq!(config.agents.list[0].model, "opus");
}

#[test]
fn test_agent_config_partial_toml() {
    let toml_str = r#"
        id = "min"
        name = "Minimal"
    "#;
    let agent: AgentConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(agent.emoji, "🤖");
    assert!(agent.system_prompt.is_empty());
    assert!(agent.model.is_empty());
}

#[test]
fn test_registry_preserves_listing_order() {
    let toml_str = r#"
        [[list]]
        id = "b"
        name = "Bravo"

        [[list]]
        id = "a"
        name = "Alpha"
    "#;
    let config: AgentsConfig = toml::from_str(toml_str).unwrap();
    let registry = AgentRegistry::new(config);
    let ids: Vec<&str> = registry.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn test_registry_resolve_pointer() {
    let registry = AgentRegistry::new(AgentsConfig {
        default: "a".to_string(),
        list: vec![
            AgentConfig {
                id: "a".to_string(),
                name: "Alpha".to_string(),
                emoji: "🅰️".to_string(),
                system_prompt: String::new(),
                model: String::new(),
            },
            AgentConfig {
                id: "b".to_string(),
                name: "Bravo".to_string(),
                emoji: "🅱️".to_string(),
                system_prompt: String::new(),
                model: String::new(),
            },
        ],
    });
    assert_eq!(registry.resolve(Some("b")).name, "Bravo");
    assert_eq!(registry.resolve(None).name, "Alpha", "falls back to default");
    assert_eq!(
        registry.resolve(Some("gone")).name,
        "Alpha",
        "stale pointer falls back to default"
    );
}

#[test]
fn test_registry_resolve_first_when_default_missing() {
    let registry = AgentRegistry::new(AgentsConfig {
        default: "missing".to_string(),
        list: vec![AgentConfig {
            id: "only".to_string(),
            name: "Only".to_string(),
            emoji: "🤖".to_string(),
            system_prompt: String::new(),
            model: String::new(),
        }],
    });
    assert_eq!(registry.resolve(None).id, "only");
}

#[test]
fn test_registry_resolve_builtin_when_empty() {
    let registry = AgentRegistry::new(AgentsConfig::default());
    let agent = registry.resolve(None);
    assert_eq!(agent.id, "default");
    assert_eq!(agent.name, "Standard");
    assert_eq!(agent.emoji, "🤖");
    assert!(agent.system_prompt.is_empty());
    assert!(agent.model.is_empty(), "built-in persona uses the CLI default model");
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let config = load("/nonexistent/courier-config.toml").unwrap();
    assert_eq!(config.courier.data_dir, "~/.courier");
    assert!(config.telegram.bot_token.is_empty());
}

#[test]
fn test_load_rejects_invalid_toml() {
    let tmp = std::env::temp_dir().join("__courier_test_bad_config__.toml");
    std::fs::write(&tmp, "this is not toml [[[").unwrap();
    let err = load(tmp.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config"));
    let _ = std::fs::remove_file(&tmp);
}

#[test]
fn test_shellexpand_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let expanded = shellexpand("~/.courier");
        assert_eq!(expanded, format!("{}/.courier", home.to_string_lossy()));
    }
    assert_eq!(shellexpand("/absolute/path"), "/absolute/path");
    assert_eq!(shellexpand("relative/path"), "relative/path");
}
