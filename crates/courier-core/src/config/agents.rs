//! Persona definitions for the assistant.
//!
//! Each persona bundles a display identity with the system prompt and
//! model handed to the CLI. Conversation state is kept per persona, so
//! switching personas never leaks context between them.

use serde::{Deserialize, Serialize};

use super::defaults::default_agent_id;

fn default_agent_emoji() -> String {
    "🤖".to_string()
}

/// A single configured persona.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Stable identifier, used for `/agent <id>` and session keying.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    #[serde(default = "default_agent_emoji")]
    pub emoji: String,
    /// System prompt passed to the CLI. Empty = none.
    #[serde(default)]
    pub system_prompt: String,
    /// Model override. Empty = CLI default.
    #[serde(default)]
    pub model: String,
}

/// `[agents]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Id of the persona used when none has been selected.
    #[serde(default = "default_agent_id")]
    pub default: String,
    /// Configured personas, in listing order.
    #[serde(default)]
    pub list: Vec<AgentConfig>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            default: default_agent_id(),
            list: Vec::new(),
        }
    }
}

/// Read-only persona lookup built from the config at startup.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentConfig>,
    default_id: String,
}

impl AgentRegistry {
    pub fn new(config: AgentsConfig) -> Self {
        Self {
            agents: config.list,
            default_id: config.default,
        }
    }

    /// The persona used when the config lists none.
    pub fn builtin_default() -> AgentConfig {
        AgentConfig {
            id: default_agent_id(),
            name: "Standard".to_string(),
            emoji: default_agent_emoji(),
            system_prompt: String::new(),
            model: String::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Personas in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentConfig> {
        self.agents.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Resolve the active persona.
    ///
    /// Falls back along pointer -> configured default -> first listed ->
    /// built-in, so resolution always yields a persona even when the
    /// pointer has gone stale or the config lists none.
    pub fn resolve(&self, pointer: Option<&str>) -> AgentConfig {
        if let Some(id) = pointer {
            if let Some(agent) = self.get(id) {
                return agent.clone();
            }
        }
        if let Some(agent) = self.get(&self.default_id) {
            return agent.clone();
        }
        if let Some(agent) = self.agents.first() {
            return agent.clone();
        }
        Self::builtin_default()
    }
}
