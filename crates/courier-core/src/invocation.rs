use serde::{Deserialize, Serialize};

/// An MCP server to expose to the assistant process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct McpServer {
    /// Server name (used as the key in Claude settings).
    pub name: String,
    /// Command to launch the server.
    pub command: String,
    /// Command-line arguments.
    pub args: Vec<String>,
}

/// Parameters for one assistant process invocation.
///
/// The dispatcher assembles this from the active persona, its session
/// token, and the inbound text; the provider turns it into CLI arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// Free-text prompt, passed as the final CLI argument.
    pub prompt: String,
    /// Conversation-continuation token for the active persona.
    pub session_token: String,
    /// Whether the token names an existing conversation to resume.
    /// False means the token was freshly minted for this invocation.
    #[serde(default)]
    pub resume: bool,
    /// Persona system prompt; empty = none.
    #[serde(default)]
    pub system_prompt: String,
    /// Model selector; empty = let the CLI decide.
    #[serde(default)]
    pub model: String,
    /// MCP servers to activate for this request.
    #[serde(default)]
    pub mcp_servers: Vec<McpServer>,
}

impl Invocation {
    /// Create an invocation with just a prompt and a session token.
    pub fn new(prompt: &str, session_token: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            session_token: session_token.to_string(),
            resume: false,
            system_prompt: String::new(),
            model: String::new(),
            mcp_servers: Vec::new(),
        }
    }
}
