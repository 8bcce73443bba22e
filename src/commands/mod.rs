//! Chat command parsing.
//!
//! Commands carry their argument text so handlers never re-tokenize the
//! message. Free text (no `/` prefix) parses to `None` and goes to the
//! assistant instead.


/// Known bridge commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Status,
    Agents,
    Agent(String),
    New,
    Claude(String),
    Bash(String),
    Restart,
    /// A `/` prefix the bridge does not know. Carries the attempted command
    /// so the reply can echo it back.
    Unknown(String),
}

impl Command {
    /// Parse a command from message text. Returns `None` for anything that
    /// does not start with `/`.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let first = trimmed.split_whitespace().next()?;
        if !first.starts_with('/') {
            return None;
        }
        // Strip @botname suffix (e.g. "/status@courier_bot" → "/status").
        let cmd = first.split('@').next().unwrap_or(first);
        let args = trimmed[first.len()..].trim().to_string();
        match cmd {
            "/start" => Some(Self::Start),
            "/status" => Some(Self::Status),
            "/agents" => Some(Self::Agents),
            "/agent" => Some(Self::Agent(args)),
            "/new" => Some(Self::New),
            "/claude" => Some(Self::Claude(args)),
            "/bash" => Some(Self::Bash(args)),
            "/restart" => Some(Self::Restart),
            _ => Some(Self::Unknown(cmd.to_string())),
        }
    }
}
