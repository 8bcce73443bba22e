//! Message processing pipeline — authorization, gate filter, dispatch.

use super::Gateway;
use crate::commands::Command;
use courier_auth::CodeCheck;
use courier_core::message::IncomingMessage;
use tracing::{info, warn};

/// Reply for any gated action attempted before verification.
const LOCKED_REPLY: &str =
    "🔒 Locked. Send the 2FA code in this chat, or /start to request a new one.";

impl Gateway {
    /// Process one incoming message through the full pipeline.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        let preview = if incoming.text.chars().count() > 60 {
            let truncated: String = incoming.text.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            incoming.text.clone()
        };
        info!(
            "[{}] {} says: {}",
            incoming.channel,
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            preview
        );

        // --- 1. AUTHORIZATION ---
        // Exactly one chat may talk to the bridge; everyone else is dropped
        // without a reply.
        if incoming.reply_target.as_deref() != Some(self.authorized_chat.as_str()) {
            warn!(
                "unauthorized access from {} (chat {})",
                incoming.sender_id,
                incoming.reply_target.as_deref().unwrap_or("-")
            );
            return;
        }

        let command = Command::parse(&incoming.text);

        // --- 2. GATE FILTER ---
        // While unverified, plain free text is a code submission and nothing
        // else. It never reaches the assistant.
        if command.is_none()
            && incoming.attachments.is_empty()
            && !self.gate.lock().await.is_verified()
        {
            if incoming.text.trim().is_empty() {
                return;
            }
            let response = self.check_code(&incoming.text).await;
            self.send_text(&incoming, &response).await;
            return;
        }

        // --- 3. DISPATCH ---
        match command {
            Some(cmd) => self.dispatch_command(&incoming, cmd).await,
            None if !incoming.attachments.is_empty() => self.handle_photo(&incoming).await,
            None => {
                if incoming.text.trim().is_empty() {
                    return;
                }
                self.ask_assistant(&incoming, &incoming.text, "text").await;
            }
        }
    }

    /// Route a parsed command to its handler. Everything but `/start`
    /// insists on a verified gate first.
    async fn dispatch_command(&self, incoming: &IncomingMessage, cmd: Command) {
        if !matches!(cmd, Command::Start) && !self.require_verified(incoming).await {
            return;
        }
        match cmd {
            Command::Start => {
                let response = self.handle_start().await;
                self.send_text(incoming, &response).await;
            }
            Command::Status => {
                let response = self.handle_status().await;
                self.send_text(incoming, &response).await;
            }
            Command::Agents => {
                let response = self.handle_agents().await;
                self.send_text(incoming, &response).await;
            }
            Command::Agent(id) => {
                let response = self.handle_switch_agent(&id).await;
                self.send_text(incoming, &response).await;
            }
            Command::New => {
                let response = self.handle_reset().await;
                self.send_text(incoming, &response).await;
            }
            Command::Claude(prompt) => {
                if prompt.is_empty() {
                    self.send_text(incoming, "Usage: /claude <prompt>").await;
                    return;
                }
                self.ask_assistant(incoming, &prompt, "claude").await;
            }
            Command::Bash(command) => {
                if command.is_empty() {
                    self.send_text(incoming, "Usage: /bash <command>").await;
                    return;
                }
                self.run_shell(incoming, &command).await;
            }
            Command::Restart => self.handle_restart(incoming).await,
            Command::Unknown(cmd) => {
                self.send_text(incoming, &format!("Unknown command: {cmd}"))
                    .await;
            }
        }
    }

    /// Gate re-check inside the dispatch path. Sends the locked reply and
    /// returns false when the gate is still closed.
    pub(super) async fn require_verified(&self, incoming: &IncomingMessage) -> bool {
        if self.gate.lock().await.is_verified() {
            return true;
        }
        self.send_text(incoming, LOCKED_REPLY).await;
        false
    }

    /// Try the message text as a 2FA code and describe the outcome.
    async fn check_code(&self, input: &str) -> String {
        match self.gate.lock().await.check(input) {
            CodeCheck::Verified => "✅ Verified. You can use the bot now.",
            CodeCheck::WrongCode => "❌ Wrong code.",
            CodeCheck::Expired => "⏰ Code expired. Send /start to request a new one.",
        }
        .to_string()
    }
}
