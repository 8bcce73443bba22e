//! Provider invocation paths: assistant prompts, shell commands, photos.

use super::{inbox, Gateway};
use courier_core::error::CourierError;
use courier_core::invocation::Invocation;
use courier_core::message::IncomingMessage;
use std::time::Duration;
use tracing::{error, warn};

impl Gateway {
    /// Forward a prompt to the assistant under the active persona and relay
    /// the answer.
    pub(super) async fn ask_assistant(&self, incoming: &IncomingMessage, prompt: &str, kind: &str) {
        if !self.require_verified(incoming).await {
            return;
        }

        let agent = self.active_agent().await;
        let (token, created) = match self.sessions.get_or_create(&agent.id).await {
            Ok(pair) => pair,
            Err(e) => {
                error!("session lookup failed for {}: {e}", agent.id);
                self.send_text(incoming, "Session store failure — see the server logs.")
                    .await;
                return;
            }
        };

        self.mirror_request(incoming, kind, prompt, &agent.name);

        let invocation = Invocation {
            prompt: prompt.to_string(),
            session_token: token,
            resume: !created,
            system_prompt: agent.system_prompt.clone(),
            model: agent.model.clone(),
            mcp_servers: self.mcp_servers.clone(),
        };

        let typing = self.spawn_typing(incoming).await;
        let result = self.provider.invoke(&invocation).await;
        if let Some(handle) = typing {
            handle.abort();
        }

        match result {
            Ok(reply) => {
                let text = if reply.text.trim().is_empty() {
                    "(no output)".to_string()
                } else {
                    reply.text
                };
                self.send_text(incoming, &text).await;
            }
            Err(e) => {
                error!("assistant invocation failed: {e}");
                self.send_text(incoming, &failure_text(&e)).await;
            }
        }
    }

    /// `/bash` — run one shell command and relay its combined output.
    pub(super) async fn run_shell(&self, incoming: &IncomingMessage, command: &str) {
        let agent = self.active_agent().await;
        self.mirror_request(incoming, "bash", command, &agent.name);

        let typing = self.spawn_typing(incoming).await;
        let result = self.shell.run(command).await;
        if let Some(handle) = typing {
            handle.abort();
        }

        match result {
            Ok(output) => {
                let text = if output.trim().is_empty() {
                    "(no output)".to_string()
                } else {
                    output
                };
                self.send_text(incoming, &text).await;
            }
            Err(e) => {
                error!("shell command failed: {e}");
                self.send_text(incoming, &failure_text(&e)).await;
            }
        }
    }

    /// Photo message — save the image to the inbox, point the assistant at
    /// it, clean up afterwards.
    pub(super) async fn handle_photo(&self, incoming: &IncomingMessage) {
        if !self.require_verified(incoming).await {
            return;
        }

        let inbox_dir = inbox::ensure_inbox_dir(&self.workspace_dir);
        let paths = inbox::save_attachments(&inbox_dir, &incoming.attachments);
        if paths.is_empty() {
            warn!("photo message carried no saveable image");
            self.send_text(incoming, "Could not save the photo, sorry.")
                .await;
            return;
        }
        let _guard = inbox::InboxGuard::new(paths.clone());

        let caption = incoming.text.trim();
        let instruction = if caption.is_empty() || caption == "[Photo]" {
            "Analyze this image in detail. Describe what you see.".to_string()
        } else {
            format!("User instruction: {caption}")
        };
        let listing = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!("The user sent a photo, saved at:\n{listing}\n\n{instruction}");

        self.ask_assistant(incoming, &prompt, "photo").await;
        // _guard deletes the saved files here.
    }

    /// Fire the typing indicator and keep refreshing it every 5 seconds
    /// until the returned handle is aborted.
    async fn spawn_typing(&self, incoming: &IncomingMessage) -> Option<tokio::task::JoinHandle<()>> {
        let target = incoming.reply_target.clone()?;
        let channel = self.channel.clone();
        let _ = channel.send_typing(&target).await;
        Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(5)).await;
                if channel.send_typing(&target).await.is_err() {
                    break;
                }
            }
        }))
    }

    /// Fire one audit card on a detached task; the request never waits on it.
    fn mirror_request(&self, incoming: &IncomingMessage, kind: &str, content: &str, agent: &str) {
        let mirror = self.mirror.clone();
        let user = incoming
            .sender_name
            .clone()
            .unwrap_or_else(|| incoming.sender_id.clone());
        let kind = kind.to_string();
        let content = content.to_string();
        let agent = agent.to_string();
        tokio::spawn(async move {
            mirror.notify(&user, &kind, &content, &agent).await;
        });
    }
}

/// Map a provider failure to the user-facing line.
fn failure_text(err: &CourierError) -> String {
    match err {
        CourierError::ProviderTimeout { seconds } => format!(
            "⏱ Timed out after {seconds}s. Try a smaller request, or /new to reset the session."
        ),
        CourierError::ProviderNotFound { program } => {
            format!("Error: '{program}' is not installed on this machine.")
        }
        other => format!("Request failed: {other}"),
    }
}
