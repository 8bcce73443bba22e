//! Message sending: text, photos, chat actions, and command registration.

use super::TelegramChannel;
use crate::utils::split_message;
use courier_core::error::CourierError;
use tracing::{info, warn};

/// Chunk size for outbound text, a safety margin under Telegram's 4096 cap.
pub(crate) const MAX_MESSAGE_LEN: usize = 4000;

impl TelegramChannel {
    /// Send a text message to a specific chat, chunked to the platform limit.
    pub(crate) async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), CourierError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);

        for chunk in chunks {
            let url = format!("{}/sendMessage", self.base_url);
            let body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
                "parse_mode": "Markdown",
            });

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| CourierError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                if error_text.contains("can't parse entities") {
                    warn!("Markdown parse failed, retrying as plain text: {error_text}");
                    let plain_body = serde_json::json!({
                        "chat_id": chat_id,
                        "text": chunk,
                    });
                    let plain_resp = self
                        .client
                        .post(format!("{}/sendMessage", self.base_url))
                        .json(&plain_body)
                        .send()
                        .await
                        .map_err(|e| {
                            CourierError::Channel(format!("telegram send (plain) failed: {e}"))
                        })?;
                    if !plain_resp.status().is_success() {
                        let plain_err = plain_resp.text().await.unwrap_or_default();
                        return Err(CourierError::Channel(format!(
                            "telegram send (plain fallback) failed: {plain_err}"
                        )));
                    }
                } else {
                    return Err(CourierError::Channel(format!(
                        "telegram send failed ({status}): {error_text}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Send a photo (JPEG bytes) with a caption to a chat.
    pub(crate) async fn send_photo_bytes(
        &self,
        chat_id: i64,
        image: &[u8],
        caption: &str,
    ) -> Result<(), CourierError> {
        let url = format!("{}/sendPhoto", self.base_url);

        let part = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name("photo.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| CourierError::Channel(format!("mime error: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", part);

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CourierError::Channel(format!("telegram sendPhoto failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(CourierError::Channel(format!(
                "telegram sendPhoto failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "start", "description": "Start the bot / request a 2FA code" },
                { "command": "status", "description": "Bot status" },
                { "command": "agents", "description": "List personas" },
                { "command": "agent", "description": "Switch persona" },
                { "command": "new", "description": "Reset the current conversation" },
                { "command": "claude", "description": "Send a message to Claude Code" },
                { "command": "bash", "description": "Run a shell command" },
                { "command": "restart", "description": "Restart the bot" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }

    /// Send a chat action (e.g. "typing") to a chat.
    pub(crate) async fn send_chat_action(
        &self,
        chat_id: i64,
        action: &str,
    ) -> Result<(), CourierError> {
        let url = format!("{}/sendChatAction", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "action": action,
        });

        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CourierError::Channel(format!("telegram sendChatAction failed: {e}")))?;

        Ok(())
    }
}
