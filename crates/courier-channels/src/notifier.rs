//! Audit side-channel: mirrors accepted requests through a second bot.
//!
//! Gives the operator a live feed of everything the bridge was asked to do,
//! on a separate chat so it survives even when the primary bot panics
//! mid-conversation. Strictly best-effort: every failure is logged and
//! swallowed, the requester never sees it.

use chrono::Local;
use std::time::Duration;
use tracing::{debug, warn};

use courier_core::config::NotifierConfig;

const PREVIEW_CHARS: usize = 200;

/// Mirrors one card per accepted request to a secondary Telegram bot.
#[derive(Clone)]
pub struct RequestMirror {
    token: String,
    chat_id: i64,
    client: reqwest::Client,
}

impl RequestMirror {
    pub fn new(config: &NotifierConfig) -> Self {
        Self {
            token: config.bot_token.clone(),
            chat_id: config.chat_id,
            client: reqwest::Client::new(),
        }
    }

    /// The mirror stays silent unless both token and chat id are configured.
    pub fn is_enabled(&self) -> bool {
        !self.token.is_empty() && self.chat_id != 0
    }

    /// Fire one audit card. Never returns an error.
    pub async fn notify(&self, user: &str, kind: &str, content: &str, agent: &str) {
        if !self.is_enabled() {
            debug!("audit mirror not configured, skipping");
            return;
        }

        let time = Local::now().format("%H:%M:%S").to_string();
        let text = format_card(user, kind, content, agent, &time);

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        match self
            .client
            .post(&url)
            .json(&payload)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                debug!(kind, "mirrored request to audit bot");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("audit bot rejected notification: {body}");
            }
            Err(e) => {
                warn!("audit bot unreachable: {e}");
            }
        }
    }
}

fn format_card(user: &str, kind: &str, content: &str, agent: &str, time: &str) -> String {
    let preview: String = if content.is_empty() {
        "(empty)".to_string()
    } else {
        content.chars().take(PREVIEW_CHARS).collect()
    };

    format!(
        "📋 Request\n👤 @{}\n📌 {kind}\n💬 {preview}\n🤖 Agent: {agent}\n🕐 {time}",
        user.trim_start_matches('@')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_contains_all_fields() {
        let card = format_card("ada", "claude", "fix the build", "Developer", "12:34:56");
        assert!(card.starts_with("📋 Request\n"));
        assert!(card.contains("👤 @ada"));
        assert!(card.contains("📌 claude"));
        assert!(card.contains("💬 fix the build"));
        assert!(card.contains("🤖 Agent: Developer"));
        assert!(card.contains("🕐 12:34:56"));
    }

    #[test]
    fn test_card_does_not_double_at_sign() {
        let card = format_card("@ada", "bash", "ls", "Standard", "00:00:00");
        assert!(card.contains("👤 @ada"));
        assert!(!card.contains("@@"));
    }

    #[test]
    fn test_card_truncates_preview() {
        let long = "x".repeat(500);
        let card = format_card("ada", "text", &long, "Standard", "00:00:00");
        assert!(card.contains(&"x".repeat(PREVIEW_CHARS)));
        assert!(!card.contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[test]
    fn test_card_truncation_respects_char_boundaries() {
        let long = "ü".repeat(300);
        let card = format_card("ada", "text", &long, "Standard", "00:00:00");
        assert!(card.contains(&"ü".repeat(PREVIEW_CHARS)));
    }

    #[test]
    fn test_card_empty_content_placeholder() {
        let card = format_card("ada", "photo", "", "Standard", "00:00:00");
        assert!(card.contains("💬 (empty)"));
    }

    #[test]
    fn test_mirror_disabled_without_config() {
        let mirror = RequestMirror::new(&NotifierConfig::default());
        assert!(!mirror.is_enabled());

        let mirror = RequestMirror::new(&NotifierConfig {
            bot_token: "tok".to_string(),
            chat_id: 0,
        });
        assert!(!mirror.is_enabled());

        let mirror = RequestMirror::new(&NotifierConfig {
            bot_token: "tok".to_string(),
            chat_id: 42,
        });
        assert!(mirror.is_enabled());
    }

    #[tokio::test]
    async fn test_notify_disabled_is_silent_noop() {
        let mirror = RequestMirror::new(&NotifierConfig::default());
        // Must not panic or attempt network I/O.
        mirror.notify("ada", "claude", "hello", "Standard").await;
    }
}
