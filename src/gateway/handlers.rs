//! Instant command handlers — replies built in-process, no provider call.

use super::Gateway;
use courier_core::config::AgentConfig;
use courier_core::message::IncomingMessage;
use tracing::{error, info};

impl Gateway {
    /// `/start` — greeting plus gate recovery. When unverified this re-arms
    /// the gate and mails a fresh code.
    pub(super) async fn handle_start(&self) -> String {
        if self.gate.lock().await.is_verified() {
            let agent = self.active_agent().await;
            return format!(
                "✅ Already verified. {} {} is listening — send a prompt or /status.",
                agent.emoji, agent.name
            );
        }
        match self.arm_and_send().await {
            Ok(()) => {
                "🔐 A new 2FA code has been sent to your email.\nEnter it here to unlock the bot."
                    .to_string()
            }
            Err(e) => format!(
                "⚠️ Could not send the code email: {e}\nThe code stays armed — check the server logs."
            ),
        }
    }

    /// `/status` — uptime, gate state, active persona, session presence.
    pub(super) async fn handle_status(&self) -> String {
        let elapsed = self.uptime.elapsed();
        let hours = elapsed.as_secs() / 3600;
        let minutes = (elapsed.as_secs() % 3600) / 60;
        let secs = elapsed.as_secs() % 60;

        let gate_state = {
            let gate = self.gate.lock().await;
            if gate.is_verified() {
                "✅ verified"
            } else if gate.is_expired() {
                "⏰ code expired (/start for a new one)"
            } else {
                "⏳ waiting for code"
            }
        };

        let agent = self.active_agent().await;
        let session = if self.sessions.contains(&agent.id).await {
            "active"
        } else {
            "none"
        };
        let model = if agent.model.is_empty() {
            "CLI default"
        } else {
            agent.model.as_str()
        };

        format!(
            "📊 Courier status\n\n\
             Uptime: {hours}h {minutes}m {secs}s\n\
             Gate: {gate_state}\n\
             Agent: {} {} ({})\n\
             Session: {session}\n\
             Model: {model}\n\
             Timeout: {}s",
            agent.emoji, agent.name, agent.id, self.claude_timeout_secs
        )
    }

    /// `/agents` — list configured personas, marking the active one.
    pub(super) async fn handle_agents(&self) -> String {
        let active = self.active_agent().await;
        if self.registry.is_empty() {
            return format!(
                "No agents configured — using the built-in default.\n▸ {} {} ({})",
                active.emoji, active.name, active.id
            );
        }
        let mut out = String::from("🤖 Agents:\n");
        for agent in self.registry.iter() {
            let marker = if agent.id == active.id { "▸" } else { " " };
            out.push_str(&format!(
                "\n{marker} {} {} ({})",
                agent.emoji, agent.name, agent.id
            ));
            if !agent.model.is_empty() {
                out.push_str(&format!(" — {}", agent.model));
            }
        }
        out.push_str("\n\nSwitch with /agent <id>.");
        out
    }

    /// `/agent <id>` — switch the active persona. The only mutator of the
    /// persona pointer.
    pub(super) async fn handle_switch_agent(&self, id: &str) -> String {
        if id.is_empty() {
            return format!("Usage: /agent <id>\nAvailable: {}", self.agent_ids());
        }
        match self.registry.get(id) {
            Some(agent) => {
                *self.agent_pointer.lock().await = Some(agent.id.clone());
                info!(agent = %agent.id, "switched active agent");
                format!("{} {} is now active.", agent.emoji, agent.name)
            }
            None => format!("Unknown agent: {id}\nAvailable: {}", self.agent_ids()),
        }
    }

    /// `/new` — drop the active persona's session token.
    pub(super) async fn handle_reset(&self) -> String {
        let agent = self.active_agent().await;
        match self.sessions.reset(&agent.id).await {
            Ok(true) => format!(
                "🆕 Session for {} {} reset. The next message starts a fresh conversation.",
                agent.emoji, agent.name
            ),
            Ok(false) => format!(
                "No stored session for {} {} — the next message starts fresh anyway.",
                agent.emoji, agent.name
            ),
            Err(e) => {
                error!("session reset failed: {e}");
                format!("Could not reset the session: {e}")
            }
        }
    }

    /// `/restart` — announce, then hand over to the restart script. The
    /// script runs detached; an external supervisor brings the process back.
    pub(super) async fn handle_restart(&self, incoming: &IncomingMessage) {
        self.send_text(incoming, "♻️ Restarting...").await;
        info!("restart requested, spawning {}", self.restart_script);
        if let Err(e) = tokio::process::Command::new(&self.restart_script).spawn() {
            error!("restart script failed to launch: {e}");
            self.send_text(incoming, &format!("Restart script failed to launch: {e}"))
                .await;
        }
    }

    /// Resolve the active persona from the pointer.
    pub(super) async fn active_agent(&self) -> AgentConfig {
        let pointer = self.agent_pointer.lock().await;
        self.registry.resolve(pointer.as_deref())
    }

    fn agent_ids(&self) -> String {
        if self.registry.is_empty() {
            return "default".to_string();
        }
        self.registry
            .iter()
            .map(|a| a.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
