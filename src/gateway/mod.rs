//! Gateway — the event loop connecting the chat channel to the providers.
//!
//! Includes: chat authorization, the 2FA gate filter, persona and session
//! resolution, command dispatch, and graceful shutdown.

mod handlers;
mod inbox;
mod invoke;
mod pipeline;


use courier_auth::TwoFactorGate;
use courier_channels::notifier::RequestMirror;
use courier_core::{
    config::{AgentRegistry, Config},
    error::CourierError,
    invocation::McpServer,
    message::{IncomingMessage, MessageMetadata, OutgoingMessage},
    traits::{Channel, CodeSender, Provider},
};
use courier_providers::ShellRunner;
use courier_sessions::SessionStore;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// The central gateway that routes messages between the channel and the
/// providers, behind authorization and the 2FA gate.
pub struct Gateway {
    pub(super) channel: Arc<dyn Channel>,
    pub(super) provider: Arc<dyn Provider>,
    pub(super) shell: ShellRunner,
    pub(super) code_sender: Arc<dyn CodeSender>,
    pub(super) gate: Mutex<TwoFactorGate>,
    pub(super) sessions: SessionStore,
    pub(super) registry: AgentRegistry,
    /// Active persona id. `None` until the first `/agent` switch; resolution
    /// then falls back along default → first listed → built-in.
    pub(super) agent_pointer: Mutex<Option<String>>,
    pub(super) mirror: RequestMirror,
    /// The single chat identity allowed to use the bridge.
    pub(super) authorized_chat: String,
    /// MCP servers handed to every assistant invocation.
    pub(super) mcp_servers: Vec<McpServer>,
    pub(super) restart_script: String,
    pub(super) workspace_dir: String,
    pub(super) claude_timeout_secs: u64,
    pub(super) uptime: Instant,
}

impl Gateway {
    /// Create a new gateway. The gate starts unarmed; [`run`](Self::run)
    /// arms it and mails the first code.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        channel: Arc<dyn Channel>,
        provider: Arc<dyn Provider>,
        shell: ShellRunner,
        code_sender: Arc<dyn CodeSender>,
        sessions: SessionStore,
        registry: AgentRegistry,
        mirror: RequestMirror,
        config: &Config,
    ) -> Self {
        Self {
            channel,
            provider,
            shell,
            code_sender,
            gate: Mutex::new(TwoFactorGate::new()),
            sessions,
            registry,
            agent_pointer: Mutex::new(None),
            mirror,
            authorized_chat: config.telegram.allowed_chat_id.to_string(),
            mcp_servers: config.claude.mcp_servers.clone(),
            restart_script: config.courier.restart_script.clone(),
            workspace_dir: config.claude.working_dir.clone(),
            claude_timeout_secs: config.claude.timeout_secs,
            uptime: Instant::now(),
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Courier gateway running | provider: {} | channel: {} | agents: {}",
            self.provider.name(),
            self.channel.name(),
            self.registry.len(),
        );

        // Drop photo leftovers from a previous run.
        inbox::purge_inbox(&self.workspace_dir);

        // Arm the gate and mail the first code before accepting traffic.
        let _ = self.arm_and_send().await;

        let mut rx = self.channel.start().await.map_err(|e| {
            anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name())
        })?;

        loop {
            tokio::select! {
                maybe = rx.recv() => match maybe {
                    Some(incoming) => {
                        let gw = self.clone();
                        tokio::spawn(async move {
                            gw.handle_message(incoming).await;
                        });
                    }
                    None => {
                        warn!("channel stream ended");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }
        info!("Shutdown complete.");
        Ok(())
    }

    /// Arm the gate with a fresh code and mail it out. A delivery failure is
    /// logged and returned but leaves the new code armed.
    pub(super) async fn arm_and_send(&self) -> Result<(), CourierError> {
        let code = self.gate.lock().await.arm();
        let result = self.code_sender.send_code(&code).await;
        if let Err(ref e) = result {
            warn!("2FA code delivery failed, code stays armed: {e}");
        }
        result
    }

    /// Send a plain text reply to the message's chat.
    pub(super) async fn send_text(&self, incoming: &IncomingMessage, text: &str) {
        let msg = OutgoingMessage {
            text: text.to_string(),
            metadata: MessageMetadata::default(),
            reply_target: incoming.reply_target.clone(),
        };
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to send message: {e}");
        }
    }
}
