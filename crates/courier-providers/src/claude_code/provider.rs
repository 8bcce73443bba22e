//! Provider trait implementation.

use super::{mcp, ClaudeCodeProvider};
use crate::output::combine_output;
use async_trait::async_trait;
use courier_core::{
    error::CourierError,
    invocation::Invocation,
    message::{MessageMetadata, OutgoingMessage},
    traits::Provider,
};
use std::time::Instant;
use tracing::{info, warn};

#[async_trait]
impl Provider for ClaudeCodeProvider {
    fn name(&self) -> &str {
        "claude-code"
    }

    async fn invoke(&self, invocation: &Invocation) -> Result<OutgoingMessage, CourierError> {
        let start = Instant::now();

        // Write MCP settings if any servers are declared. A failure here is
        // not fatal: the CLI still answers, just without those servers.
        if !invocation.mcp_servers.is_empty() {
            if let Err(e) = mcp::write_mcp_settings(&self.working_dir, &invocation.mcp_servers) {
                warn!("failed to write MCP settings: {e}");
            }
        }

        let output = self.run_cli(invocation).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let text = combine_output(&stdout, &stderr);

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            elapsed_ms,
            chars = text.len(),
            "claude answered"
        );

        Ok(OutgoingMessage {
            text,
            metadata: MessageMetadata {
                provider_used: "claude-code".to_string(),
                processing_time_ms: elapsed_ms,
                model: (!invocation.model.is_empty()).then(|| invocation.model.clone()),
            },
            reply_target: None,
        })
    }

    async fn is_available(&self) -> bool {
        Self::check_cli().await
    }
}
