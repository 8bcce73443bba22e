use crate::{
    error::CourierError,
    invocation::Invocation,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Assistant provider trait — the brain.
///
/// Anything that can turn a built [`Invocation`] into a text answer
/// implements this trait. In production that is the `claude` CLI subprocess.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Run one invocation to completion and return the captured answer.
    async fn invoke(&self, invocation: &Invocation) -> Result<OutgoingMessage, CourierError>;

    /// Check if the provider is available and ready.
    async fn is_available(&self) -> bool;
}

/// Messaging channel trait — the nervous system.
///
/// The messaging platform (Telegram) implements this trait to receive
/// and send messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, CourierError>;

    /// Send a response back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), CourierError>;

    /// Send a typing indicator to show the bot is processing.
    async fn send_typing(&self, _target: &str) -> Result<(), CourierError> {
        Ok(())
    }

    /// Send a photo with a caption.
    async fn send_photo(
        &self,
        _target: &str,
        _image: &[u8],
        _caption: &str,
    ) -> Result<(), CourierError> {
        Ok(())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), CourierError>;
}

/// Out-of-band delivery for 2FA codes.
///
/// Separate from [`Channel`] on purpose: the code must never travel over
/// the chat transport it is meant to unlock.
#[async_trait]
pub trait CodeSender: Send + Sync {
    /// Deliver a freshly armed code to the operator.
    async fn send_code(&self, code: &str) -> Result<(), CourierError>;
}
