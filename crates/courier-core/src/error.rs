use thiserror::Error;

/// Top-level error type for Courier.
#[derive(Debug, Error)]
pub enum CourierError {
    /// Error from the assistant process.
    #[error("provider error: {0}")]
    Provider(String),

    /// The assistant process did not answer within the time bound.
    /// Carries the bound so the dispatcher can report it.
    #[error("provider timed out after {seconds}s")]
    ProviderTimeout { seconds: u64 },

    /// The assistant executable is not installed or not on PATH.
    #[error("executable not found: {program}")]
    ProviderNotFound { program: String },

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Error from the 2FA mail path.
    #[error("mail error: {0}")]
    Mail(String),

    /// Session store error.
    #[error("session error: {0}")]
    Session(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
