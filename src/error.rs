/// Domain-specific error types for the auction service.
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("Transport operation failed: {0}")]
    Transport(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // Deliberately carries no detail about which sub-step failed.
    #[error("Authentication failed")]
    Unauthenticated,

    #[error("State transfer failed: {0}")]
    StateTransfer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias.
pub type AuctionResult<T> = Result<T, AuctionError>;
