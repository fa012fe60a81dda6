/// Error types for jitter-backoff
use thiserror::Error;

/// Main error type for backoff set-up
#[derive(Error, Debug)]
pub enum BackoffError {
    /// The OS entropy source could not seed the shared random source
    #[error("Entropy source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for convenience
pub type BackoffResult<T> = Result<T, BackoffError>;
