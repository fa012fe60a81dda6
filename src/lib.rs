//! Exponential backoff with full jitter for retry loops.
//!
//! The caller owns the retry loop: it asks a [`Backoff`] how long to wait
//! after each failure and resets it on success.

pub mod backoff;
pub mod config;
pub mod defaults;
pub mod error;
pub mod jitter;
pub mod logging;

// Re-export commonly used types for convenience
pub use backoff::Backoff;
pub use config::{BackoffConfig, Config, DefaultsConfig, LoggingConfig};
pub use error::{BackoffError, BackoffResult};
pub use jitter::{JitterSource, SharedRng};
