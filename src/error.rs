//! Error types for the expiry map
//!
//! Map operations never fail; only construction can be rejected.

use std::time::Duration;

use thiserror::Error;

// == Expiry Error Enum ==
/// Errors raised when building an [`ExpiryMap`](crate::ExpiryMap).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    /// Sweep interval must be strictly positive
    #[error("Invalid sweep interval: {0:?} (must be greater than zero)")]
    InvalidSweepInterval(Duration),

    /// No Tokio runtime to host the sweep task
    #[error("No Tokio runtime available to run the expiry sweep task")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the expiry map.
pub type Result<T> = std::result::Result<T, ExpiryError>;
