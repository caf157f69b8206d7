//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// None of these variants are produced after a partial state change: a
/// transition either commits completely or returns one of these.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller supplied missing or malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The session does not exist or has expired.
    #[error("session not found: {0}")]
    NotFound(Uuid),

    /// The narrative generator failed or returned an unusable turn.
    #[error("generation error: {0}")]
    Generation(String),

    /// A session store failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
