//! Session store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use questline_core::error::DomainError;
use uuid::Uuid;

use super::aggregates::Session;

/// Creation time of a stored session, used by the expiry sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionAge {
    /// The session identifier.
    pub session_id: Uuid,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// Keyed storage for sessions. Backends are swappable; the engine only
/// needs these four operations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session by id.
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>, DomainError>;

    /// Insert or replace a session.
    async fn put(&self, session: Session) -> Result<(), DomainError>;

    /// Remove a session. Returns `true` if it existed.
    async fn delete(&self, session_id: Uuid) -> Result<bool, DomainError>;

    /// List every stored session with its creation time.
    async fn list_ages(&self) -> Result<Vec<SessionAge>, DomainError>;
}
