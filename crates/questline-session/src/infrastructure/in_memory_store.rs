//! In-process implementation of the `SessionStore` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use questline_core::error::DomainError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::aggregates::Session;
use crate::domain::repository::{SessionAge, SessionStore};

/// Memory-backed session store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` when no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn put(&self, session: Session) -> Result<(), DomainError> {
        self.sessions.write().await.insert(session.id, session);
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.sessions.write().await.remove(&session_id).is_some())
    }

    async fn list_ages(&self) -> Result<Vec<SessionAge>, DomainError> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .map(|session| SessionAge {
                session_id: session.id,
                created_at: session.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use questline_narrative::domain::themes::Theme;
    use questline_test_support::fixed_now;

    use super::*;

    fn session() -> Session {
        Session::new(Uuid::new_v4(), Theme::SciFiSpace, "Vex", fixed_now())
    }

    #[tokio::test]
    async fn test_put_then_get_returns_copy() {
        let store = InMemorySessionStore::new();
        let session = session();

        store.put(session.clone()).await.unwrap();

        assert_eq!(store.get(session.id).await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_put_replaces_existing_session() {
        let store = InMemorySessionStore::new();
        let mut session = session();
        store.put(session.clone()).await.unwrap();

        session.turn_count = 7;
        store.put(session.clone()).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(session.id).await.unwrap().unwrap().turn_count, 7);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_session_existed() {
        let store = InMemorySessionStore::new();
        let session = session();
        store.put(session.clone()).await.unwrap();

        assert!(store.delete(session.id).await.unwrap());
        assert!(!store.delete(session.id).await.unwrap());
        assert!(store.get(session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ages_reports_creation_times() {
        let store = InMemorySessionStore::new();
        let session = session();
        store.put(session.clone()).await.unwrap();

        let ages = store.list_ages().await.unwrap();

        assert_eq!(
            ages,
            vec![SessionAge {
                session_id: session.id,
                created_at: fixed_now(),
            }]
        );
    }
}
