//! Per-session transition locks.
//!
//! A session is advanced by at most one transition at a time. Different
//! sessions never contend: the registry mutex is only held long enough to
//! look up or insert a session's own lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Guard proving the holder is the only transition running on a session.
pub type SessionGuard = OwnedMutexGuard<()>;

/// Registry of one async mutex per session id.
#[derive(Debug, Default)]
pub struct SessionLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl SessionLocks {
    fn lock_for(&self, session_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(session_id).or_default())
    }

    /// Waits until no other transition holds `session_id`.
    pub async fn acquire(&self, session_id: Uuid) -> SessionGuard {
        self.lock_for(session_id).lock_owned().await
    }

    /// Takes the session's lock only if it is free right now.
    #[must_use]
    pub fn try_acquire(&self, session_id: Uuid) -> Option<SessionGuard> {
        self.lock_for(session_id).try_lock_owned().ok()
    }

    /// Drops the registry entry for a session that no longer exists.
    pub fn forget(&self, session_id: Uuid) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session_id);
    }

    /// Number of sessions with a registered lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when no locks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_try_acquire_fails_while_held() {
        let locks = SessionLocks::default();
        let id = Uuid::new_v4();

        let guard = locks.acquire(id).await;
        assert!(locks.try_acquire(id).is_none());

        drop(guard);
        assert!(locks.try_acquire(id).is_some());
    }

    #[tokio::test]
    async fn test_distinct_sessions_do_not_contend() {
        let locks = SessionLocks::default();

        let _a = locks.acquire(Uuid::new_v4()).await;
        let b = locks.try_acquire(Uuid::new_v4());

        assert!(b.is_some());
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_forget_removes_entry() {
        let locks = SessionLocks::default();
        let id = Uuid::new_v4();
        let _guard = locks.try_acquire(id);

        locks.forget(id);

        assert!(locks.is_empty());
    }
}
