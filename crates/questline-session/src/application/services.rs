//! Engine configuration and the dependencies shared by every handler.

use std::sync::Arc;
use std::time::Duration;

use questline_core::clock::Clock;
use questline_narrative::domain::context_window::WindowPolicy;
use questline_narrative::domain::generator::NarrativeGenerator;

use super::locks::SessionLocks;
use crate::domain::repository::SessionStore;

/// Default lifetime of a session, measured from creation.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default pause between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Default upper bound on a single generator call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(90);

/// Tunables for the session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Context window and pacing policy.
    pub window: WindowPolicy,
    /// How long a session lives after creation.
    pub session_ttl: Duration,
    /// How often the expiry sweeper runs.
    pub sweep_interval: Duration,
    /// Timeout applied to each generator call.
    pub generation_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowPolicy::default(),
            session_ttl: DEFAULT_SESSION_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Turn budget used for pacing and the ending window.
    #[must_use]
    pub fn turn_budget(&self) -> u32 {
        self.window.turn_budget
    }

    /// Session TTL as a calendar duration.
    #[must_use]
    pub fn session_ttl_delta(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::MAX)
    }
}

/// Everything a session handler needs. Cheap to clone.
#[derive(Clone)]
pub struct SessionServices {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Session storage.
    pub store: Arc<dyn SessionStore>,
    /// Narrative generator.
    pub generator: Arc<dyn NarrativeGenerator>,
    /// Per-session transition locks.
    pub locks: Arc<SessionLocks>,
    /// Engine tunables.
    pub config: EngineConfig,
}

impl SessionServices {
    /// Bundles the engine dependencies with a fresh lock registry.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn SessionStore>,
        generator: Arc<dyn NarrativeGenerator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            clock,
            store,
            generator,
            locks: Arc::new(SessionLocks::default()),
            config,
        }
    }
}

impl std::fmt::Debug for SessionServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionServices")
            .field("config", &self.config)
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}
