//! Background removal of expired sessions.

use std::time::Duration;

use questline_core::error::DomainError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::services::SessionServices;

/// Deletes every session older than the configured TTL.
///
/// Sessions with a transition in flight are skipped and picked up by a
/// later sweep. Returns how many sessions were removed.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store cannot be listed or a
/// delete fails.
pub async fn sweep_expired_sessions(services: &SessionServices) -> Result<usize, DomainError> {
    let now = services.clock.now();
    let ttl = services.config.session_ttl_delta();
    let mut removed = 0;

    for age in services.store.list_ages().await? {
        if now - age.created_at <= ttl {
            continue;
        }
        let Some(guard) = services.locks.try_acquire(age.session_id) else {
            debug!(session_id = %age.session_id, "session busy; skipping expiry");
            continue;
        };
        if services.store.delete(age.session_id).await? {
            removed += 1;
        }
        drop(guard);
        services.locks.forget(age.session_id);
    }

    Ok(removed)
}

/// Periodic expiry task.
#[derive(Debug)]
pub struct ExpirySweeper;

impl ExpirySweeper {
    /// Starts sweeping every `services.config.sweep_interval`.
    ///
    /// The first sweep runs immediately.
    #[must_use]
    pub fn spawn(services: SessionServices) -> SweeperHandle {
        let cancel = CancellationToken::new();
        let interval = services.config.sweep_interval.max(Duration::from_millis(1));
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match sweep_expired_sessions(&services).await {
                            Ok(0) => {}
                            Ok(removed) => info!(removed, "expired sessions removed"),
                            Err(err) => error!(error = %err, "session expiry sweep failed"),
                        }
                    }
                }
            }
            debug!("expiry sweeper stopped");
        });

        SweeperHandle { cancel, task }
    }
}

/// Owner of a running [`ExpirySweeper`].
#[derive(Debug)]
pub struct SweeperHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweeper and waits for it to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            warn!(error = %err, "expiry sweeper task failed");
        }
    }
}
