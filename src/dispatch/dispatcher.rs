//! Redundant command dispatcher
//!
//! The Hook bridge drops commands often enough that a single request is not
//! reliable. Instead of retrying sequentially, every control invocation fires
//! a burst of identical requests at once and counts how many were accepted.
//! The burst itself is the retry strategy: each attempt fires exactly once.
//!
//! Attempts run as detached tasks that are never joined or cancelled. They
//! may finish long after the invocation that spawned them has answered the
//! voice assistant; each task holds its own clone of the counter, so a late
//! completion only bumps a tally nobody reads anymore.
//!
//! Two limits keep abandoned attempts bounded:
//!
//! - a process-wide semaphore caps concurrent backend calls
//! - the backend client's request timeout caps how long any attempt lives
//!
//! An attempt that gets a permit straight away always fires. One that had to
//! queue for a permit first checks whether its burst still has a live
//! [`DispatchHandle`]; if every handle is gone the directive was already
//! answered, and the attempt gives its permit back without calling the
//! backend so stale bursts cannot starve newer ones.

use std::sync::{Arc, Weak};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::backend::{DeviceBackend, classify};
use super::counter::{AttemptResult, OutcomeCounter, OutcomeSnapshot};
use crate::devices::HookTarget;

/// Default burst size
pub const DEFAULT_ATTEMPTS: u32 = 10;

/// Default cap on concurrent backend calls across all invocations
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Handle on a running burst
///
/// Dropping every clone of the handle does not stop attempts already talking
/// to the backend, but attempts still queued for a permit are skipped.
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    action: String,
    counter: Arc<OutcomeCounter>,
    alive: Arc<()>,
}

impl DispatchHandle {
    /// Backend action this burst delivers
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Current tally of the burst
    #[must_use]
    pub fn snapshot(&self) -> OutcomeSnapshot {
        self.counter.snapshot()
    }
}

/// Fires bursts of attempts through a [`DeviceBackend`]
pub struct Dispatcher {
    backend: Arc<dyn DeviceBackend>,
    limiter: Arc<Semaphore>,
    max_in_flight: usize,
    attempts: u32,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("attempts", &self.attempts)
            .field("max_in_flight", &self.max_in_flight)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher with the default burst size and in-flight cap
    #[must_use]
    pub fn new(backend: Arc<dyn DeviceBackend>) -> Self {
        Self::with_limits(backend, DEFAULT_ATTEMPTS, DEFAULT_MAX_IN_FLIGHT)
    }

    /// Create a dispatcher with explicit limits
    ///
    /// Zero values are raised to one.
    #[must_use]
    pub fn with_limits(backend: Arc<dyn DeviceBackend>, attempts: u32, max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            backend,
            limiter: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            attempts: attempts.max(1),
        }
    }

    /// Configured burst size
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Backend calls currently holding a permit
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.limiter.available_permits()
    }

    /// Launch a burst of the configured size
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn dispatch(&self, target: &HookTarget, action: &str) -> DispatchHandle {
        self.dispatch_with_attempts(target, action, self.attempts)
    }

    /// Launch a burst of `attempts` attempts and return without waiting
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn dispatch_with_attempts(
        &self,
        target: &HookTarget,
        action: &str,
        attempts: u32,
    ) -> DispatchHandle {
        let attempts = attempts.max(1);
        let counter = Arc::new(OutcomeCounter::new(attempts));
        let alive = Arc::new(());
        let target = Arc::new(target.clone());
        let action: Arc<str> = Arc::from(action);

        tracing::debug!(
            hook_id = %target.hook_id,
            action = %action,
            attempts,
            "dispatching burst"
        );

        for attempt in 1..=attempts {
            let backend = Arc::clone(&self.backend);
            let limiter = Arc::clone(&self.limiter);
            let counter = Arc::clone(&counter);
            let target = Arc::clone(&target);
            let action = Arc::clone(&action);
            let alive = Arc::downgrade(&alive);

            // Never joined
            drop(tokio::spawn(async move {
                let Some(_permit) = acquire_permit(limiter, &alive).await else {
                    counter.record(AttemptResult::Failure);
                    tracing::debug!(
                        action = %action,
                        attempt,
                        "burst already answered, attempt skipped"
                    );
                    return;
                };

                let reply = backend.trigger(&target, &action).await;
                if let Err(e) = &reply {
                    tracing::debug!(attempt, error = %e, "attempt failed");
                }
                let result = classify(&reply);

                counter.record(result);
                tracing::info!(
                    action = %action,
                    attempt,
                    outcome = ?result,
                    "backend attempt finished"
                );
            }));
        }

        DispatchHandle {
            action: action.to_string(),
            counter,
            alive,
        }
    }
}

/// Take an in-flight permit for one attempt
///
/// Returns `None` when the attempt had to queue and its burst has no live
/// handle left by the time the permit arrives, or when the limiter closed.
async fn acquire_permit(
    limiter: Arc<Semaphore>,
    alive: &Weak<()>,
) -> Option<OwnedSemaphorePermit> {
    if let Ok(permit) = Arc::clone(&limiter).try_acquire_owned() {
        return Some(permit);
    }

    let permit = limiter.acquire_owned().await.ok()?;
    (alive.strong_count() > 0).then_some(permit)
}
