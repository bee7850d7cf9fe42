//! Outcome waiter
//!
//! Turns a concurrently updating burst into one yes/no answer. The waiter
//! polls the shared counter instead of subscribing to attempts: only the
//! first success matters, so a fixed poll interval bounds the added latency
//! without any per-attempt fan-in.

use std::time::Duration;

use tokio::time::Instant;

use super::dispatcher::DispatchHandle;

/// Default time to wait for a success
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default delay between counter checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long and how often to poll a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Give up before the deadline once every attempt has failed
    pub exit_when_all_failed: bool,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            exit_when_all_failed: false,
        }
    }
}

/// Wait for the first successful attempt of a burst
///
/// Returns `true` as soon as any attempt succeeded. Returns `false` once the
/// timeout elapsed without a success, or earlier when
/// `exit_when_all_failed` is set and every attempt has reported a failure.
pub async fn await_outcome(handle: &DispatchHandle, policy: &WaitPolicy) -> bool {
    let deadline = Instant::now() + policy.timeout;
    let poll_interval = policy.poll_interval.max(Duration::from_millis(1));

    loop {
        let snap = handle.snapshot();

        if snap.successes > 0 {
            tracing::debug!(?snap, "burst succeeded");
            return true;
        }

        if policy.exit_when_all_failed && snap.outstanding() == 0 {
            tracing::debug!(?snap, "every attempt failed");
            return false;
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(?snap, "burst timed out");
            return false;
        }

        tokio::time::sleep(poll_interval.min(deadline - now)).await;
    }
}
