//! Shared success/failure tally for one dispatch burst

use std::sync::atomic::{AtomicU32, Ordering};

/// Outcome of a single backend attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    Success,
    Failure,
}

/// Point-in-time view of an [`OutcomeCounter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeSnapshot {
    pub successes: u32,
    pub failures: u32,
    pub attempts: u32,
}

impl OutcomeSnapshot {
    /// Attempts that have not reported yet
    #[must_use]
    pub const fn outstanding(&self) -> u32 {
        self.attempts - self.successes - self.failures
    }
}

/// Tally updated concurrently by every attempt of a burst
///
/// `successes + failures` never exceeds `attempts` and neither tally is
/// ever decremented. Slots are reserved with a compare-and-swap on the
/// combined total so concurrent recorders cannot overshoot.
#[derive(Debug)]
pub struct OutcomeCounter {
    attempts: u32,
    recorded: AtomicU32,
    successes: AtomicU32,
    failures: AtomicU32,
}

impl OutcomeCounter {
    /// Create an empty counter for `attempts` attempts
    #[must_use]
    pub const fn new(attempts: u32) -> Self {
        Self {
            attempts,
            recorded: AtomicU32::new(0),
            successes: AtomicU32::new(0),
            failures: AtomicU32::new(0),
        }
    }

    /// Record one attempt outcome
    ///
    /// Returns false if every slot has already been recorded.
    pub fn record(&self, result: AttemptResult) -> bool {
        let reserved = self
            .recorded
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.attempts).then_some(n + 1)
            })
            .is_ok();

        if !reserved {
            tracing::warn!(attempts = self.attempts, "outcome recorded past burst size");
            return false;
        }

        let tally = match result {
            AttemptResult::Success => &self.successes,
            AttemptResult::Failure => &self.failures,
        };
        tally.fetch_add(1, Ordering::Release);
        true
    }

    /// Number of successful attempts so far
    #[must_use]
    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::Acquire)
    }

    /// Number of failed attempts so far
    #[must_use]
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::Acquire)
    }

    /// Configured burst size
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Read both tallies
    #[must_use]
    pub fn snapshot(&self) -> OutcomeSnapshot {
        OutcomeSnapshot {
            successes: self.successes(),
            failures: self.failures(),
            attempts: self.attempts,
        }
    }
}
