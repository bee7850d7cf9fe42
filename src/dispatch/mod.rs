//! Reliable command delivery
//!
//! A control command is delivered by firing a burst of identical requests
//! at the device backend ([`Dispatcher`]) and then waiting for the first one
//! to be accepted ([`await_outcome`]).

pub mod backend;
pub mod counter;
pub mod dispatcher;
pub mod waiter;

pub use backend::{DEFAULT_HOOK_BASE_URL, DeviceBackend, HookBackend, classify};
pub use counter::{AttemptResult, OutcomeCounter, OutcomeSnapshot};
pub use dispatcher::{DEFAULT_ATTEMPTS, DEFAULT_MAX_IN_FLIGHT, DispatchHandle, Dispatcher};
pub use waiter::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, WaitPolicy, await_outcome};
