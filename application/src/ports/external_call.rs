//! Failure classification shared by every external port.

use std::time::Duration;

/// Error returned by a call that leaves the process.
///
/// [`call_with_policy`](crate::use_cases::shared::call_with_policy) retries
/// transient failures and converts elapsed timeouts through
/// [`timed_out`](ExternalCallError::timed_out).
pub trait ExternalCallError: std::error::Error + Send + Sync + 'static {
    /// Timeouts, connection failures, throttling and server errors.
    fn is_transient(&self) -> bool;

    /// Error value for an attempt that exceeded its timeout.
    fn timed_out(after: Duration) -> Self;
}
