//! Shared utilities for use cases.
//!
//! Contains the timeout and retry wrapper applied to every external call
//! made by the pipeline stages.

use crate::config::CallPolicy;
use crate::ports::external_call::ExternalCallError;
use std::future::Future;
use tracing::{debug, warn};

/// Run `op` under `policy`.
///
/// Each attempt is bounded by `policy.timeout`; an elapsed timeout counts as
/// a transient failure. Transient failures are retried up to
/// `policy.max_retries` times with exponential backoff. Permanent failures
/// return immediately.
pub async fn call_with_policy<T, E, F, Fut>(
    policy: &CallPolicy,
    label: &str,
    mut op: F,
) -> Result<T, E>
where
    E: ExternalCallError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut retry = 0;
    loop {
        let attempt = match tokio::time::timeout(policy.timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(E::timed_out(policy.timeout)),
        };

        match attempt {
            Ok(value) => {
                if retry > 0 {
                    debug!(call = label, attempt = retry + 1, "Call succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_transient() && retry < policy.max_retries => {
                let delay = policy.backoff_for(retry);
                warn!(
                    call = label,
                    attempt = retry + 1,
                    error = %e,
                    "Transient failure, retrying in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            Err(e) => {
                if e.is_transient() {
                    warn!(call = label, attempts = retry + 1, error = %e, "Retries exhausted");
                } else {
                    warn!(call = label, error = %e, "Permanent failure, not retrying");
                }
                return Err(e);
            }
        }
    }
}
