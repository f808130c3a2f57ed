use std::future::Future;
use std::time::Duration;

use log::warn;
use tokio::time::sleep;

/// Fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl From<&crate::config::RetrySettings> for RetryPolicy {
    fn from(settings: &crate::config::RetrySettings) -> Self {
        Self::new(settings.max_attempts, settings.delay())
    }
}

/// The error that ended a retry loop, with the number of attempts spent
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Last error returned by the operation
    pub error: E,
    /// Attempts made before giving up
    pub attempts: u32,
}

/// Runs `op` until it succeeds, returns a non-retryable error, or runs out of attempts
///
/// Sleeps `policy.delay` between attempts; there is no sleep after the last one.
/// `label` names the work in retry log lines.
pub async fn with_retry<F, Fut, T, E, R>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
    retryable: R,
) -> Result<T, Exhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    R: Fn(&E) -> bool,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempts >= policy.max_attempts || !retryable(&error) {
                    return Err(Exhausted { error, attempts });
                }
                warn!(
                    "Retrying {} ({}/{}) after error: {}",
                    label, attempts, policy.max_attempts, error
                );
                sleep(policy.delay).await;
            }
        }
    }
}
