//! Retry policy shared by every network-bound step (blob download, object
//! upload, ledger reads and writes).
//!
//! * Each attempt runs under the policy's timeout.
//! * Only transient errors (see [`Error::is_transient`]) are retried.
//! * The last error is returned once attempts are exhausted.

use std::future::Future;
use std::time::Duration;

use crate::config::{BackoffKind, RetryConfig};
use crate::error::{Error, Result};

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately.
    None,
    /// `step`, `2 * step`, `3 * step`, …
    Linear(Duration),
    /// `base`, `2 * base`, `4 * base`, …
    Exponential(Duration),
}

impl Backoff {
    /// Delay before the retry that follows the `failures`-th failure
    /// (1-based).
    pub fn delay(&self, failures: u32) -> Duration {
        match *self {
            Backoff::None => Duration::ZERO,
            Backoff::Linear(step) => step.saturating_mul(failures),
            Backoff::Exponential(base) => {
                base.saturating_mul(2u32.saturating_pow(failures.saturating_sub(1)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// Upper bound for a single attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        let base = Duration::from_millis(cfg.base_delay_ms);
        let backoff = match cfg.backoff {
            BackoffKind::None => Backoff::None,
            BackoffKind::Linear => Backoff::Linear(base),
            BackoffKind::Exponential => Backoff::Exponential(base),
        };
        Self {
            max_attempts: cfg.max_attempts.max(1),
            backoff,
            timeout: Duration::from_millis(cfg.timeout_ms),
        }
    }

    /// No delay between attempts; used by tests and local stores.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::None,
            timeout: Duration::from_secs(5),
        }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number so callers can probe for
    /// side effects of an earlier attempt before repeating a write.
    pub async fn run<T, F, Fut>(&self, op_name: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err: Option<Error> = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.backoff.delay(attempt - 1)).await;
            }

            let err = match tokio::time::timeout(self.timeout, op(attempt)).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) if !e.is_transient() => return Err(e),
                Ok(Err(e)) => e,
                Err(_) => Error::Timeout(format!(
                    "{op_name} exceeded {}ms",
                    self.timeout.as_millis()
                )),
            };

            tracing::warn!(
                op = op_name,
                attempt,
                max_attempts = self.max_attempts,
                error = %err,
                "transient failure"
            );
            last_err = Some(err);
        }

        Err(last_err.unwrap_or_else(|| Error::Other(format!("{op_name}: no attempts made"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn linear_backoff_matches_two_four_six() {
        let b = Backoff::Linear(Duration::from_secs(2));
        assert_eq!(b.delay(1), Duration::from_secs(2));
        assert_eq!(b.delay(2), Duration::from_secs(4));
        assert_eq!(b.delay(3), Duration::from_secs(6));
    }

    #[test]
    fn exponential_backoff_doubles() {
        let b = Backoff::Exponential(Duration::from_millis(100));
        assert_eq!(b.delay(1), Duration::from_millis(100));
        assert_eq!(b.delay(2), Duration::from_millis(200));
        assert_eq!(b.delay(3), Duration::from_millis(400));
    }

    #[test]
    fn default_policy_is_three_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Backoff::Linear(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(3);
        let out = policy
            .run("upload", |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(Error::ObjectStore("503".into()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(out, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(3);
        let err = policy
            .run("write", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(Error::Schema("bad header".into())) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_returns_last_error() {
        let policy = RetryPolicy::immediate(2);
        let err = policy
            .run("download", |attempt| async move {
                Err::<(), _>(Error::Http(format!("attempt {attempt}")))
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP: attempt 2");
    }

    #[tokio::test]
    async fn slow_attempt_times_out() {
        let policy = RetryPolicy {
            max_attempts: 1,
            backoff: Backoff::None,
            timeout: Duration::from_millis(10),
        };
        let err = policy
            .run("find_row", |_| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }
}
