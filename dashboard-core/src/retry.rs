use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Bounded retry with exponential backoff.
///
/// The delay before attempt `n + 1` is `initial_delay * 2^(n - 1)`, so the
/// default policy waits 1s then 2s across its three attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_delay.saturating_mul(1 << exponent)
    }
}

/// Run `op` until it succeeds or the policy's attempts are exhausted.
///
/// `sleep` is supplied by the caller so the same loop works under the browser
/// timer and under a test runtime. The last error is returned unchanged.
pub async fn with_retry<T, E, Op, OpFut, Sleep, SleepFut>(
    policy: RetryPolicy,
    mut sleep: Sleep,
    mut op: Op,
) -> Result<T, E>
where
    E: std::fmt::Display,
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, E>>,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts => return Err(e),
            Err(e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {} failed, retrying in {}ms: {}",
                    attempt,
                    delay.as_millis(),
                    e
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_default_backoff_doubles_from_one_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    fn test_zero_attempts_is_raised_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let calls = Cell::new(0);
        let slept = RefCell::new(Vec::new());

        let result: Result<(), String> = with_retry(
            RetryPolicy::default(),
            |d| {
                slept.borrow_mut().push(d);
                async {}
            },
            || {
                calls.set(calls.get() + 1);
                async { Err("boom".to_string()) }
            },
        )
        .await;

        assert_eq!(result, Err("boom".to_string()));
        assert_eq!(calls.get(), 3);
        assert_eq!(
            *slept.borrow(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_stops_on_first_success() {
        let calls = Cell::new(0);

        let result: Result<u32, String> = with_retry(
            RetryPolicy::default(),
            |_| async {},
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 2 {
                        Err("not yet".to_string())
                    } else {
                        Ok(n)
                    }
                }
            },
        )
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.get(), 2);
    }
}
