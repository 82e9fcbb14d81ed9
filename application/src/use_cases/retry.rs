//! Resilient remote call.
//!
//! [`call_with_retry`] is the only place transient failures are absorbed.
//! Callers never loop on their own.

use crate::config::RetryPolicy;
use crate::ports::llm_gateway::GatewayError;
use crate::use_cases::run_turn::SwarmError;
use crate::use_cases::shared::check_cancelled;
use rand::Rng;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Invoke `operation` up to `policy.max_attempts` times.
///
/// Cancellation is checked before and after every attempt and races both the
/// attempt and the backoff sleep. Transient gateway errors are retried after
/// `base_delay_ms × 2^attempt + jitter`; any other error is returned at once
/// as [`SwarmError::PermanentRemoteFailure`].
pub async fn call_with_retry<T, F, Fut>(
    operation_name: &str,
    policy: &RetryPolicy,
    token: &CancellationToken,
    mut operation: F,
) -> Result<T, SwarmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 0;

    loop {
        check_cancelled(token)?;
        debug!("{}: attempt {}/{}", operation_name, attempt + 1, max_attempts);

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(SwarmError::Cancelled),
            result = operation() => result,
        };
        check_cancelled(token)?;

        let error = match result {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => e,
            Err(e) => return Err(SwarmError::PermanentRemoteFailure(e)),
        };

        if attempt + 1 >= max_attempts {
            return Err(SwarmError::TransientRemoteFailure {
                attempts: max_attempts,
                message: error.to_string(),
            });
        }

        let delay = policy.delay_with_jitter(attempt, draw_jitter(policy.max_jitter_ms));
        warn!(
            "{} failed transiently (attempt {}/{}): {}. Retrying in {:?}",
            operation_name,
            attempt + 1,
            max_attempts,
            error,
            delay
        );

        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(SwarmError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
        attempt += 1;
    }
}

fn draw_jitter(max_jitter_ms: u64) -> u64 {
    if max_jitter_ms == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..max_jitter_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn overloaded() -> GatewayError {
        GatewayError::Http {
            status: 503,
            message: "model overloaded".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(5, 100, 10);
        let token = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let counter = Arc::clone(&calls);
        let result = call_with_retry("generate", &policy, &token, || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err(overloaded()) } else { Ok("done") }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two delays: 100ms and 200ms, each with < 10ms jitter
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(320));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_is_transient_failure() {
        let policy = RetryPolicy::new(3, 10, 0);
        let token = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = call_with_retry("generate", &policy, &token, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(GatewayError::RequestFailed("429 Too Many Requests".into())) }
        })
        .await;

        assert!(matches!(
            result,
            Err(SwarmError::TransientRemoteFailure { attempts: 3, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_not_retried() {
        let policy = RetryPolicy::new(5, 10, 0);
        let token = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = call_with_retry("generate", &policy, &token, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(GatewayError::Http {
                    status: 400,
                    message: "invalid argument".into(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(SwarmError::PermanentRemoteFailure(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_makes_no_call() {
        let policy = RetryPolicy::default();
        let token = CancellationToken::new();
        token.cancel();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = call_with_retry("generate", &policy, &token, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

        assert!(matches!(result, Err(SwarmError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_wins_over_backoff() {
        let policy = RetryPolicy::new(5, 10_000, 0);
        let token = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let counter = Arc::clone(&calls);
        let start = Instant::now();
        let result: Result<(), _> = call_with_retry("generate", &policy, &token, || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(overloaded()) }
        })
        .await;

        assert!(matches!(result, Err(SwarmError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
