//! Bounded exponential-backoff retry for remote calls.
//!
//! One logical operation (a handshake step or a batch flush) is a sequence
//! of attempts bounded twice over: by the step count of the [`Backoff`]
//! schedule and by a wall-clock deadline. Whichever limit is hit first ends
//! the sequence. Permanent statuses short-circuit immediately.

use std::future::Future;

use tokio::time::{Instant, sleep, timeout_at};
use tonic::Status;

use crate::config::Backoff;
use crate::error::{UploadError, is_permanent_status};

/// Invoke `call` until it succeeds, a permanent status appears, or the
/// step/deadline budget runs out.
///
/// Each in-flight call is itself bounded by `deadline`, so a hung call
/// cannot outlive the sequence. On budget exhaustion the last transient
/// status is surfaced as [`UploadError::Exhausted`]; it is never converted
/// into a success.
pub async fn retry_rpc<T, F, Fut>(
    op: &str,
    backoff: &Backoff,
    deadline: Instant,
    mut call: F,
) -> Result<T, UploadError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let outcome = match timeout_at(deadline, call()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Status::deadline_exceeded(format!(
                "{op}: deadline elapsed mid-call"
            ))),
        };
        let status = match outcome {
            Ok(value) => return Ok(value),
            Err(status) => status,
        };

        tracing::error!(op, code = ?status.code(), attempt, "rpc failed: {status}");

        if is_permanent_status(&status) {
            return Err(UploadError::Permanent(status));
        }
        if attempt >= backoff.steps {
            return Err(UploadError::Exhausted(status));
        }
        let delay = backoff.jittered(attempt);
        if Instant::now() + delay >= deadline {
            // The deadline would pass before the next attempt; give up now
            // rather than sleeping through it.
            return Err(UploadError::Exhausted(status));
        }
        sleep(delay).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use tonic::Code;

    use super::*;

    fn quick_backoff() -> Backoff {
        Backoff {
            initial: Duration::from_millis(100),
            factor: 2.0,
            cap: Duration::from_secs(30),
            steps: 4,
            jitter: 0.0,
        }
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(300)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = retry_rpc("Op", &quick_backoff(), far_deadline(), || {
            calls.fetch_add(1, Ordering::Relaxed);
            async { Ok::<_, Status>(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = retry_rpc("Op", &quick_backoff(), far_deadline(), || {
            let n = calls.fetch_add(1, Ordering::Relaxed);
            async move {
                if n < 2 {
                    Err(Status::unavailable("down"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::Relaxed), 3);
        // Two backoff sleeps: 100ms then 200ms, exact under the paused clock.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_short_circuits() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_rpc("Op", &quick_backoff(), far_deadline(), || {
            calls.fetch_add(1, Ordering::Relaxed);
            async { Err(Status::permission_denied("no")) }
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_permanent());
        assert_eq!(err.status().map(Status::code), Some(Code::PermissionDenied));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_surfaces_last_status() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_rpc("Op", &quick_backoff(), far_deadline(), || {
            let n = calls.fetch_add(1, Ordering::Relaxed);
            async move { Err(Status::unavailable(format!("down #{n}"))) }
        })
        .await;

        match result.unwrap_err() {
            UploadError::Exhausted(status) => {
                assert_eq!(status.code(), Code::Unavailable);
                assert_eq!(status.message(), "down #3");
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cuts_retries_short() {
        let backoff = Backoff {
            steps: 100,
            ..quick_backoff()
        };
        // Enough for two attempts plus the first sleep, not for the second.
        let deadline = Instant::now() + Duration::from_millis(250);
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry_rpc("Op", &backoff, deadline, || {
            calls.fetch_add(1, Ordering::Relaxed);
            async { Err(Status::unavailable("down")) }
        })
        .await;

        assert!(matches!(result.unwrap_err(), UploadError::Exhausted(_)));
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_bounds_hung_call() {
        let deadline = Instant::now() + Duration::from_millis(50);

        let result: Result<(), _> = retry_rpc("Op", &quick_backoff(), deadline, || async {
            sleep(Duration::from_secs(3600)).await;
            Ok(())
        })
        .await;

        match result.unwrap_err() {
            UploadError::Exhausted(status) => {
                assert_eq!(status.code(), Code::DeadlineExceeded);
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }
}
