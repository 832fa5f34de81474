// ABOUTME: Bounded polling shared by every wait on the control plane.
// ABOUTME: Checks immediately, then each interval, until ready, timed out, or cancelled.

use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// How a bounded poll ended, when the condition itself did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    TimedOut,
    Cancelled,
}

/// Poll `condition` until it yields a value.
///
/// The condition runs immediately, then every `interval`, and one last time
/// at the deadline, so anything that becomes true before `timeout` elapses is
/// observed. `Ok(None)` means "not yet"; an `Err` ends the poll at once.
pub async fn poll_until<T, E, F, Fut>(
    interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
    mut condition: F,
) -> Result<PollOutcome<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        let attempt = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
            result = condition() => result?,
        };
        if let Some(value) = attempt {
            return Ok(PollOutcome::Ready(value));
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(PollOutcome::TimedOut);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
            _ = sleep_until((now + interval).min(deadline)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ready_on_first_attempt_does_not_sleep() {
        let start = Instant::now();
        let outcome: Result<_, ()> = poll_until(
            Duration::from_secs(1),
            Duration::from_secs(60),
            &CancellationToken::new(),
            || async { Ok(Some(7)) },
        )
        .await;
        assert_eq!(outcome, Ok(PollOutcome::Ready(7)));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_deadline() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let start = Instant::now();

        let outcome: Result<PollOutcome<()>, ()> = poll_until(
            Duration::from_secs(1),
            Duration::from_secs(5),
            &CancellationToken::new(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(None) }
            },
        )
        .await;

        assert_eq!(outcome, Ok(PollOutcome::TimedOut));
        assert_eq!(start.elapsed(), Duration::from_secs(5));
        // t = 0, 1, 2, 3, 4, 5
        assert_eq!(attempts.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn checks_once_more_at_a_deadline_between_ticks() {
        let start = Instant::now();
        let outcome: Result<_, ()> = poll_until(
            Duration::from_secs(2),
            Duration::from_secs(3),
            &CancellationToken::new(),
            move || {
                let ready = start.elapsed() >= Duration::from_millis(2500);
                async move { Ok(ready.then_some("late")) }
            },
        )
        .await;
        assert_eq!(outcome, Ok(PollOutcome::Ready("late")));
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn error_stops_polling_immediately() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let outcome: Result<PollOutcome<()>, &str> = poll_until(
            Duration::from_secs(1),
            Duration::from_secs(60),
            &CancellationToken::new(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err("boom") }
            },
        )
        .await;
        assert_eq!(outcome, Err("boom"));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_wait() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let outcome: Result<PollOutcome<()>, ()> = poll_until(
            Duration::from_secs(1),
            Duration::from_secs(60),
            &cancel,
            || async { Ok(None) },
        )
        .await;
        assert_eq!(outcome, Ok(PollOutcome::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
