//! Per-caller request ceiling over a rolling window.
//!
//! Each caller key keeps the timestamps of its admitted requests inside the
//! current window. A request is admitted while fewer than `max_requests`
//! timestamps remain after dropping the expired ones. Rejected requests are
//! not recorded, so hammering a full bucket does not extend the lockout.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::AppError;

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    buckets: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request for `key`, or refuse it if the ceiling is reached.
    pub async fn check(&self, key: &str) -> Result<(), AppError> {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(key.to_string()).or_default();

        while bucket
            .front()
            .is_some_and(|&t| now.duration_since(t) >= self.window)
        {
            bucket.pop_front();
        }

        if bucket.len() >= self.max_requests as usize {
            let retry_after = bucket
                .front()
                .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
                .unwrap_or(self.window);
            tracing::debug!(caller = key, "Request ceiling reached");
            return Err(AppError::RateLimitExceeded {
                retry_after_secs: ceil_secs(retry_after),
            });
        }

        bucket.push_back(now);
        Ok(())
    }

    /// Drop expired timestamps and forget callers with nothing left.
    /// Returns the number of callers still tracked.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        buckets.retain(|_, bucket| {
            bucket.retain(|&t| now.duration_since(t) < self.window);
            !bucket.is_empty()
        });
        buckets.len()
    }

    /// Sweep on a fixed interval for as long as the process runs.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let tracked = self.sweep().await;
                tracing::trace!(tracked, "Rate limiter swept");
            }
        })
    }
}

fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    secs.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test(start_paused = true)]
    async fn test_nth_allowed_n_plus_one_rejected() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert_ok!(limiter.check("10.0.0.1").await);
        }
        let err = limiter.check("10.0.0.1").await.unwrap_err();
        assert!(matches!(err, AppError::RateLimitExceeded { retry_after_secs: 60 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert_ok!(limiter.check("a").await);
        assert_err!(limiter.check("a").await);
        assert_ok!(limiter.check("b").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_rolls() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));
        assert_ok!(limiter.check("a").await);
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_ok!(limiter.check("a").await);
        assert_err!(limiter.check("a").await);

        // First request leaves the window, second is still inside it.
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_ok!(limiter.check("a").await);
        assert_err!(limiter.check("a").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_counts_down() {
        let limiter = RateLimiter::new(1, Duration::from_secs(30));
        assert_ok!(limiter.check("a").await);
        tokio::time::advance(Duration::from_millis(20_500)).await;
        let err = limiter.check("a").await.unwrap_err();
        assert!(matches!(err, AppError::RateLimitExceeded { retry_after_secs: 10 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_forgets_idle_callers() {
        let limiter = RateLimiter::new(5, Duration::from_secs(10));
        assert_ok!(limiter.check("a").await);
        assert_ok!(limiter.check("b").await);
        assert_eq!(limiter.sweep().await, 2);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(limiter.sweep().await, 0);
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_millis(9_500)), 10);
        assert_eq!(ceil_secs(Duration::from_secs(7)), 7);
        assert_eq!(ceil_secs(Duration::ZERO), 1);
    }
}
