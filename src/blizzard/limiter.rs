//! Sliding-window rate limiter shared across the crawl worker pool.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Bounds the aggregate outbound call rate to `max_calls` per `period`,
/// regardless of how many tasks call [`RateLimiter::acquire`] concurrently.
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            period,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Waits until issuing one more call keeps the trailing window at or
    /// under `max_calls`, then records the call. FIFO eviction only; no
    /// fairness guarantee between waiters.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();
                while calls
                    .front()
                    .map_or(false, |&t| now.duration_since(t) >= self.period)
                {
                    calls.pop_front();
                }

                if calls.len() < self.max_calls {
                    calls.push_back(now);
                    return;
                }

                match calls.front() {
                    Some(&oldest) => self.period.saturating_sub(now.duration_since(oldest)),
                    None => return,
                }
            };
            tokio::time::sleep(wait).await;
        }
    }
}
