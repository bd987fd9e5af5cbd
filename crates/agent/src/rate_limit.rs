use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Sliding-window limiter: at most `max` acquisitions per `window`.
pub struct RateLimiter {
    max: usize,
    window: Duration,
    recent: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// `max_rpm` acquisitions per rolling minute. Zero means unlimited.
    pub fn per_minute(max_rpm: u32) -> Self {
        Self::with_window(max_rpm as usize, Duration::from_secs(60))
    }

    pub fn with_window(max: usize, window: Duration) -> Self {
        Self {
            max,
            window,
            recent: Mutex::new(VecDeque::with_capacity(max)),
        }
    }

    /// Wait until a slot is free, then claim it.
    pub async fn acquire(&self) {
        if self.max == 0 {
            return;
        }
        loop {
            let wait_until = {
                let mut recent = self.recent.lock().await;
                let now = Instant::now();
                while recent
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= self.window)
                {
                    recent.pop_front();
                }
                if recent.len() < self.max {
                    recent.push_back(now);
                    return;
                }
                match recent.front() {
                    Some(oldest) => *oldest + self.window,
                    None => continue,
                }
            };
            debug!(max = self.max, "rate limit reached, waiting for a free slot");
            tokio::time::sleep_until(wait_until).await;
        }
    }
}
