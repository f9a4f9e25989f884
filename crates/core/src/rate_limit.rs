use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window request counter.
pub struct SlidingWindow {
    max_requests: usize,
    window: Duration,
    hits: VecDeque<Instant>,
}

impl SlidingWindow {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            hits: VecDeque::new(),
        }
    }

    /// Records a request, or returns how long to wait before retrying.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        self.try_acquire_at(Instant::now())
    }

    pub fn try_acquire_at(&mut self, now: Instant) -> Result<(), Duration> {
        self.prune(now);

        if self.hits.len() >= self.max_requests {
            let oldest = self.hits.front().copied().unwrap_or(now);
            let elapsed = now.saturating_duration_since(oldest);
            let retry_after = self
                .window
                .saturating_sub(elapsed)
                .max(Duration::from_millis(1));
            return Err(retry_after);
        }

        self.hits.push_back(now);
        Ok(())
    }

    pub fn can_proceed(&mut self) -> bool {
        self.try_acquire().is_ok()
    }

    /// Requests still available in the current window.
    pub fn remaining_at(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.max_requests.saturating_sub(self.hits.len())
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&t) = self.hits.front() {
            if now.saturating_duration_since(t) >= self.window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }
}
