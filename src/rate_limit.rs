use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Sliding-window request counter, keyed by endpoint name
#[derive(Default)]
pub struct RateLimiter {
    /// accepted request timestamps per key, oldest first
    requests: HashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the given key has exceeded the rate limit within the specified time window.
    /// Returns `true` if the rate limit is exceeded, `false` otherwise.
    pub fn check_rate_limit(&mut self, key: &str, max: usize, window_secs: u64) -> bool {
        self.check_rate_limit_at(key, max, Duration::from_secs(window_secs), Instant::now())
    }

    fn check_rate_limit_at(&mut self, key: &str, max: usize, window: Duration, now: Instant) -> bool {
        let timestamps = self.requests.entry(key.to_string()).or_default();

        while timestamps
            .front()
            .is_some_and(|&t| now.duration_since(t) >= window)
        {
            timestamps.pop_front();
        }

        if timestamps.len() < max {
            timestamps.push_back(now);
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_per_key() {
        let mut limiter = RateLimiter::new();
        let now = Instant::now();
        let window = Duration::from_secs(60);

        assert!(!limiter.check_rate_limit_at("billing", 2, window, now));
        assert!(!limiter.check_rate_limit_at("billing", 2, window, now));
        assert!(limiter.check_rate_limit_at("billing", 2, window, now));
        assert!(!limiter.check_rate_limit_at("sandbox", 2, window, now));
    }

    #[test]
    fn test_window_expiry() {
        let mut limiter = RateLimiter::new();
        let start = Instant::now();
        let window = Duration::from_secs(10);

        assert!(!limiter.check_rate_limit_at("billing", 1, window, start));
        assert!(limiter.check_rate_limit_at("billing", 1, window, start + Duration::from_secs(9)));
        assert!(!limiter.check_rate_limit_at("billing", 1, window, start + Duration::from_secs(10)));
    }
}
