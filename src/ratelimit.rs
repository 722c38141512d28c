use std::collections::HashMap;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

/// Injected rate-limit abstraction. Keys are caller-chosen strings, e.g.
/// `recommend:{user_id}`. Implementations may be process-local or backed by
/// a shared store; the callers only see allow/deny.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check_and_increment(&self, key: &str) -> bool;
}

/// Fixed-window in-memory limiter with per-key TTL.
pub struct InMemoryRateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<HashMap<String, (u32, OffsetDateTime)>>,
}

impl InMemoryRateLimiter {
    pub fn new(max_requests: u32, window_secs: i64) -> Self {
        Self {
            max_requests,
            window: Duration::seconds(window_secs),
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check_and_increment(&self, key: &str) -> bool {
        let now = OffsetDateTime::now_utc();
        let mut entries = self.entries.lock().await;

        if entries.len() > 4096 {
            let window = self.window;
            entries.retain(|_, (_, start)| now - *start < window);
        }

        match entries.get_mut(key) {
            Some((count, start)) if now - *start < self.window => {
                if *count < self.max_requests {
                    *count += 1;
                    true
                } else {
                    false
                }
            }
            _ => {
                entries.insert(key.to_string(), (1, now));
                true
            }
        }
    }
}

/// Always allows; used by the fake app state in tests.
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimiter for NoopRateLimiter {
    async fn check_and_increment(&self, _key: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn denies_after_limit_within_window() {
        let limiter = InMemoryRateLimiter::new(3, 3600);
        for _ in 0..3 {
            assert!(limiter.check_and_increment("recommend:u1").await);
        }
        assert!(!limiter.check_and_increment("recommend:u1").await);
        // other keys are independent
        assert!(limiter.check_and_increment("recommend:u2").await);
    }

    #[tokio::test]
    async fn expired_window_admits_again() {
        let limiter = InMemoryRateLimiter::new(1, 0);
        assert!(limiter.check_and_increment("k").await);
        // zero-length window: the previous entry is already stale
        assert!(limiter.check_and_increment("k").await);
    }

    #[tokio::test]
    async fn noop_always_allows() {
        let limiter = NoopRateLimiter;
        for _ in 0..100 {
            assert!(limiter.check_and_increment("any").await);
        }
    }
}
