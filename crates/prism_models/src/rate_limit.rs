//! Requests-per-minute limiter.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared requests-per-minute quota.
///
/// Cloning shares the underlying quota, so every clone of a client draws
/// from the same budget.
#[derive(Clone)]
pub struct RequestLimiter {
    rpm: u32,
    limiter: Arc<DirectRateLimiter>,
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("rpm", &self.rpm)
            .finish()
    }
}

impl RequestLimiter {
    /// Creates a limiter allowing `rpm` requests per minute.
    ///
    /// Returns `None` for a zero quota, meaning unlimited.
    pub fn per_minute(rpm: u32) -> Option<Self> {
        NonZeroU32::new(rpm).map(|n| Self {
            rpm,
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(n))),
        })
    }

    /// Configured requests per minute.
    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    /// Waits until a request may be sent.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_quota_is_unlimited() {
        assert!(RequestLimiter::per_minute(0).is_none());
    }

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let limiter = RequestLimiter::per_minute(60).unwrap();
        let start = std::time::Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < std::time::Duration::from_millis(500));
        assert_eq!(limiter.rpm(), 60);
    }
}
