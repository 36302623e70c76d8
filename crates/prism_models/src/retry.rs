//! Retry policy for transient provider failures.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialFactorBackoff, jitter};

/// Exponential backoff bounds applied to retryable errors.
///
/// # Examples
///
/// ```
/// use prism_models::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_retries, 3);
/// assert_eq!(policy.delays().count(), 3);
///
/// assert_eq!(RetryPolicy::disabled().delays().count(), 0);
///
/// let seconds: Vec<u64> = policy.base_delays().map(|d| d.as_secs()).collect();
/// assert_eq!(seconds, vec![2, 4, 8]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Base delay before the first retry, in milliseconds; doubles on each
    /// further retry
    pub initial_backoff_ms: u64,
    /// Maximum number of retries after the first attempt
    pub max_retries: usize,
    /// Upper bound on any single delay, in seconds, jitter included
    pub max_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff_ms: 2000,
            max_retries: 3,
            max_delay_secs: 60,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }

    /// Doubling delays starting at `initial_backoff_ms`, capped at
    /// `max_delay_secs`, one per allowed retry.
    pub fn base_delays(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialFactorBackoff::from_millis(self.initial_backoff_ms, 2.0)
            .max_delay(self.max_delay())
            .take(self.max_retries)
    }

    /// Base delays with jitter applied, still capped at `max_delay_secs`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let max_delay = self.max_delay();
        self.base_delays()
            .map(jitter)
            .map(move |delay| delay.min(max_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_delays_double_from_initial() {
        let policy = RetryPolicy {
            initial_backoff_ms: 100,
            max_retries: 4,
            max_delay_secs: 60,
        };
        let delays: Vec<u128> = policy.base_delays().map(|d| d.as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400, 800]);
    }

    #[test]
    fn test_base_delays_non_decreasing_and_capped() {
        let policy = RetryPolicy {
            initial_backoff_ms: 2000,
            max_retries: 8,
            max_delay_secs: 10,
        };
        let delays: Vec<Duration> = policy.base_delays().collect();
        assert_eq!(delays.len(), 8);
        assert!(delays.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(10)));
        assert_eq!(delays.last(), Some(&Duration::from_secs(10)));
    }

    #[test]
    fn test_jittered_delays_never_exceed_cap() {
        let policy = RetryPolicy {
            initial_backoff_ms: 100,
            max_retries: 10,
            max_delay_secs: 1,
        };
        for _ in 0..50 {
            let delays: Vec<Duration> = policy.delays().collect();
            assert_eq!(delays.len(), 10);
            assert!(delays.iter().all(|d| *d <= Duration::from_secs(1)));
        }
    }
}
