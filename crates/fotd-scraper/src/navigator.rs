//! Bounded-retry navigation with linear backoff.
//!
//! Every adapter loads pages through [`Navigator::navigate`]; nothing else
//! in the crate retries a navigation.

use std::time::Duration;

use fotd_core::AppConfig;

use crate::browser::PageSession;
use crate::error::NavigationError;

/// Retry policy for page loads.
///
/// With the defaults (3 attempts, 2 s step, 30 s timeout):
///
/// | Attempt | Timeout | Sleep after failure |
/// |---------|---------|---------------------|
/// | 1       | 30 s    | 2 s                 |
/// | 2       | 30 s    | 4 s                 |
/// | 3       | 30 s    | none (error)        |
#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    max_attempts: u32,
    backoff_step: Duration,
    attempt_timeout: Duration,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(2_000), Duration::from_secs(30))
    }
}

impl Navigator {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, backoff_step: Duration, attempt_timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_step,
            attempt_timeout,
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            config.nav_max_attempts,
            Duration::from_millis(config.nav_backoff_ms),
            Duration::from_secs(config.nav_timeout_secs),
        )
    }

    /// Delay inserted after failed attempt number `attempt` (1-based).
    fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }

    /// Load `url` into `page`, retrying failed or timed-out attempts.
    ///
    /// Each attempt is a fresh navigation of the same page.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Exhausted`] wrapping the last attempt's
    /// error once every attempt has failed.
    pub async fn navigate(&self, page: &dyn PageSession, url: &str) -> Result<(), NavigationError> {
        let mut attempt = 1u32;
        loop {
            let err = match tokio::time::timeout(self.attempt_timeout, page.load(url)).await {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(err)) => err,
                Err(_) => NavigationError::Timeout {
                    url: url.to_owned(),
                    timeout: self.attempt_timeout,
                },
            };

            if attempt >= self.max_attempts {
                return Err(NavigationError::Exhausted {
                    url: url.to_owned(),
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.backoff_after(attempt);
            tracing::warn!(
                url,
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "navigation failed; retrying after backoff"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
