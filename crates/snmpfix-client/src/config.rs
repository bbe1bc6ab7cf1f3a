//! Client configuration types.

use std::time::Duration;

/// Polling configuration for long-running controller jobs
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between two status checks
    pub interval: Duration,

    /// Maximum number of status checks before giving up
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PollConfig {
    /// Create a new polling configuration (3s interval, 10 minutes total)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 200,
        }
    }

    /// Set the delay between status checks
    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the maximum number of status checks
    #[must_use]
    pub const fn max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    /// Total time spent polling before a job is reported as timed out
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}
