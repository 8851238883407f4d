//! Backoff policy for export status polling
//!
//! The delay starts at `initial_delay` and is multiplied by `multiplier`
//! after every RUNNING response. With the defaults (1s, x2, no cap, no
//! jitter) the waits are 1s, 2s, 4s, 8s, ... for as long as the task runs.

use crate::config::PollingConfig;
use rand::Rng;
use std::time::Duration;

/// How long to wait between export status checks
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the second status check
    pub initial_delay: Duration,

    /// Growth factor applied after each wait
    pub multiplier: f64,

    /// Upper bound for any single delay
    pub max_delay: Option<Duration>,

    /// Randomize each wait between half and the full delay
    pub jitter: bool,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: None,
            jitter: false,
        }
    }
}

impl From<&PollingConfig> for BackoffPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            multiplier: config.backoff_multiplier,
            max_delay: config.max_delay_ms.map(Duration::from_millis),
            jitter: config.jitter,
        }
    }
}

impl BackoffPolicy {
    /// Fixed delay policy, mostly useful in tests
    pub fn constant(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            multiplier: 1.0,
            max_delay: None,
            jitter: false,
        }
    }

    /// Returns the sequence of delays this policy produces
    pub fn delays(&self) -> Delays<'_> {
        Delays {
            policy: self,
            next: self.cap(self.initial_delay),
        }
    }

    fn cap(&self, delay: Duration) -> Duration {
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    /// Computes the delay following `current`, saturating at `Duration::MAX`
    fn grow(&self, current: Duration) -> Duration {
        let scaled = Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .unwrap_or(Duration::MAX);
        self.cap(scaled)
    }

    fn apply_jitter(&self, delay: Duration) -> Duration {
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let factor = rand::thread_rng().gen_range(0.5..=1.0);
        Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
    }
}

/// Iterator over the waits of a [`BackoffPolicy`]
///
/// Never ends; the poll loop stops pulling delays once the task is terminal.
#[derive(Debug)]
pub struct Delays<'a> {
    policy: &'a BackoffPolicy,
    next: Duration,
}

impl Iterator for Delays<'_> {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        self.next = self.policy.grow(current);
        Some(self.policy.apply_jitter(current))
    }
}
