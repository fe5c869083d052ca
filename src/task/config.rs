//! Executor configuration.

use std::time::Duration;

use crate::task::adapters::fault::DEFAULT_FAILURE_PROBABILITY;

/// Settings governing how the action executor simulates its backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    /// Simulated backend round trip applied to every mutating action.
    pub round_trip_latency: Duration,
    /// Probability handed to the default random fault injector.
    pub failure_probability: f64,
    /// Upper bound on a round trip; `None` waits indefinitely.
    pub action_timeout: Option<Duration>,
    /// Capacity of the lifecycle notification channel.
    pub event_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            round_trip_latency: Duration::from_millis(600),
            failure_probability: DEFAULT_FAILURE_PROBABILITY,
            action_timeout: Some(Duration::from_secs(5)),
            event_capacity: 64,
        }
    }
}

impl ExecutorConfig {
    /// Creates a configuration with no latency and no random failures.
    ///
    /// Useful for tests and for hosting the core behind a real backend.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            round_trip_latency: Duration::ZERO,
            failure_probability: 0.0,
            ..Self::default()
        }
    }

    /// Sets the simulated round-trip latency.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.round_trip_latency = latency;
        self
    }

    /// Sets the failure probability.
    #[must_use]
    pub const fn with_failure_probability(mut self, probability: f64) -> Self {
        self.failure_probability = probability;
        self
    }

    /// Sets the round-trip timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.action_timeout = timeout;
        self
    }
}
