//! Fault injectors: random, never-failing and scripted.

use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

use crate::task::{
    domain::{TaskAction, TaskId},
    ports::FaultInjector,
};

/// Failure probability used when none is configured.
pub const DEFAULT_FAILURE_PROBABILITY: f64 = 0.15;

/// Error returned for probabilities outside `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("failure probability {0} is outside 0.0..=1.0")]
pub struct InvalidFailureProbability(pub f64);

/// Fails each attempt independently with a fixed probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomFaultInjector {
    probability: f64,
}

impl RandomFaultInjector {
    /// Creates an injector failing with `probability`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFailureProbability`] when `probability` is not a
    /// finite value in `0.0..=1.0`.
    pub fn new(probability: f64) -> Result<Self, InvalidFailureProbability> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(InvalidFailureProbability(probability));
        }
        Ok(Self { probability })
    }

    /// Returns the configured probability.
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for RandomFaultInjector {
    fn default() -> Self {
        Self {
            probability: DEFAULT_FAILURE_PROBABILITY,
        }
    }
}

impl FaultInjector for RandomFaultInjector {
    fn should_fail(&self, _action: TaskAction, _task_id: &TaskId) -> bool {
        rand::thread_rng().gen_bool(self.probability)
    }
}

/// Never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverFail;

impl FaultInjector for NeverFail {
    fn should_fail(&self, _action: TaskAction, _task_id: &TaskId) -> bool {
        false
    }
}

/// Replays a fixed sequence of outcomes, then succeeds.
#[derive(Debug, Default)]
pub struct ScriptedFaultInjector {
    outcomes: Mutex<VecDeque<bool>>,
}

impl ScriptedFaultInjector {
    /// Creates an injector replaying `outcomes` (`true` means fail).
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
        }
    }

    /// Queues one more outcome behind the remaining ones.
    pub fn push(&self, fail: bool) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(fail);
        }
    }

    /// Returns the number of outcomes not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.outcomes.lock().map_or(0, |outcomes| outcomes.len())
    }
}

impl FaultInjector for ScriptedFaultInjector {
    fn should_fail(&self, _action: TaskAction, _task_id: &TaskId) -> bool {
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut outcomes| outcomes.pop_front())
            .unwrap_or(false)
    }
}
