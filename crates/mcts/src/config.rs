//! MCTS configuration parameters.
//!
//! These parameters control the behavior of the Monte Carlo Tree Search algorithm.

use serde::{Deserialize, Serialize};
use uct_core::{MctsError, Result};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Number of search iterations after the root pre-expansion pass.
    pub iterations: usize,

    /// UCT exploration coefficient.
    /// 0 = pure exploitation, larger values try rarely visited children more,
    /// negative values steer away from them.
    pub exploration: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration: 1.4,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of iterations.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Create a config that always follows the best mean reward.
    pub fn greedy(iterations: usize) -> Self {
        Self {
            iterations,
            exploration: 0.0,
        }
    }

    /// Check that the exploration coefficient is a finite number.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidConfig` describing the offending value.
    pub fn validate<E>(&self) -> Result<(), E> {
        if !self.exploration.is_finite() {
            return Err(MctsError::InvalidConfig(format!(
                "exploration must be finite, got {}",
                self.exploration
            )));
        }
        Ok(())
    }
}
