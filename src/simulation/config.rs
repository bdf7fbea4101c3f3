//! Construction-time configuration for the navigator.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NavigatorError;
use crate::simulation::params::{DEFAULT_EPSILON, DEFAULT_MAX_DOOR_FREQUENCY, DEFAULT_RADIUS};

/// Knobs supplied by the harness when the agent is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Largest period any door can have.
    pub max_door_frequency: u64,
    /// Sensor radius in cells.
    pub radius: u32,
    /// Probability of a random exploration move instead of the greedy one.
    pub epsilon: f64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            max_door_frequency: DEFAULT_MAX_DOOR_FREQUENCY,
            radius: DEFAULT_RADIUS,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl NavigatorConfig {
    #[must_use]
    pub fn new(max_door_frequency: u64, radius: u32) -> Self {
        Self {
            max_door_frequency,
            radius,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Checks the values the planners rely on.
    ///
    /// # Errors
    /// Returns [`NavigatorError::InvalidConfig`] for a zero radius, a zero
    /// maximum frequency, or an epsilon outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), NavigatorError> {
        if self.radius == 0 {
            return Err(NavigatorError::InvalidConfig("radius must be positive".into()));
        }
        if self.max_door_frequency == 0 {
            return Err(NavigatorError::InvalidConfig(
                "max_door_frequency must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(NavigatorError::InvalidConfig(format!(
                "epsilon must lie in [0, 1], got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Loads and validates a JSON config file. Missing fields take defaults.
    ///
    /// # Errors
    /// Fails if the file cannot be read, is not valid JSON, or does not validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, NavigatorError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| NavigatorError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| NavigatorError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}
