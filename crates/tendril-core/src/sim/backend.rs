//! Environment trait and step types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::{distance, Vector3};
use crate::neural::{ActionSpace, ObservationSpace};
use crate::Result;

use super::EnvConfig;

/// What the policy sees: tip position followed by goal position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Current end-effector position (mm)
    pub state: Vector3,
    /// Goal position for the running episode (mm)
    pub goal: Vector3,
}

impl Observation {
    /// Observation dimension
    pub const DIM: usize = 6;

    /// Create an observation
    pub fn new(state: Vector3, goal: Vector3) -> Self {
        Self { state, goal }
    }

    /// Flatten to `[x, y, z, gx, gy, gz]` for the policy
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.state.x as f32,
            self.state.y as f32,
            self.state.z as f32,
            self.goal.x as f32,
            self.goal.y as f32,
            self.goal.z as f32,
        ]
    }

    /// Flatten to a vector
    pub fn to_vec(&self) -> Vec<f32> {
        self.to_array().to_vec()
    }

    /// Distance from the tip to the goal (mm)
    pub fn distance(&self) -> f64 {
        distance(&self.goal, &self.state)
    }
}

/// Auxiliary key/value data attached to a step.
///
/// Always empty for the reaching task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo(BTreeMap<String, f64>);

impl StepInfo {
    /// Create an empty info map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Result from stepping the environment
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Observation after the step
    pub observation: Observation,
    /// Shaped reward for the transition
    pub reward: f64,
    /// Whether the episode ended (goal reached or horizon hit)
    pub done: bool,
    /// Auxiliary data
    pub info: StepInfo,
}

/// Lifecycle of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    /// Accepting steps
    Running,
    /// Terminal until the next reset
    Done,
}

/// Trait for episodic environments
///
/// This is the untyped seam an external trainer drives; actions arrive as
/// slices and are checked for arity.
pub trait Environment: Send {
    /// Get the environment name
    fn name(&self) -> &str;

    /// Get the current configuration
    fn config(&self) -> &EnvConfig;

    /// Declared action bounds
    fn action_space(&self) -> &ActionSpace;

    /// Declared observation bounds
    fn observation_space(&self) -> &ObservationSpace;

    /// Start a new episode
    fn reset(&mut self) -> Result<Observation>;

    /// Apply one action
    fn step(&mut self, action: &[f32]) -> Result<StepResult>;

    /// Current observation, if an episode has been started
    fn observation(&self) -> Option<Observation>;

    /// Step horizon of an episode
    fn max_steps(&self) -> usize {
        self.config().termination.max_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_observation_layout() {
        let obs = Observation::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 6.0, 3.0));
        assert_eq!(obs.to_array(), [1.0, 2.0, 3.0, 4.0, 6.0, 3.0]);
        assert_eq!(obs.to_vec().len(), Observation::DIM);
        assert_relative_eq!(obs.distance(), 5.0);
    }

    #[test]
    fn test_step_info() {
        let mut info = StepInfo::new();
        assert!(info.is_empty());
        info.insert("distance", 2.5);
        assert_eq!(info.get("distance"), Some(2.5));
        assert_eq!(info.len(), 1);
        assert_eq!(info.iter().next(), Some(("distance", 2.5)));
    }
}
