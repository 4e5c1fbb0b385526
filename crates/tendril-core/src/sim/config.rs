//! Environment configuration

use serde::{Deserialize, Serialize};

use crate::kinematics::Geometry;
use crate::math::within_tolerance;
use crate::{Error, Result};

/// Fixed reward paid when the new distance falls below `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBracket {
    /// Distance to the goal (mm) below which the bracket applies
    pub threshold: f64,
    /// Reward paid inside the bracket
    pub reward: f64,
}

impl RewardBracket {
    /// Create a bracket
    pub const fn new(threshold: f64, reward: f64) -> Self {
        Self { threshold, reward }
    }
}

/// Reward shaping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward when the distance to the goal did not change
    pub no_progress_penalty: f64,
    /// Bonus brackets, checked in ascending threshold order
    pub brackets: Vec<RewardBracket>,
    /// Absolute tolerance for the no-progress check (0.0 = exact equality)
    pub progress_tolerance: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            no_progress_penalty: -100.0,
            brackets: vec![
                RewardBracket::new(5.0, 200.0),
                RewardBracket::new(10.0, 100.0),
                RewardBracket::new(20.0, 50.0),
            ],
            progress_tolerance: 0.0,
        }
    }
}

impl RewardConfig {
    /// Set the no-progress penalty
    pub fn with_no_progress_penalty(mut self, penalty: f64) -> Self {
        self.no_progress_penalty = penalty;
        self
    }

    /// Replace the bonus brackets
    pub fn with_brackets(mut self, brackets: Vec<RewardBracket>) -> Self {
        self.brackets = brackets;
        self
    }

    /// Set the no-progress tolerance
    pub fn with_progress_tolerance(mut self, tolerance: f64) -> Self {
        self.progress_tolerance = tolerance;
        self
    }

    /// Reward for moving from `old_distance` to `new_distance` from the goal.
    ///
    /// Order: no-progress penalty, then the tightest bracket containing
    /// `new_distance`, then the signed progress `old_distance - new_distance`.
    pub fn reward(&self, old_distance: f64, new_distance: f64) -> f64 {
        if within_tolerance(new_distance, old_distance, self.progress_tolerance) {
            return self.no_progress_penalty;
        }

        self.brackets
            .iter()
            .find(|b| new_distance < b.threshold)
            .map(|b| b.reward)
            .unwrap_or(old_distance - new_distance)
    }

    /// Check the brackets are ordered and the tolerance is sane
    pub fn validate(&self) -> Result<()> {
        if !(self.progress_tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "progress_tolerance must be non-negative, got {}",
                self.progress_tolerance
            )));
        }
        if let Some(b) = self.brackets.iter().find(|b| !b.threshold.is_finite()) {
            return Err(Error::Config(format!(
                "reward bracket threshold must be finite, got {}",
                b.threshold
            )));
        }
        if self
            .brackets
            .windows(2)
            .any(|w| w[0].threshold >= w[1].threshold)
        {
            return Err(Error::Config(
                "reward bracket thresholds must be strictly ascending".into(),
            ));
        }
        Ok(())
    }
}

/// Episode termination configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminationConfig {
    /// Distance to the goal (mm) below which the episode ends
    pub goal_threshold: f64,
    /// Step horizon after which the episode ends regardless of distance
    pub max_steps: usize,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            goal_threshold: 3.0,
            max_steps: 1000,
        }
    }
}

impl TerminationConfig {
    /// Check the horizon and threshold
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(Error::Config("max_steps must be at least 1".into()));
        }
        if !(self.goal_threshold >= 0.0) {
            return Err(Error::Config(format!(
                "goal_threshold must be non-negative, got {}",
                self.goal_threshold
            )));
        }
        Ok(())
    }
}

/// Overall environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Robot geometry
    pub geometry: Geometry,
    /// Lower bound of every cable retraction (mm)
    pub action_low: f32,
    /// Upper bound of every cable retraction (mm)
    pub action_high: f32,
    /// Reward shaping
    pub reward: RewardConfig,
    /// Episode termination
    pub termination: TerminationConfig,
    /// Random seed; `None` seeds from system entropy
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            action_low: -11.0,
            action_high: 0.0,
            reward: RewardConfig::default(),
            termination: TerminationConfig::default(),
            seed: None,
        }
    }
}

impl EnvConfig {
    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the robot geometry
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the cable retraction bounds
    pub fn with_action_bounds(mut self, low: f32, high: f32) -> Self {
        self.action_low = low;
        self.action_high = high;
        self
    }

    /// Set the reward shaping
    pub fn with_reward(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    /// Set the step horizon
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.termination.max_steps = max_steps;
        self
    }

    /// Set the goal distance threshold
    pub fn with_goal_threshold(mut self, threshold: f64) -> Self {
        self.termination.goal_threshold = threshold;
        self
    }

    /// Retraction assigned to the slack cable when sampling episodes.
    ///
    /// Zero (cable unshortened), pulled into the action bounds.
    pub fn slack_retraction(&self) -> f32 {
        0.0f32.clamp(self.action_low, self.action_high)
    }

    /// Validate every section of the configuration
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if !(self.action_low.is_finite() && self.action_high.is_finite()) {
            return Err(Error::Config(format!(
                "action bounds must be finite, got [{}, {}]",
                self.action_low, self.action_high
            )));
        }
        if self.action_low > self.action_high {
            return Err(Error::Config(format!(
                "action_low ({}) must not exceed action_high ({})",
                self.action_low, self.action_high
            )));
        }
        self.reward.validate()?;
        self.termination.validate()
    }
}
