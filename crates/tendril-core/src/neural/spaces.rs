//! Observation and action space definitions
//!
//! Defines the structure of inputs (observations) and outputs (actions)
//! for reaching policies.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Type of space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpaceType {
    /// Continuous values in a range
    Box {
        low: Vec<f32>,
        high: Vec<f32>,
        shape: Vec<usize>,
    },
}

/// A generic space definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    /// Name of the space
    pub name: String,
    /// Type and bounds
    pub space_type: SpaceType,
    /// Data type (float32, int32, etc.)
    pub dtype: String,
}

impl Space {
    /// Create a continuous box space with the same bounds on every element
    pub fn box_space(name: impl Into<String>, shape: Vec<usize>, low: f32, high: f32) -> Self {
        let size: usize = shape.iter().product();
        Self::box_bounds(name, vec![low; size], vec![high; size])
    }

    /// Create a flat continuous box space with per-element bounds
    pub fn box_bounds(name: impl Into<String>, low: Vec<f32>, high: Vec<f32>) -> Self {
        debug_assert_eq!(low.len(), high.len());
        let shape = vec![low.len()];
        Self {
            name: name.into(),
            space_type: SpaceType::Box { low, high, shape },
            dtype: "float32".into(),
        }
    }

    /// Get the total size of the space
    pub fn size(&self) -> usize {
        match &self.space_type {
            SpaceType::Box { shape, .. } => shape.iter().product(),
        }
    }

    /// Get the shape of the space
    pub fn shape(&self) -> Vec<usize> {
        match &self.space_type {
            SpaceType::Box { shape, .. } => shape.clone(),
        }
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: &[f32]) -> bool {
        match &self.space_type {
            SpaceType::Box { low, high, .. } => {
                if value.len() != low.len() {
                    return false;
                }
                value
                    .iter()
                    .zip(low.iter().zip(high.iter()))
                    .all(|(v, (l, h))| *v >= *l && *v <= *h)
            }
        }
    }

    /// Clip values to be within bounds
    pub fn clip(&self, value: &mut [f32]) {
        let SpaceType::Box { low, high, .. } = &self.space_type;
        for (v, (l, h)) in value.iter_mut().zip(low.iter().zip(high.iter())) {
            *v = v.clamp(*l, *h);
        }
    }

    /// Lower bounds per element
    pub fn low(&self) -> &[f32] {
        let SpaceType::Box { low, .. } = &self.space_type;
        low
    }

    /// Upper bounds per element
    pub fn high(&self) -> &[f32] {
        let SpaceType::Box { high, .. } = &self.space_type;
        high
    }
}

/// Observation space for a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    /// Component spaces (e.g., "state", "goal")
    pub components: Vec<Space>,
    /// Total observation dimension
    pub total_dim: usize,
}

impl ObservationSpace {
    /// Create a new observation space from components
    pub fn new(components: Vec<Space>) -> Self {
        let total_dim = components.iter().map(|s| s.size()).sum();
        Self {
            components,
            total_dim,
        }
    }

    /// Tip position followed by goal position, both unbounded (6-dim)
    pub fn state_goal() -> Self {
        Self::new(vec![
            Space::box_space("state", vec![3], f32::NEG_INFINITY, f32::INFINITY),
            Space::box_space("goal", vec![3], f32::NEG_INFINITY, f32::INFINITY),
        ])
    }

    /// Look up a component by name
    pub fn component(&self, name: &str) -> Option<&Space> {
        self.components.iter().find(|s| s.name == name)
    }
}

/// Action space for a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpace {
    /// The action space definition
    pub space: Space,
}

impl ActionSpace {
    /// Create a new action space
    pub fn new(space: Space) -> Self {
        Self { space }
    }

    /// Three cable retractions sharing the same bounds
    pub fn cable_retraction(low: f32, high: f32) -> Self {
        Self::new(Space::box_space("cable_retraction", vec![3], low, high))
    }

    /// Get the action dimension
    pub fn dim(&self) -> usize {
        self.space.size()
    }

    /// Lower bounds per element
    pub fn low(&self) -> &[f32] {
        self.space.low()
    }

    /// Upper bounds per element
    pub fn high(&self) -> &[f32] {
        self.space.high()
    }

    /// Check if an action is within bounds
    pub fn contains(&self, actions: &[f32]) -> bool {
        self.space.contains(actions)
    }

    /// Clip actions into bounds
    pub fn process(&self, actions: &mut [f32]) {
        self.space.clip(actions);
    }

    /// Draw an action uniformly from the box
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f32> {
        self.low()
            .iter()
            .zip(self.high())
            .map(|(&l, &h)| if l < h { rng.gen_range(l..=h) } else { l })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_box_space() {
        let space = Space::box_space("test", vec![3], -1.0, 1.0);
        assert_eq!(space.size(), 3);
        assert_eq!(space.shape(), vec![3]);
        assert!(space.contains(&[0.0, 0.5, -0.5]));
        assert!(!space.contains(&[2.0, 0.0, 0.0]));
        assert!(!space.contains(&[0.0, 0.0]));
    }

    #[test]
    fn test_box_bounds() {
        let space = Space::box_bounds("mixed", vec![-1.0, 0.0], vec![1.0, 5.0]);
        assert_eq!(space.shape(), vec![2]);
        assert!(space.contains(&[0.5, 4.0]));
        assert!(!space.contains(&[0.5, -0.1]));
        assert_eq!(space.dtype, "float32");
    }

    #[test]
    fn test_observation_space() {
        let obs = ObservationSpace::state_goal();
        assert_eq!(obs.total_dim, 6);
        assert!(obs.component("goal").is_some());
        assert!(obs.components[0].contains(&[1e30, -1e30, 0.0]));
    }

    #[test]
    fn test_action_space_clip() {
        let action = ActionSpace::cable_retraction(-11.0, 0.0);
        assert_eq!(action.dim(), 3);
        assert_eq!(action.low().to_vec(), vec![-11.0f32; 3]);
        assert_eq!(action.high().to_vec(), vec![0.0f32; 3]);

        let mut actions = [-20.0f32, 3.0, -4.5];
        action.process(&mut actions);
        assert_eq!(actions, [-11.0, 0.0, -4.5]);
        assert!(action.contains(&actions));
    }

    #[test]
    fn test_action_space_sample() {
        let action = ActionSpace::cable_retraction(-11.0, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let sample = action.sample(&mut rng);
            assert!(action.contains(&sample));
        }
    }
}
