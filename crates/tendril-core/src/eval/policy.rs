//! Policies that produce cable retractions from observations

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::neural::ActionSpace;
use crate::sim::Observation;

/// Trait for controllers driving the environment
pub trait Policy {
    /// Choose the next cable triple
    fn act(&mut self, observation: &Observation) -> [f32; 3];

    /// Called at the start of every episode
    fn reset(&mut self) {}
}

impl<F> Policy for F
where
    F: FnMut(&Observation) -> [f32; 3],
{
    fn act(&mut self, observation: &Observation) -> [f32; 3] {
        self(observation)
    }
}

/// Samples actions uniformly from the cable retraction box
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    space: ActionSpace,
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    /// Create a seeded random policy over `[low, high]³`
    pub fn new(low: f32, high: f32, seed: u64) -> Self {
        Self {
            space: ActionSpace::cable_retraction(low, high),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> [f32; 3] {
        let sample = self.space.sample(&mut self.rng);
        [sample[0], sample[1], sample[2]]
    }
}

/// Keep at least one cable slack.
///
/// If no retraction is exactly zero, the least retracted cable (the largest
/// value, first on ties) is released to zero so that at most two cables pull
/// at the same time.
pub fn slack_cable_projection(action: [f32; 3]) -> [f32; 3] {
    if action.iter().any(|&a| a == 0.0) {
        return action;
    }

    let mut max_index = 0;
    for (i, &a) in action.iter().enumerate().skip(1) {
        if a > action[max_index] {
            max_index = i;
        }
    }

    let mut projected = action;
    projected[max_index] = 0.0;
    projected
}
