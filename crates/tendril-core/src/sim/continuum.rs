//! Goal-reaching environment for the continuum robot

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::kinematics::KinematicModel;
use crate::math::{distance, Vector3};
use crate::neural::{ActionSpace, ObservationSpace};
use crate::{Error, Result};

use super::{EnvConfig, Environment, EpisodePhase, Observation, StepInfo, StepResult};

#[derive(Debug, Clone)]
struct Episode {
    state: Vector3,
    goal: Vector3,
    steps: usize,
    episode_return: f64,
    phase: EpisodePhase,
}

/// Drives the tip of the continuum robot toward a random goal.
///
/// Each episode draws a goal and a start position by pushing random cable
/// retractions through the [`KinematicModel`]. Every step clamps the action
/// into bounds, moves the tip to the image of the clamped action, and pays a
/// shaped reward based on the change in distance to the goal.
///
/// A single instance is not meant to be shared between threads; run one
/// instance per worker for parallel rollouts.
#[derive(Debug, Clone)]
pub struct ContinuumEnv {
    config: EnvConfig,
    model: KinematicModel,
    action_space: ActionSpace,
    observation_space: ObservationSpace,
    rng: ChaCha8Rng,
    episode: Option<Episode>,
}

impl ContinuumEnv {
    /// Create an environment with the default configuration
    pub fn new() -> Self {
        Self::build(EnvConfig::default())
    }

    /// Create an environment with a custom configuration
    pub fn with_config(config: EnvConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EnvConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            model: KinematicModel::new(config.geometry),
            action_space: ActionSpace::cable_retraction(config.action_low, config.action_high),
            observation_space: ObservationSpace::state_goal(),
            rng,
            episode: None,
            config,
        }
    }

    /// Get the kinematic model
    pub fn model(&self) -> &KinematicModel {
        &self.model
    }

    /// Re-seed the episode generator
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Draw a cable triple for episode generation.
    ///
    /// All three retractions are uniform within the action bounds, then one
    /// cable chosen uniformly at random is left slack.
    pub fn sample_actuation(&mut self) -> [f32; 3] {
        let (low, high) = (self.config.action_low, self.config.action_high);
        let mut deltas = [0.0f32; 3];
        for d in deltas.iter_mut() {
            *d = self.rng.gen_range(low..=high);
        }
        let slack = self.rng.gen_range(0..3);
        deltas[slack] = self.config.slack_retraction();
        deltas
    }

    /// Start a new episode with a random goal and start position
    pub fn reset(&mut self) -> Observation {
        let goal_deltas = self.sample_actuation();
        let start_deltas = self.sample_actuation();
        tracing::debug!(?goal_deltas, ?start_deltas, "sampled episode");
        self.begin(start_deltas, goal_deltas)
    }

    /// Start a new episode from explicit cable triples.
    ///
    /// Both triples are clamped into the action bounds before being mapped
    /// through the model.
    pub fn reset_to(&mut self, start: [f32; 3], goal: [f32; 3]) -> Observation {
        self.begin(start, goal)
    }

    fn begin(&mut self, mut start: [f32; 3], mut goal: [f32; 3]) -> Observation {
        self.action_space.process(&mut start);
        self.action_space.process(&mut goal);

        let episode = Episode {
            state: self.model.forward_f32(start),
            goal: self.model.forward_f32(goal),
            steps: 0,
            episode_return: 0.0,
            phase: EpisodePhase::Running,
        };
        let obs = Observation::new(episode.state, episode.goal);
        tracing::debug!(
            state = ?obs.state.as_slice(),
            goal = ?obs.goal.as_slice(),
            distance = obs.distance(),
            "episode reset"
        );
        self.episode = Some(episode);
        obs
    }

    /// Apply one cable triple and advance the episode
    ///
    /// # Errors
    /// [`Error::InvalidState`] before the first reset or after the episode
    /// has ended.
    pub fn step(&mut self, action: [f32; 3]) -> Result<StepResult> {
        let Some(episode) = self.episode.as_mut() else {
            return Err(Error::InvalidState(
                "reset() must be called before step()".into(),
            ));
        };
        if episode.phase == EpisodePhase::Done {
            return Err(Error::InvalidState(
                "episode is done; call reset() to start a new one".into(),
            ));
        }

        let mut action = action;
        self.action_space.process(&mut action);

        let new_state = self.model.forward_f32(action);
        let new_distance = distance(&episode.goal, &new_state);
        let old_distance = distance(&episode.goal, &episode.state);
        let reward = self.config.reward.reward(old_distance, new_distance);

        episode.state = new_state;
        episode.steps += 1;
        episode.episode_return += reward;

        let termination = &self.config.termination;
        let reached = new_distance < termination.goal_threshold;
        let timed_out = episode.steps >= termination.max_steps;
        let done = reached || timed_out;

        tracing::trace!(
            step = episode.steps,
            ?action,
            new_distance,
            reward,
            "step"
        );
        if reached {
            tracing::info!(
                state = ?new_state.as_slice(),
                goal = ?episode.goal.as_slice(),
                distance = new_distance,
                steps = episode.steps,
                "goal reached"
            );
        } else if timed_out {
            tracing::debug!(
                distance = new_distance,
                episode_return = episode.episode_return,
                "episode horizon reached"
            );
        }
        if done {
            episode.phase = EpisodePhase::Done;
        }

        Ok(StepResult {
            observation: Observation::new(episode.state, episode.goal),
            reward,
            done,
            info: StepInfo::new(),
        })
    }

    /// Current observation, if an episode has been started
    pub fn observation(&self) -> Option<Observation> {
        self.episode
            .as_ref()
            .map(|e| Observation::new(e.state, e.goal))
    }

    /// Current tip position
    pub fn state(&self) -> Option<Vector3> {
        self.episode.as_ref().map(|e| e.state)
    }

    /// Goal of the running episode
    pub fn goal(&self) -> Option<Vector3> {
        self.episode.as_ref().map(|e| e.goal)
    }

    /// Distance from the tip to the goal
    pub fn distance_to_goal(&self) -> Option<f64> {
        self.episode.as_ref().map(|e| distance(&e.goal, &e.state))
    }

    /// Steps taken in the current episode
    pub fn steps(&self) -> usize {
        self.episode.as_ref().map_or(0, |e| e.steps)
    }

    /// Sum of rewards in the current episode
    pub fn episode_return(&self) -> f64 {
        self.episode.as_ref().map_or(0.0, |e| e.episode_return)
    }

    /// Phase of the current episode, `None` before the first reset
    pub fn phase(&self) -> Option<EpisodePhase> {
        self.episode.as_ref().map(|e| e.phase)
    }

    /// One-line text rendering of the current episode
    pub fn render(&self) -> String {
        match &self.episode {
            Some(e) => format!(
                "State: [{:.3}, {:.3}, {:.3}]. Goal: [{:.3}, {:.3}, {:.3}]. Distance: {:.3}",
                e.state.x,
                e.state.y,
                e.state.z,
                e.goal.x,
                e.goal.y,
                e.goal.z,
                distance(&e.goal, &e.state)
            ),
            None => "No episode (call reset)".to_string(),
        }
    }
}

impl Default for ContinuumEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for ContinuumEnv {
    fn name(&self) -> &str {
        "continuum_reach"
    }

    fn config(&self) -> &EnvConfig {
        &self.config
    }

    fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    fn observation_space(&self) -> &ObservationSpace {
        &self.observation_space
    }

    fn reset(&mut self) -> Result<Observation> {
        Ok(ContinuumEnv::reset(self))
    }

    fn step(&mut self, action: &[f32]) -> Result<StepResult> {
        let action: [f32; 3] = action.try_into().map_err(|_| Error::Dimension {
            expected: 3,
            actual: action.len(),
        })?;
        ContinuumEnv::step(self, action)
    }

    fn observation(&self) -> Option<Observation> {
        ContinuumEnv::observation(self)
    }
}
