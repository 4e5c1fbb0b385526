//! Scripted evaluation of a policy over many episodes

use serde::{Deserialize, Serialize};

use crate::math::Vector3;
use crate::sim::Environment;
use crate::{Error, Result};

use super::{slack_cable_projection, Policy};

/// Evaluation session configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Number of episodes to run
    pub episodes: usize,
    /// Best distance (mm) at or below which an episode counts as a success
    pub success_threshold: f64,
    /// Release the least retracted cable when the policy pulls all three
    pub project_slack_cable: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            episodes: 200,
            success_threshold: 3.0,
            project_slack_cable: true,
        }
    }
}

impl EvalConfig {
    /// Set the number of episodes
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    /// Set the success threshold
    pub fn with_success_threshold(mut self, threshold: f64) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Enable or disable the slack-cable projection
    pub fn with_slack_projection(mut self, enabled: bool) -> Self {
        self.project_slack_cable = enabled;
        self
    }
}

/// Outcome of one evaluated episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Episode index within the session
    pub episode: usize,
    /// Smallest tip-to-goal distance seen after any step (mm)
    pub best_distance: f64,
    /// Action that produced the best distance (after projection)
    pub best_action: [f32; 3],
    /// Tip position at the best distance
    pub best_state: Vector3,
    /// Goal of the episode
    pub goal: Vector3,
    /// Number of steps until the episode ended
    pub steps: usize,
    /// Sum of rewards over the episode
    pub episode_return: f64,
}

/// Aggregated results of an evaluation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    /// Per-episode reports in order
    pub reports: Vec<EpisodeReport>,
    /// Mean of the best distances
    pub mean_best_distance: f64,
    /// Episodes whose best distance is within the success threshold
    pub successes: usize,
    /// Running mean of the best distance after each episode
    pub running_means: Vec<f64>,
}

impl EvalSummary {
    /// Aggregate a list of reports
    pub fn from_reports(reports: Vec<EpisodeReport>, success_threshold: f64) -> Self {
        let mut running_means = Vec::with_capacity(reports.len());
        let mut total = 0.0;
        for (i, report) in reports.iter().enumerate() {
            total += report.best_distance;
            running_means.push(total / (i + 1) as f64);
        }
        let successes = reports
            .iter()
            .filter(|r| r.best_distance <= success_threshold)
            .count();

        Self {
            mean_best_distance: running_means.last().copied().unwrap_or(0.0),
            successes,
            running_means,
            reports,
        }
    }

    /// Fraction of successful episodes
    pub fn success_rate(&self) -> f64 {
        if self.reports.is_empty() {
            0.0
        } else {
            self.successes as f64 / self.reports.len() as f64
        }
    }

    /// Episode returns in order
    pub fn returns(&self) -> Vec<f64> {
        self.reports.iter().map(|r| r.episode_return).collect()
    }
}

/// Runs a policy against an environment and records the closest approach
/// to the goal in every episode
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Create an evaluator
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run a single episode until the environment reports `done`
    pub fn run_episode<E, P>(&self, env: &mut E, policy: &mut P, episode: usize) -> Result<EpisodeReport>
    where
        E: Environment + ?Sized,
        P: Policy + ?Sized,
    {
        policy.reset();
        let mut obs = env.reset()?;

        let mut report = EpisodeReport {
            episode,
            best_distance: f64::INFINITY,
            best_action: [0.0; 3],
            best_state: obs.state,
            goal: obs.goal,
            steps: 0,
            episode_return: 0.0,
        };

        loop {
            let mut action = policy.act(&obs);
            if self.config.project_slack_cable {
                action = slack_cable_projection(action);
            }

            let result = env.step(&action)?;
            report.steps += 1;
            report.episode_return += result.reward;

            let distance = result.observation.distance();
            if distance < report.best_distance {
                report.best_distance = distance;
                report.best_action = action;
                report.best_state = result.observation.state;
            }

            obs = result.observation;
            if result.done {
                break;
            }
        }

        tracing::info!(
            episode,
            best_distance = report.best_distance,
            best_action = ?report.best_action,
            steps = report.steps,
            "episode evaluated"
        );
        Ok(report)
    }

    /// Run the configured number of episodes
    pub fn run<E, P>(&self, env: &mut E, policy: &mut P) -> Result<EvalSummary>
    where
        E: Environment + ?Sized,
        P: Policy + ?Sized,
    {
        if self.config.episodes == 0 {
            return Err(Error::Config("episodes must be at least 1".into()));
        }

        let reports = (0..self.config.episodes)
            .map(|ep| self.run_episode(env, policy, ep))
            .collect::<Result<Vec<_>>>()?;
        let summary = EvalSummary::from_reports(reports, self.config.success_threshold);

        tracing::info!(
            episodes = summary.reports.len(),
            mean_best_distance = summary.mean_best_distance,
            successes = summary.successes,
            "evaluation finished"
        );
        Ok(summary)
    }
}

/// Average consecutive blocks of `window` values; the last block may be short.
///
/// Used to smooth per-episode returns into a training curve.
pub fn windowed_means(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }
    values
        .chunks(window)
        .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::RandomPolicy;
    use crate::sim::{ContinuumEnv, EnvConfig, Observation};
    use approx::assert_relative_eq;

    fn env(seed: u64, max_steps: usize) -> ContinuumEnv {
        ContinuumEnv::with_config(EnvConfig::default().with_seed(seed).with_max_steps(max_steps))
            .unwrap()
    }

    fn report(best_distance: f64) -> EpisodeReport {
        EpisodeReport {
            episode: 0,
            best_distance,
            best_action: [0.0; 3],
            best_state: Vector3::zeros(),
            goal: Vector3::zeros(),
            steps: 1,
            episode_return: 0.0,
        }
    }

    #[test]
    fn test_summary_statistics() {
        let summary = EvalSummary::from_reports(vec![report(2.0), report(4.0), report(3.0)], 3.0);
        assert_eq!(summary.successes, 2);
        assert_relative_eq!(summary.mean_best_distance, 3.0);
        assert_eq!(summary.running_means, vec![2.0, 3.0, 3.0]);
        assert_relative_eq!(summary.success_rate(), 2.0 / 3.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = EvalSummary::from_reports(Vec::new(), 3.0);
        assert_eq!(summary.mean_best_distance, 0.0);
        assert_eq!(summary.success_rate(), 0.0);
    }

    #[test]
    fn test_episode_runs_to_horizon() {
        let mut env = env(1, 25);
        // Pulls every cable by the same amount, so the tip never leaves the
        // straight position unless the projection releases one.
        let mut policy = |_: &Observation| [-6.0f32, -6.0, -6.0];

        let evaluator = Evaluator::new(EvalConfig::default().with_slack_projection(false));
        let report = evaluator.run_episode(&mut env, &mut policy, 0).unwrap();
        assert_eq!(report.steps, 25);
        assert_eq!(report.best_state, env.model().straight_position());
        assert_eq!(report.best_action, [-6.0, -6.0, -6.0]);
    }

    #[test]
    fn test_projection_applied_to_actions() {
        let mut env = env(2, 5);
        let mut policy = |_: &Observation| [-6.0f32, -3.0, -9.0];

        let evaluator = Evaluator::new(EvalConfig::default());
        let report = evaluator.run_episode(&mut env, &mut policy, 0).unwrap();
        assert_eq!(report.best_action, [-6.0, 0.0, -9.0]);
        assert_eq!(report.best_state, env.model().forward_f32([-6.0, 0.0, -9.0]));
    }

    #[test]
    fn test_goal_seeking_policy_succeeds() {
        // Cheating policy: replays the cable triple that produced the goal.
        let mut env = env(3, 10);
        let obs = env.reset_to([0.0, 0.0, 0.0], [0.0, -5.0, -8.0]);
        let mut policy = |_: &Observation| [0.0f32, -5.0, -8.0];
        let result = env.step(policy.act(&obs)).unwrap();
        assert!(result.done);
        assert_eq!(result.observation.distance(), 0.0);
    }

    #[test]
    fn test_run_collects_reports() {
        let mut env = env(4, 20);
        let mut policy = RandomPolicy::new(-11.0, 0.0, 4);
        let evaluator = Evaluator::new(EvalConfig::default().with_episodes(6));

        let summary = evaluator.run(&mut env, &mut policy).unwrap();
        assert_eq!(summary.reports.len(), 6);
        assert_eq!(summary.running_means.len(), 6);
        for (i, r) in summary.reports.iter().enumerate() {
            assert_eq!(r.episode, i);
            assert!(r.steps >= 1 && r.steps <= 20);
            assert!(r.best_distance.is_finite());
        }
        assert_eq!(summary.returns().len(), 6);
    }

    #[test]
    fn test_run_through_trait_object() {
        let mut env: Box<dyn Environment> = Box::new(env(5, 3));
        let mut policy: Box<dyn Policy> = Box::new(RandomPolicy::new(-11.0, 0.0, 5));
        let evaluator = Evaluator::new(EvalConfig::default().with_episodes(2));
        let summary = evaluator.run(env.as_mut(), policy.as_mut()).unwrap();
        assert_eq!(summary.reports.len(), 2);
    }

    #[test]
    fn test_zero_episodes_rejected() {
        let mut env = env(6, 3);
        let mut policy = RandomPolicy::new(-11.0, 0.0, 6);
        let evaluator = Evaluator::new(EvalConfig::default().with_episodes(0));
        assert!(matches!(
            evaluator.run(&mut env, &mut policy),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_windowed_means() {
        let values = [1.0, 3.0, 5.0, 7.0, 10.0];
        assert_eq!(windowed_means(&values, 2), vec![2.0, 6.0, 10.0]);
        assert_eq!(windowed_means(&values, 5), vec![5.2]);
        assert!(windowed_means(&values, 0).is_empty());
        assert!(windowed_means(&[], 3).is_empty());
    }
}
