//! Evaluation sessions
//!
//! Runs a [`Policy`] for a number of episodes and reports, per episode, the
//! closest the tip came to the goal. This replaces ad-hoc test scripts with
//! an explicit, configurable session object.
//!
//! # Example
//!
//! ```
//! use tendril_core::eval::{EvalConfig, Evaluator, RandomPolicy};
//! use tendril_core::sim::{ContinuumEnv, EnvConfig};
//!
//! let mut env = ContinuumEnv::with_config(EnvConfig::default().with_seed(3).with_max_steps(50))?;
//! let mut policy = RandomPolicy::new(-11.0, 0.0, 3);
//!
//! let summary = Evaluator::new(EvalConfig::default().with_episodes(4)).run(&mut env, &mut policy)?;
//! assert_eq!(summary.reports.len(), 4);
//! # Ok::<(), tendril_core::Error>(())
//! ```

mod evaluator;
mod policy;

pub use evaluator::{windowed_means, EpisodeReport, EvalConfig, EvalSummary, Evaluator};
pub use policy::{slack_cable_projection, Policy, RandomPolicy};
