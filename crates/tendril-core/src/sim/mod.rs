//! Episodic reaching environment
//!
//! Wraps the [`KinematicModel`](crate::kinematics::KinematicModel) in a
//! reset/step interface: randomized goals, clamped actions, shaped rewards
//! and a fixed step horizon. Any trainer that speaks this interface can
//! drive the robot.
//!
//! # Example
//!
//! ```
//! use tendril_core::sim::{ContinuumEnv, EnvConfig};
//!
//! let mut env = ContinuumEnv::with_config(EnvConfig::default().with_seed(1))?;
//! let obs = env.reset();
//! assert_eq!(obs.to_array().len(), 6);
//!
//! let result = env.step([0.0, -3.0, -6.0])?;
//! assert!(result.info.is_empty());
//! # Ok::<(), tendril_core::Error>(())
//! ```

mod backend;
mod config;
mod continuum;

pub use backend::{EpisodePhase, Environment, Observation, StepInfo, StepResult};
pub use config::{EnvConfig, RewardBracket, RewardConfig, TerminationConfig};
pub use continuum::ContinuumEnv;
