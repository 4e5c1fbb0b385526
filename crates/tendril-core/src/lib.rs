//! tendril-core: Simulation core for a three-cable continuum robot
//!
//! A cable-driven soft arm bends when its three actuation cables are
//! retracted by different amounts. This crate maps cable retractions to an
//! end-effector position and wraps that map in an episodic reaching task
//! that an external reinforcement-learning trainer can drive.
//!
//! # Modules
//!
//! - [`kinematics`] - Constant-curvature forward model
//! - [`neural`] - Observation/action space definitions (policy code lives with the trainer)
//! - [`sim`] - Reaching environment, reward shaping and configuration
//! - [`eval`] - Scripted evaluation sessions over a policy
//! - [`math`] - Vector aliases and small numeric helpers
//!
//! # Architecture
//!
//! ```text
//! Trainer (Python)                     Rust (tendril-core)
//! ┌──────────────┐                    ┌──────────────┐      ┌────────────────┐
//! │ actor-critic │───actions (3)─────►│ ContinuumEnv │─────►│ KinematicModel │
//! │    policy    │◄──obs (6), reward──│              │◄─xyz─│                │
//! └──────────────┘                    └──────────────┘      └────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use tendril_core::{ContinuumEnv, EnvConfig};
//!
//! let mut env = ContinuumEnv::with_config(EnvConfig::default().with_seed(7)).unwrap();
//! let obs = env.reset();
//! let result = env.step([0.0, -5.0, -8.0]).unwrap();
//! assert_eq!(result.observation.goal, obs.goal);
//! ```

#![warn(unused_must_use)]

pub mod eval;
pub mod kinematics;
pub mod math;
pub mod neural;
pub mod sim;

// Re-exports for convenience
pub use eval::{EvalConfig, EvalSummary, Evaluator, Policy, RandomPolicy};
pub use kinematics::{ArcParameters, Geometry, KinematicModel};
pub use neural::{ActionSpace, ObservationSpace, Space, SpaceType};
pub use sim::{
    ContinuumEnv, EnvConfig, Environment, EpisodePhase, Observation, RewardConfig, StepInfo,
    StepResult, TerminationConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for tendril-core
///
/// Numeric input never produces an error: out-of-range actions are clamped
/// and singular geometries fall back to the straight configuration. Errors
/// only report misuse of the API.
///
/// # Example
/// ```
/// use tendril_core::{ContinuumEnv, Error};
///
/// let mut env = ContinuumEnv::new();
/// match env.step([0.0, 0.0, 0.0]) {
///     Err(Error::InvalidState(msg)) => assert!(msg.contains("reset")),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
#[must_use = "errors must be handled or explicitly ignored with let _ = ..."]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration parameter.
    /// Handle by: validating config before use, checking parameter ranges.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A slice of the wrong length was passed where a fixed arity is required.
    /// Handle by: sending exactly `expected` values.
    #[error("Dimension mismatch: expected {expected} values, got {actual}")]
    Dimension { expected: usize, actual: usize },

    /// Operation attempted in invalid state (e.g., stepping a finished episode).
    /// Handle by: calling `reset` to start a new episode.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for tendril-core operations
pub type Result<T> = std::result::Result<T, Error>;
