//! Observation and action spaces for reaching policies
//!
//! The policy itself lives with the external trainer; these types describe
//! the shapes and bounds it has to respect.
//!
//! # Example
//!
//! ```
//! use tendril_core::neural::{ActionSpace, ObservationSpace};
//!
//! let obs_space = ObservationSpace::state_goal();
//! let action_space = ActionSpace::cable_retraction(-11.0, 0.0);
//!
//! assert_eq!(obs_space.total_dim, 6);
//! assert_eq!(action_space.dim(), 3);
//! ```

mod spaces;

pub use spaces::{ActionSpace, ObservationSpace, Space, SpaceType};
