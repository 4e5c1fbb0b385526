//! Forward kinematics for a three-cable continuum robot
//!
//! The backbone is approximated as a single circular arc (constant
//! curvature). Three cables are mounted 120° apart on a circle of radius
//! `cable_radius`; retracting them by different amounts bends the arc toward
//! the shortest cable.
//!
//! # Example
//!
//! ```
//! use tendril_core::kinematics::KinematicModel;
//!
//! let model = KinematicModel::default();
//!
//! // Symmetric retraction keeps the robot straight
//! let tip = model.forward([-4.0, -4.0, -4.0]);
//! assert_eq!((tip.x, tip.y, tip.z), (0.0, 0.0, 110.0));
//!
//! // Asymmetric retraction bends it
//! let tip = model.forward([0.0, -5.0, -8.0]);
//! assert!(tip.z < 110.0);
//! ```

mod model;

pub use model::{ArcParameters, Geometry, KinematicModel};
