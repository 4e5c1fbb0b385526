//! Math utilities shared by the kinematic model and the environment
//!
//! Positions are nalgebra vectors in millimeters; everything internal is
//! computed in `f64` and only narrowed to `f32` at the policy boundary.

/// Type alias for 3D vectors
pub type Vector3 = nalgebra::Vector3<f64>;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
    (a - b).norm()
}

/// Compare two values with an absolute tolerance
///
/// A tolerance of `0.0` is exact equality, so callers can opt into
/// tolerant comparisons without changing the default behavior.
#[inline]
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    if tolerance == 0.0 {
        a == b
    } else {
        (a - b).abs() <= tolerance
    }
}

/// Check that all three values agree within `tolerance`
#[inline]
pub fn all_equal(values: [f64; 3], tolerance: f64) -> bool {
    within_tolerance(values[0], values[1], tolerance)
        && within_tolerance(values[1], values[2], tolerance)
        && within_tolerance(values[0], values[2], tolerance)
}

/// Normalize an angle to [-π, π]
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    const TWO_PI: f64 = 2.0 * std::f64::consts::PI;
    const INV_TWO_PI: f64 = 1.0 / TWO_PI;
    angle - TWO_PI * (angle * INV_TWO_PI + 0.5).floor()
}

/// Wrap angle difference to [-π, π] for shortest path
#[inline]
pub fn angle_diff(target: f64, current: f64) -> f64 {
    normalize_angle(target - current)
}
