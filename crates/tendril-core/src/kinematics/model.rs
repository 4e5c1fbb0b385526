//! Constant-curvature forward model

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::math::{all_equal, Vector3};
use crate::{Error, Result};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Fixed geometry of the robot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Backbone length with no cable retracted (mm)
    pub base_length: f64,
    /// Radius of the circle the three cables are mounted on (mm)
    pub cable_radius: f64,
    /// Absolute tolerance for detecting the straight configuration.
    ///
    /// `0.0` means exact equality of the deltas or of the segment lengths.
    pub degenerate_tolerance: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            base_length: 110.0,
            cable_radius: 5.0,
            degenerate_tolerance: 0.0,
        }
    }
}

impl Geometry {
    /// Create a geometry with exact degeneracy detection
    pub fn new(base_length: f64, cable_radius: f64) -> Self {
        Self {
            base_length,
            cable_radius,
            ..Default::default()
        }
    }

    /// Set the straight-configuration tolerance
    pub fn with_degenerate_tolerance(mut self, tolerance: f64) -> Self {
        self.degenerate_tolerance = tolerance;
        self
    }

    /// Check that the geometry describes a physical robot
    pub fn validate(&self) -> Result<()> {
        if !(self.base_length.is_finite() && self.base_length > 0.0) {
            return Err(Error::Config(format!(
                "base_length must be positive and finite, got {}",
                self.base_length
            )));
        }
        if !(self.cable_radius.is_finite() && self.cable_radius > 0.0) {
            return Err(Error::Config(format!(
                "cable_radius must be positive and finite, got {}",
                self.cable_radius
            )));
        }
        if !(self.degenerate_tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "degenerate_tolerance must be non-negative, got {}",
                self.degenerate_tolerance
            )));
        }
        Ok(())
    }
}

/// Arc parameters of a bent configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcParameters {
    /// Curvature (1/mm), always positive
    pub kappa: f64,
    /// Bending angle measure (rad), within [-π/2, π/2]
    pub theta: f64,
    /// Azimuth of the bending plane (rad)
    pub phi: f64,
}

impl ArcParameters {
    /// Tip position of an arc of length `base_length` with these parameters
    pub fn tip_position(&self, base_length: f64) -> Vector3 {
        let half = (self.kappa * base_length / 2.0).sin();
        let planar = (2.0 / self.kappa) * half * half;
        Vector3::new(
            planar * self.phi.cos(),
            planar * self.phi.sin(),
            (self.kappa * base_length).sin() / self.kappa,
        )
    }
}

/// Maps three cable retractions to an end-effector position.
///
/// The model is a pure function of its input: it never fails, and any input
/// outside the region where the arc approximation holds (including NaN and
/// infinities) maps to the straight configuration `(0, 0, base_length)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicModel {
    geometry: Geometry,
}

impl KinematicModel {
    /// Create a model with the given geometry
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Get the geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Position of the unbent robot
    #[inline]
    pub fn straight_position(&self) -> Vector3 {
        Vector3::new(0.0, 0.0, self.geometry.base_length)
    }

    /// Upper bound on the distance from the base to the tip.
    ///
    /// The tip sits at the end of a chord of the backbone arc, which is never
    /// longer than the arc itself.
    #[inline]
    pub fn max_reach(&self) -> f64 {
        self.geometry.base_length
    }

    /// Effective segment lengths for the given retractions
    #[inline]
    pub fn segment_lengths(&self, deltas: [f64; 3]) -> [f64; 3] {
        deltas.map(|d| self.geometry.base_length + d)
    }

    /// Arc parameters for the given retractions, or `None` when the robot
    /// stays straight (symmetric retraction or invalid arc)
    pub fn arc_parameters(&self, deltas: [f64; 3]) -> Option<ArcParameters> {
        let tolerance = self.geometry.degenerate_tolerance;
        let lengths = self.segment_lengths(deltas);
        if all_equal(deltas, tolerance) || all_equal(lengths, tolerance) {
            return None;
        }

        let [l1, l2, l3] = lengths;
        // Non-negative in exact arithmetic; rounding can push it just below zero.
        let radicand = (l1 * l1 + l2 * l2 + l3 * l3 - l1 * l2 - l1 * l3 - l2 * l3).max(0.0);
        let spread = 2.0 * radicand.sqrt();
        let r = self.geometry.cable_radius;

        let kappa = spread / (r * (l1 + l2 + l3));
        let theta = spread / (r * 3.0);
        let phi = f64::atan2(SQRT_3 * (l2 + l3 - 2.0 * l1), 3.0 * (l2 - l3));

        let valid = (-FRAC_PI_2..=FRAC_PI_2).contains(&theta) && kappa > 0.0 && kappa.is_finite();
        if !valid {
            tracing::trace!(?deltas, kappa, theta, "arc approximation invalid, keeping robot straight");
            return None;
        }

        Some(ArcParameters { kappa, theta, phi })
    }

    /// End-effector position for cable retractions `[d1, d2, d3]`
    pub fn forward(&self, deltas: [f64; 3]) -> Vector3 {
        let Some(arc) = self.arc_parameters(deltas) else {
            return self.straight_position();
        };

        let tip = arc.tip_position(self.geometry.base_length);
        if tip.iter().all(|c| c.is_finite()) {
            tip
        } else {
            self.straight_position()
        }
    }

    /// Convenience wrapper over [`forward`](Self::forward) for `f32` actions
    #[inline]
    pub fn forward_f32(&self, deltas: [f32; 3]) -> Vector3 {
        self.forward(deltas.map(f64::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::angle_diff;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn grid() -> impl Iterator<Item = [f64; 3]> {
        let steps: Vec<f64> = (0..=11).map(|i| -(i as f64)).collect();
        let mut out = Vec::new();
        for &a in &steps {
            for &b in &steps {
                for &c in &steps {
                    out.push([a, b, c]);
                }
            }
        }
        out.into_iter()
    }

    #[test]
    fn test_equal_deltas_stay_straight() {
        let model = KinematicModel::default();
        for i in 0..=110 {
            let d = -(i as f64) * 0.1;
            assert_eq!(model.forward([d, d, d]), Vector3::new(0.0, 0.0, 110.0));
        }
    }

    #[test]
    fn test_concrete_straight_cases() {
        let model = KinematicModel::default();
        assert_eq!(model.forward([0.0, 0.0, 0.0]), Vector3::new(0.0, 0.0, 110.0));
        assert_eq!(model.forward([-11.0, -11.0, -11.0]), Vector3::new(0.0, 0.0, 110.0));
    }

    #[test]
    fn test_equal_lengths_with_different_deltas() {
        let model = KinematicModel::default();
        // Below the spacing of f64 values near 110, so the lengths collapse.
        let deltas = [0.0, 1e-15, -1e-15];
        assert_ne!(deltas[0], deltas[1]);
        assert!(model.arc_parameters(deltas).is_none());
        assert_eq!(model.forward(deltas), model.straight_position());
    }

    #[test]
    fn test_asymmetric_retraction_bends() {
        let model = KinematicModel::default();
        let tip = model.forward([0.0, -5.0, -8.0]);
        assert!(tip.x != 0.0 || tip.y != 0.0);
        assert!(tip.z < 110.0);

        // Q = 49 for lengths (110, 105, 102)
        let arc = model.arc_parameters([0.0, -5.0, -8.0]).unwrap();
        assert_relative_eq!(arc.theta, 14.0 / 15.0, epsilon = 1e-12);
        assert_relative_eq!(arc.kappa, 14.0 / (5.0 * 317.0), epsilon = 1e-12);
    }

    #[test]
    fn test_bends_toward_shortest_cable() {
        let model = KinematicModel::default();
        // Only cable 1 retracted: l2 == l3 puts the bending plane at phi = π/2.
        let tip = model.forward([-11.0, 0.0, 0.0]);
        assert_relative_eq!(tip.x, 0.0, epsilon = 1e-9);
        assert!(tip.y.abs() > 1.0);
    }

    #[test]
    fn test_rotational_symmetry() {
        let model = KinematicModel::default();
        let base = [0.0, -5.0, -8.0];
        let rotated = [base[1], base[2], base[0]];

        let a = model.arc_parameters(base).unwrap();
        let b = model.arc_parameters(rotated).unwrap();
        assert_relative_eq!(a.kappa, b.kappa, epsilon = 1e-12);
        assert_relative_eq!(angle_diff(b.phi, a.phi).abs(), 2.0 * PI / 3.0, epsilon = 1e-9);

        let pa = model.forward(base);
        let pb = model.forward(rotated);
        assert_relative_eq!(pa.z, pb.z, epsilon = 1e-9);
        assert_relative_eq!(pa.xy().norm(), pb.xy().norm(), epsilon = 1e-9);
    }

    #[test]
    fn test_workspace_bounds() {
        let model = KinematicModel::default();
        for deltas in grid() {
            let tip = model.forward(deltas);
            assert!(tip.z > 0.0 && tip.z <= 110.0, "z out of range for {:?}: {}", deltas, tip.z);
            assert!(tip.xy().norm() <= model.max_reach());
            assert!(tip.norm() <= model.max_reach() + 1e-9);
        }
    }

    #[test]
    fn test_deterministic() {
        let model = KinematicModel::default();
        for deltas in grid().take(200) {
            assert_eq!(model.forward(deltas), model.forward(deltas));
        }
    }

    #[test]
    fn test_total_over_reals() {
        let model = KinematicModel::default();
        let inputs = [
            [f64::NAN, 0.0, 0.0],
            [f64::INFINITY, 0.0, -1.0],
            [f64::NEG_INFINITY, f64::INFINITY, 0.0],
            [-110.0, -110.0, -109.0],
            [-500.0, 20.0, 3.0],
            [1e300, -1e300, 0.0],
        ];
        for deltas in inputs {
            let tip = model.forward(deltas);
            assert!(tip.iter().all(|c| c.is_finite()), "non-finite tip for {:?}", deltas);
        }
    }

    #[test]
    fn test_large_bend_falls_back_to_straight() {
        let model = KinematicModel::default();
        // Spread of 60 mm gives theta = 2·sqrt(Q)/15 far beyond π/2.
        let deltas = [0.0, -60.0, -30.0];
        assert!(model.arc_parameters(deltas).is_none());
        assert_eq!(model.forward(deltas), model.straight_position());
    }

    #[test]
    fn test_degenerate_tolerance() {
        let exact = KinematicModel::default();
        let tolerant = KinematicModel::new(Geometry::default().with_degenerate_tolerance(1e-2));
        let deltas = [-3.0, -3.001, -3.0];

        assert!(exact.arc_parameters(deltas).is_some());
        assert_eq!(tolerant.forward(deltas), tolerant.straight_position());
    }

    #[test]
    fn test_geometry_validation() {
        assert!(Geometry::default().validate().is_ok());
        assert!(Geometry::new(0.0, 5.0).validate().is_err());
        assert!(Geometry::new(110.0, -1.0).validate().is_err());
        assert!(Geometry::new(f64::NAN, 5.0).validate().is_err());
        assert!(Geometry::default()
            .with_degenerate_tolerance(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_forward_f32_matches_f64() {
        let model = KinematicModel::default();
        assert_eq!(
            model.forward_f32([0.0, -5.0, -8.0]),
            model.forward([0.0, -5.0, -8.0])
        );
    }
}
