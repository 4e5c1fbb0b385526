//! Python type bindings
//!
//! Wrapper types that expose tendril-core functionality to Python.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use tendril_core::Error;

fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::Config(_) | Error::Dimension { .. } => PyValueError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

// ============================================================================
// Kinematics Bindings
// ============================================================================

/// Fixed robot geometry
#[pyclass(name = "Geometry")]
#[derive(Clone)]
pub struct PyGeometry {
    pub(crate) inner: tendril_core::Geometry,
}

#[pymethods]
impl PyGeometry {
    #[new]
    #[pyo3(signature = (base_length = 110.0, cable_radius = 5.0, degenerate_tolerance = 0.0))]
    fn new(base_length: f64, cable_radius: f64, degenerate_tolerance: f64) -> PyResult<Self> {
        let inner = tendril_core::Geometry::new(base_length, cable_radius)
            .with_degenerate_tolerance(degenerate_tolerance);
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    #[inline]
    fn base_length(&self) -> f64 {
        self.inner.base_length
    }

    #[getter]
    #[inline]
    fn cable_radius(&self) -> f64 {
        self.inner.cable_radius
    }

    #[getter]
    #[inline]
    fn degenerate_tolerance(&self) -> f64 {
        self.inner.degenerate_tolerance
    }

    fn __repr__(&self) -> String {
        format!(
            "Geometry(base_length={}, cable_radius={})",
            self.inner.base_length, self.inner.cable_radius
        )
    }
}

/// Constant-curvature forward model
#[pyclass(name = "KinematicModel")]
#[derive(Clone)]
pub struct PyKinematicModel {
    inner: tendril_core::KinematicModel,
}

#[pymethods]
impl PyKinematicModel {
    #[new]
    #[pyo3(signature = (geometry = None))]
    fn new(geometry: Option<PyGeometry>) -> Self {
        let geometry = geometry.map(|g| g.inner).unwrap_or_default();
        Self {
            inner: tendril_core::KinematicModel::new(geometry),
        }
    }

    /// End-effector position (x, y, z) for cable retractions d1, d2, d3
    fn forward(&self, d1: f64, d2: f64, d3: f64) -> (f64, f64, f64) {
        let tip = self.inner.forward([d1, d2, d3]);
        (tip.x, tip.y, tip.z)
    }

    /// Arc parameters (kappa, theta, phi), or None when the robot is straight
    fn arc_parameters(&self, d1: f64, d2: f64, d3: f64) -> Option<(f64, f64, f64)> {
        self.inner
            .arc_parameters([d1, d2, d3])
            .map(|arc| (arc.kappa, arc.theta, arc.phi))
    }

    #[getter]
    fn geometry(&self) -> PyGeometry {
        PyGeometry {
            inner: *self.inner.geometry(),
        }
    }

    #[getter]
    #[inline]
    fn max_reach(&self) -> f64 {
        self.inner.max_reach()
    }

    fn __repr__(&self) -> String {
        let g = self.inner.geometry();
        format!(
            "KinematicModel(base_length={}, cable_radius={})",
            g.base_length, g.cable_radius
        )
    }
}

// ============================================================================
// Environment Bindings
// ============================================================================

/// Environment configuration
#[pyclass(name = "EnvConfig")]
#[derive(Clone)]
pub struct PyEnvConfig {
    pub(crate) inner: tendril_core::EnvConfig,
}

#[pymethods]
impl PyEnvConfig {
    #[new]
    #[pyo3(signature = (seed = None, max_steps = 1000, goal_threshold = 3.0, geometry = None))]
    fn new(
        seed: Option<u64>,
        max_steps: usize,
        goal_threshold: f64,
        geometry: Option<PyGeometry>,
    ) -> PyResult<Self> {
        let mut inner = tendril_core::EnvConfig::default()
            .with_max_steps(max_steps)
            .with_goal_threshold(goal_threshold);
        inner.seed = seed;
        if let Some(g) = geometry {
            inner = inner.with_geometry(g.inner);
        }
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Set the cable retraction bounds
    fn with_action_bounds(&self, low: f32, high: f32) -> PyResult<Self> {
        let inner = self.inner.clone().with_action_bounds(low, high);
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    #[inline]
    fn seed(&self) -> Option<u64> {
        self.inner.seed
    }

    #[getter]
    #[inline]
    fn max_steps(&self) -> usize {
        self.inner.termination.max_steps
    }

    #[getter]
    #[inline]
    fn goal_threshold(&self) -> f64 {
        self.inner.termination.goal_threshold
    }

    fn __repr__(&self) -> String {
        format!(
            "EnvConfig(seed={:?}, max_steps={}, goal_threshold={})",
            self.inner.seed, self.inner.termination.max_steps, self.inner.termination.goal_threshold
        )
    }
}

/// Goal-reaching environment for the continuum robot
#[pyclass(name = "ContinuumEnv")]
pub struct PyContinuumEnv {
    inner: tendril_core::ContinuumEnv,
}

#[pymethods]
impl PyContinuumEnv {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PyEnvConfig>) -> PyResult<Self> {
        let inner = match config {
            Some(c) => tendril_core::ContinuumEnv::with_config(c.inner).map_err(to_py_err)?,
            None => tendril_core::ContinuumEnv::new(),
        };
        Ok(Self { inner })
    }

    /// Start a new episode and return the 6-dim observation
    fn reset(&mut self) -> Vec<f32> {
        self.inner.reset().to_vec()
    }

    /// Apply an action; returns (observation, reward, done, info)
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        action: Vec<f32>,
    ) -> PyResult<(Vec<f32>, f64, bool, Bound<'py, PyDict>)> {
        let result = tendril_core::Environment::step(&mut self.inner, &action).map_err(to_py_err)?;
        let info = PyDict::new(py);
        for (key, value) in result.info.iter() {
            info.set_item(key, value)?;
        }
        Ok((result.observation.to_vec(), result.reward, result.done, info))
    }

    /// Re-seed the episode generator
    fn seed(&mut self, seed: u64) {
        self.inner.reseed(seed);
    }

    /// Text rendering of the current episode
    fn render(&self) -> String {
        self.inner.render()
    }

    #[getter]
    fn action_low(&self) -> Vec<f32> {
        use tendril_core::Environment;
        self.inner.action_space().low().to_vec()
    }

    #[getter]
    fn action_high(&self) -> Vec<f32> {
        use tendril_core::Environment;
        self.inner.action_space().high().to_vec()
    }

    #[getter]
    fn observation_dim(&self) -> usize {
        use tendril_core::Environment;
        self.inner.observation_space().total_dim
    }

    #[getter]
    #[inline]
    fn steps(&self) -> usize {
        self.inner.steps()
    }

    #[getter]
    #[inline]
    fn episode_return(&self) -> f64 {
        self.inner.episode_return()
    }

    #[getter]
    fn distance_to_goal(&self) -> Option<f64> {
        self.inner.distance_to_goal()
    }

    fn __repr__(&self) -> String {
        format!(
            "ContinuumEnv(steps={}, episode_return={:.3})",
            self.inner.steps(),
            self.inner.episode_return()
        )
    }
}
