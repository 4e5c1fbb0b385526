//! Python bindings for the tendril continuum robot environment
//!
//! Exposes the kinematic model and the reaching environment to Python so an
//! off-the-shelf actor-critic trainer can drive them through the usual
//! `reset()` / `step(action)` contract.

use pyo3::prelude::*;

mod bindings;

use bindings::*;

/// The tendril Python module
#[pymodule]
fn _tendril(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Initialize tracing for debugging
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    // Version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("VERSION", tendril_core::VERSION)?;

    // Kinematics
    m.add_class::<PyGeometry>()?;
    m.add_class::<PyKinematicModel>()?;

    // Environment
    m.add_class::<PyEnvConfig>()?;
    m.add_class::<PyContinuumEnv>()?;

    // Evaluation helpers
    m.add_function(wrap_pyfunction!(slack_cable_projection, m)?)?;
    m.add_function(wrap_pyfunction!(windowed_means, m)?)?;

    Ok(())
}

/// Release the least retracted cable when all three are pulled
#[pyfunction]
fn slack_cable_projection(action: [f32; 3]) -> [f32; 3] {
    tendril_core::eval::slack_cable_projection(action)
}

/// Average consecutive blocks of `window` values
#[pyfunction]
fn windowed_means(values: Vec<f64>, window: usize) -> Vec<f64> {
    tendril_core::eval::windowed_means(&values, window)
}
