use physarum_core::{SimConfig, World};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Minimal PyO3 module exposing physarum-core to Python.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Run a simulation from a JSON config and return the run summary as JSON.
#[pyfunction]
fn run_experiment(config_json: &str, steps: usize, sample_every: usize) -> PyResult<String> {
    let config =
        SimConfig::from_json(config_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let mut world = World::try_new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let summary = world
        .try_run_experiment(steps, sample_every)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    serde_json::to_string(&summary).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(run_experiment, m)?)?;
    Ok(())
}
