//! Python bindings. Tasks and results cross the boundary as JSON text.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::models::{InvestmentStrategy, Task};
use crate::{critical_path, optimizer, scoring, timeline};

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_tasks(tasks_json: &str) -> PyResult<Vec<Task>> {
    serde_json::from_str(tasks_json).map_err(value_error)
}

fn parse_config(config_json: Option<&str>) -> PyResult<EngineConfig> {
    match config_json {
        Some(json) => serde_json::from_str(json).map_err(value_error),
        None => Ok(EngineConfig::default()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(value_error)
}

/// Compute CPM timings for a JSON task list.
///
/// # Raises
/// * ValueError on malformed input, invalid durations or a dependency cycle
#[pyfunction]
#[pyo3(signature = (tasks_json, config_json=None))]
fn compute_critical_path(tasks_json: &str, config_json: Option<&str>) -> PyResult<String> {
    let tasks = parse_tasks(tasks_json)?;
    let config = parse_config(config_json)?;
    let result = critical_path::compute_critical_path(&tasks, &config).map_err(value_error)?;
    to_json(&result)
}

/// Build the phase timeline for a JSON task list.
#[pyfunction]
#[pyo3(signature = (tasks_json, config_json=None))]
fn compute_timeline(tasks_json: &str, config_json: Option<&str>) -> PyResult<String> {
    let tasks = parse_tasks(tasks_json)?;
    let config = parse_config(config_json)?;
    let result = timeline::compute_timeline(&tasks, &config).map_err(value_error)?;
    to_json(&result)
}

#[pyfunction]
#[pyo3(signature = (tasks_json, property_value=None, investment_strategy="flip", config_json=None))]
fn score_priorities(
    tasks_json: &str,
    property_value: Option<f64>,
    investment_strategy: &str,
    config_json: Option<&str>,
) -> PyResult<String> {
    let tasks = parse_tasks(tasks_json)?;
    let config = parse_config(config_json)?;
    let strategy: InvestmentStrategy =
        serde_json::from_value(serde_json::Value::String(investment_strategy.to_lowercase()))
            .map_err(value_error)?;
    to_json(&scoring::score_priorities(&tasks, property_value, strategy, &config))
}

#[pyfunction]
#[pyo3(signature = (tasks_json, max_budget, config_json=None))]
fn optimize_for_budget(
    tasks_json: &str,
    max_budget: f64,
    config_json: Option<&str>,
) -> PyResult<String> {
    let tasks = parse_tasks(tasks_json)?;
    let config = parse_config(config_json)?;
    to_json(&optimizer::optimize_for_budget(&tasks, max_budget, &config))
}

/// Caching request handler (PyO3 wrapper around [`Engine`]).
#[pyclass(name = "Engine")]
pub struct PyEngine {
    inner: Engine,
}

#[pymethods]
impl PyEngine {
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        Ok(Self {
            inner: Engine::new(parse_config(config_json)?),
        })
    }

    /// Serve one JSON request tagged by `operation`.
    fn handle(&mut self, request_json: &str) -> PyResult<String> {
        self.inner.handle_json(request_json).map_err(value_error)
    }

    fn clear_cache(&mut self) {
        self.inner.clear_cache();
    }

    #[getter]
    fn cache_hits(&self) -> u64 {
        self.inner.cache().hits()
    }

    #[getter]
    fn cache_misses(&self) -> u64 {
        self.inner.cache().misses()
    }

    fn __repr__(&self) -> String {
        format!(
            "Engine(cached={}, hits={}, misses={})",
            self.inner.cache().len(),
            self.inner.cache().hits(),
            self.inner.cache().misses()
        )
    }
}

#[pymodule]
fn reno_plan(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEngine>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(compute_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(compute_timeline, m)?)?;
    m.add_function(wrap_pyfunction!(score_priorities, m)?)?;
    m.add_function(wrap_pyfunction!(optimize_for_budget, m)?)?;

    Ok(())
}
