//! Python binding layer for E(T_iT_j) estimation.
//!
//! Provides Python functions for estimating E(T_iT_j) from ms output files
//! and for inspecting the intervals of a single Newick tree.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::accumulator::Estimate;
use crate::error::EstimateError;
use crate::estimate::{Mode, estimate_mode, line_intervals};
use crate::io::read_ms_trees;

fn to_py_err(e: EstimateError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Helper function to read and estimate one file
fn estimate_file(path: &str, mode: Mode, parallel: bool) -> PyResult<Estimate> {
    let trees = read_ms_trees(path).map_err(to_py_err)?;
    estimate_mode(&trees, mode, parallel).map_err(to_py_err)
}

/// Estimate the mean of T_i*T_j over all pairs i <= j.
///
/// Args:
///     path: Path to ms output containing Newick trees (optionally .gz)
///     parallel: Parse trees on all cores (default: False)
///
/// Returns:
///     The scalar estimate
///
/// Raises:
///     ValueError: If the file cannot be read, a tree is malformed,
///     or the trees disagree in size
#[pyfunction]
#[pyo3(signature = (path, parallel=false))]
fn estimate_scalar(path: &str, parallel: bool) -> PyResult<f64> {
    match estimate_file(path, Mode::Scalar, parallel)? {
        Estimate::Scalar(value) => Ok(value),
        Estimate::Matrix { .. } => Err(PyValueError::new_err("Expected a scalar estimate")),
    }
}

/// Estimate E(T_iT_j) for every pair of intervals.
///
/// Args:
///     path: Path to ms output containing Newick trees (optionally .gz)
///     parallel: Parse trees on all cores (default: False)
///
/// Returns:
///     A square 2D list; entry [i][j] is E(T_{i+2} T_{j+2})
///
/// Raises:
///     ValueError: If the file cannot be read, a tree is malformed,
///     or the trees disagree in size
#[pyfunction]
#[pyo3(signature = (path, parallel=false))]
fn estimate_matrix(path: &str, parallel: bool) -> PyResult<Vec<Vec<f64>>> {
    Ok(estimate_file(path, Mode::Matrix, parallel)?.rows())
}

/// Rescaled inter-coalescence intervals of a single Newick tree.
#[pyfunction]
fn coalescence_intervals(newick: &str) -> PyResult<Vec<f64>> {
    line_intervals(0, newick).map_err(to_py_err)
}

/// Python module definition
#[pymodule]
fn ms_etitj(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(estimate_scalar, m)?)?;
    m.add_function(wrap_pyfunction!(estimate_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(coalescence_intervals, m)?)?;
    Ok(())
}
