//! Pipeline from tree lines to a finalized E(T_iT_j) estimate.
//!
//! Each line is parsed, its intervals extracted, and the intervals folded into
//! one [`Accumulator`]. The first failing line aborts the whole run.
//!
//! Trees are independent, so [`estimate_parallel`] parses and traverses them
//! on the rayon pool and only merges the per-thread aggregates at the end.

use rayon::prelude::*;

use crate::accumulator::{Accumulator, Estimate, MatrixAccumulator, ScalarAccumulator};
use crate::coalescence::sample_intervals;
use crate::error::EstimateError;
use crate::newick::parse_newick;

/// Which aggregate to compute.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Single mean over all pairs i <= j
    Scalar,
    /// Full matrix of per-pair means
    #[default]
    Matrix,
}

/// Parse sample `sample` and return its inter-coalescence intervals.
pub fn line_intervals(sample: usize, line: &str) -> Result<Vec<f64>, EstimateError> {
    let mut root = parse_newick(line).map_err(|e| EstimateError::parse(sample, e))?;
    sample_intervals(&mut root)
}

/// Fold every line into `acc`, in order, and finalize it.
pub fn estimate<A, S>(lines: &[S], mut acc: A) -> Result<Estimate, EstimateError>
where
    A: Accumulator,
    S: AsRef<str>,
{
    for (sample, line) in lines.iter().enumerate() {
        let intervals = line_intervals(sample, line.as_ref())?;
        acc.accumulate(&intervals)?;
    }
    log::debug!("Accumulated {} samples", acc.samples());
    acc.finalize()
}

/// Same result as [`estimate`] up to floating point summation order.
pub fn estimate_parallel<A, S>(lines: &[S]) -> Result<Estimate, EstimateError>
where
    A: Accumulator + Default + Send,
    S: AsRef<str> + Sync,
{
    let acc = lines
        .par_iter()
        .enumerate()
        .try_fold(A::default, |mut acc, (sample, line)| {
            let intervals = line_intervals(sample, line.as_ref())?;
            acc.accumulate(&intervals)?;
            Ok::<A, EstimateError>(acc)
        })
        .try_reduce(A::default, |mut left, right| {
            left.merge(right)?;
            Ok(left)
        })?;
    log::debug!("Accumulated {} samples on {} threads", acc.samples(), rayon::current_num_threads());
    acc.finalize()
}

/// Estimate in the given mode, sequentially or on the rayon pool.
pub fn estimate_mode<S>(lines: &[S], mode: Mode, parallel: bool) -> Result<Estimate, EstimateError>
where
    S: AsRef<str> + Sync,
{
    match (mode, parallel) {
        (Mode::Scalar, false) => estimate(lines, ScalarAccumulator::new()),
        (Mode::Matrix, false) => estimate(lines, MatrixAccumulator::new()),
        (Mode::Scalar, true) => estimate_parallel::<ScalarAccumulator, _>(lines),
        (Mode::Matrix, true) => estimate_parallel::<MatrixAccumulator, _>(lines),
    }
}
