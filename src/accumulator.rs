//! Running aggregates of pairwise interval products across tree samples.
//!
//! Two aggregates are provided:
//!
//! 1. [`ScalarAccumulator`]: per sample, the mean of `T_i·T_j` over all unordered
//!    pairs `i <= j` (n(n+1)/2 pairs for n intervals); finalized as the mean of
//!    these per-sample values.
//! 2. [`MatrixAccumulator`]: per ordered pair `(i, j)`, the running sum of
//!    `T_i·T_j` at slot `i*n + j`; finalized by dividing every slot by the
//!    number of samples.
//!
//! Both aggregates fix the number of intervals on their first sample and
//! reject any sample of another size. Both are additive, so partial aggregates
//! built on different threads can be combined with [`Accumulator::merge`].
//!
//! # Example
//! ```text
//! intervals = [a, b]
//!
//! scalar:  (a·a + a·b + b·b) / 3
//! matrix:  [a·a, a·b,
//!           b·a, b·b]
//! ```

use itertools::Itertools;

use crate::error::EstimateError;

/// Final E(T_iT_j) estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// Mean over all pairs `i <= j` and all samples
    Scalar(f64),
    /// Row-major `size × size` matrix of per-pair means
    Matrix { size: usize, values: Vec<f64> },
}

impl Estimate {
    /// E(T_iT_j) for 0-based interval indices; `i` and `j` are ignored for a scalar.
    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        match self {
            Estimate::Scalar(value) => Some(*value),
            Estimate::Matrix { size, values } if i < *size && j < *size => {
                Some(values[i * size + j])
            }
            Estimate::Matrix { .. } => None,
        }
    }

    /// Matrix rows, or a single 1×1 row for a scalar.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        match self {
            Estimate::Scalar(value) => vec![vec![*value]],
            Estimate::Matrix { size: 0, .. } => Vec::new(),
            Estimate::Matrix { size, values } => {
                values.chunks(*size).map(<[f64]>::to_vec).collect()
            }
        }
    }
}

/// Fold of per-sample inter-coalescence intervals into an E(T_iT_j) estimate.
pub trait Accumulator {
    /// Add one sample's intervals.
    fn accumulate(&mut self, intervals: &[f64]) -> Result<(), EstimateError>;

    /// Add all samples seen by `other`.
    fn merge(&mut self, other: Self) -> Result<(), EstimateError>
    where
        Self: Sized;

    /// Number of samples accumulated so far.
    fn samples(&self) -> usize;

    /// Divide by the number of samples.
    ///
    /// # Errors
    /// [`EstimateError::NoSamples`] if nothing was accumulated.
    fn finalize(self) -> Result<Estimate, EstimateError>;
}

fn check_size(expected: Option<usize>, found: usize) -> Result<(), EstimateError> {
    match expected {
        Some(expected) if expected != found => Err(EstimateError::SizeMismatch { expected, found }),
        _ => Ok(()),
    }
}

/// Mean of `T_i·T_j` over all pairs `i <= j`, self-pairs included.
pub fn pair_product_mean(intervals: &[f64]) -> f64 {
    let n = intervals.len();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = intervals
        .iter()
        .combinations_with_replacement(2)
        .map(|pair| pair[0] * pair[1])
        .sum();
    sum / (n * (n + 1) / 2) as f64
}

/// Single-value aggregate.
#[derive(Debug, Clone, Default)]
pub struct ScalarAccumulator {
    size: Option<usize>,
    sum: f64,
    samples: usize,
}

impl ScalarAccumulator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Accumulator for ScalarAccumulator {
    fn accumulate(&mut self, intervals: &[f64]) -> Result<(), EstimateError> {
        check_size(self.size, intervals.len())?;
        self.size = Some(intervals.len());
        self.sum += pair_product_mean(intervals);
        self.samples += 1;
        Ok(())
    }

    fn merge(&mut self, other: Self) -> Result<(), EstimateError> {
        if let Some(size) = other.size {
            check_size(self.size, size)?;
            self.size = Some(size);
        }
        self.sum += other.sum;
        self.samples += other.samples;
        Ok(())
    }

    fn samples(&self) -> usize {
        self.samples
    }

    fn finalize(self) -> Result<Estimate, EstimateError> {
        if self.samples == 0 {
            return Err(EstimateError::NoSamples);
        }
        Ok(Estimate::Scalar(self.sum / self.samples as f64))
    }
}

/// Per-pair aggregate over a fixed number of intervals.
///
/// The size is set either explicitly with [`initialize`](Self::initialize) or
/// implicitly by the first accumulated sample.
#[derive(Debug, Clone, Default)]
pub struct MatrixAccumulator {
    size: Option<usize>,
    sums: Vec<f64>,
    samples: usize,
}

impl MatrixAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `size × size` zeroed slots.
    ///
    /// Calling it again with the same size keeps the running sums.
    ///
    /// # Errors
    /// [`EstimateError::SizeMismatch`] if already initialized to another size.
    pub fn initialize(&mut self, size: usize) -> Result<(), EstimateError> {
        check_size(self.size, size)?;
        if self.size.is_none() {
            self.size = Some(size);
            self.sums = vec![0.0; size * size];
        }
        Ok(())
    }

    /// Number of intervals per sample, once known.
    pub fn size(&self) -> Option<usize> {
        self.size
    }
}

impl Accumulator for MatrixAccumulator {
    fn accumulate(&mut self, intervals: &[f64]) -> Result<(), EstimateError> {
        self.initialize(intervals.len())?;

        let products = intervals.iter().cartesian_product(intervals).map(|(a, b)| a * b);
        for (slot, product) in self.sums.iter_mut().zip(products) {
            *slot += product;
        }
        self.samples += 1;
        Ok(())
    }

    fn merge(&mut self, other: Self) -> Result<(), EstimateError> {
        let Some(size) = other.size else {
            return Ok(());
        };
        self.initialize(size)?;
        for (slot, sum) in self.sums.iter_mut().zip(other.sums) {
            *slot += sum;
        }
        self.samples += other.samples;
        Ok(())
    }

    fn samples(&self) -> usize {
        self.samples
    }

    fn finalize(self) -> Result<Estimate, EstimateError> {
        if self.samples == 0 {
            return Err(EstimateError::NoSamples);
        }
        let count = self.samples as f64;
        Ok(Estimate::Matrix {
            size: self.size.unwrap_or(0),
            values: self.sums.into_iter().map(|sum| sum / count).collect(),
        })
    }
}
