//! Coalescence times and inter-coalescence intervals of a single tree.
//!
//! # Algorithm
//! 1. Post-order traversal: a leaf has time 0, an internal node has
//!    `time(left) + branch_length(left)`. Only internal nodes are reported.
//! 2. Sort the n-1 times ascending.
//! 3. Intervals are the differences of consecutive times, rescaled by 2
//!    (units of 2·N₀ generations); the first interval is measured from 0.
//!
//! # Example
//! ```text
//! ((1:0.5,2:0.5):1.0,3:1.5);
//!
//! times      = [0.5, 1.5]
//! intervals  = [2·0.5, 2·(1.5 - 0.5)] = [1.0, 2.0]
//! ```

use crate::error::EstimateError;
use crate::tree::TreeNode;

/// Label every node with its coalescence time and return the times of the
/// internal nodes in post-order.
///
/// Only the left branch is used for an internal node; the tree is assumed to be
/// ultrametric so the right branch would give the same time.
pub fn collect_coalescence_times(root: &mut TreeNode) -> Vec<f64> {
    let mut times = Vec::new();
    label_times(root, &mut times);
    times
}

fn label_times(node: &mut TreeNode, times: &mut Vec<f64>) {
    match node.children.as_deref_mut() {
        None => node.coalescence_time = 0.0,
        Some((left, right)) => {
            label_times(left, times);
            label_times(right, times);
            node.coalescence_time = left.coalescence_time + left.branch_length;
            times.push(node.coalescence_time);
        }
    }
}

/// Sort `times` in place and turn them into rescaled inter-coalescence intervals.
///
/// # Errors
/// [`EstimateError::TimeConsistency`] if any interval comes out negative, which
/// can only happen for a negative (or NaN-poisoned) coalescence time.
pub fn inter_coalescence_intervals(times: &mut [f64]) -> Result<Vec<f64>, EstimateError> {
    times.sort_by(f64::total_cmp);

    let mut intervals = Vec::with_capacity(times.len());
    let mut last = 0.0;
    for (index, &time) in times.iter().enumerate() {
        let interval = 2.0 * time - 2.0 * last;
        // NaN compares false, so test for the valid case
        if !(interval >= 0.0) {
            return Err(EstimateError::TimeConsistency { index, interval });
        }
        intervals.push(interval);
        last = time;
    }
    Ok(intervals)
}

/// Coalescence times of `root`, sorted and converted into intervals.
///
/// # Errors
/// [`EstimateError::EmptyTree`] for a tree without coalescence events, otherwise
/// as [`inter_coalescence_intervals`].
pub fn sample_intervals(root: &mut TreeNode) -> Result<Vec<f64>, EstimateError> {
    let mut times = collect_coalescence_times(root);
    if times.is_empty() {
        return Err(EstimateError::EmptyTree);
    }
    inter_coalescence_intervals(&mut times)
}
