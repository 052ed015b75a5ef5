//! Crate root: lightweight module orchestration and public re-exports.
//!
//! Modules:
//! - `tree`: binary coalescent tree with branch lengths.
//! - `newick`: recursive-descent parser for single-line Newick trees.
//! - `coalescence`: coalescence times and inter-coalescence intervals.
//! - `accumulator`: scalar and matrix E(T_iT_j) aggregates.
//! - `estimate`: sequential and rayon-parallel pipelines over tree lines.
//! - `io`: reading ms output and writing estimates.
//! - `error`: error types shared by all of the above.
//! - `logger`: stderr logger used by the binary.
//! - `api`: Python bindings via `pyo3` (gated behind "python" feature).

pub mod accumulator;
pub mod coalescence;
pub mod error;
pub mod estimate;
pub mod io;
pub mod logger;
pub mod newick;
pub mod tree;

#[cfg(feature = "python")]
pub mod api;

// Re-export frequently used types & functions
pub use accumulator::{Accumulator, Estimate, MatrixAccumulator, ScalarAccumulator};
pub use error::{EstimateError, NewickError};
pub use estimate::{Mode, estimate_mode};
pub use io::{read_ms_trees, write_estimate};
pub use newick::parse_newick;
pub use tree::TreeNode;
