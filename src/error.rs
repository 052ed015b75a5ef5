//! Error types for Newick parsing and E(T_iT_j) estimation.

use thiserror::Error;

/// Errors raised while parsing one Newick line.
///
/// Positions are byte offsets into the line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NewickError {
    /// The line ended where more input was required
    #[error("Unexpected end of input at position {position}, expected {expected}")]
    UnexpectedEnd {
        position: usize,
        expected: &'static str,
    },
    /// A delimiter other than the required one was found
    #[error("Unexpected character '{found}' at position {position}, expected {expected}")]
    UnexpectedChar {
        found: char,
        position: usize,
        expected: &'static str,
    },
    /// The text after ':' is not a floating point literal
    #[error("Invalid branch length '{text}' at position {position}")]
    InvalidBranchLength { text: String, position: usize },
    /// Input left over after the tree and its terminating ';'
    #[error("Trailing input after tree at position {position}")]
    TrailingInput { position: usize },
}

/// Errors that abort an estimation run.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// Sample `sample` (0-based, counted after the header) is not valid Newick
    #[error("Could not parse tree {sample}: {source}")]
    Parse {
        sample: usize,
        #[source]
        source: NewickError,
    },
    /// Sorted coalescence times produced a negative interval
    #[error("Error in times: interval {index} is {interval}, expected a non-negative value")]
    TimeConsistency { index: usize, interval: f64 },
    /// A tree without any coalescence event
    #[error("Tree has no coalescence events")]
    EmptyTree,
    /// A sample disagrees with the number of intervals of the first sample
    #[error("Expected {expected} inter-coalescence intervals, found {found}")]
    SizeMismatch { expected: usize, found: usize },
    /// Finalizing an aggregate that never saw a sample
    #[error("No tree samples found")]
    NoSamples,
    /// Reading the input or writing the result failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EstimateError {
    /// Attaches the sample index to a Newick error.
    pub fn parse(sample: usize, source: NewickError) -> Self {
        EstimateError::Parse { sample, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_error_message() {
        let err = EstimateError::TimeConsistency { index: 1, interval: -0.5 };
        assert!(err.to_string().starts_with("Error in times"));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let err = EstimateError::parse(3, NewickError::TrailingInput { position: 7 });
        assert_eq!(
            err.to_string(),
            "Could not parse tree 3: Trailing input after tree at position 7"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
