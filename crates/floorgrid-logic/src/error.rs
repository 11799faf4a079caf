//! Errors raised by the group-ordering solver.

use std::fmt;

/// Errors that can occur while building solver input or solving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// Occupancy rows have different floor counts.
    RaggedMatrix {
        group: usize,
        expected: usize,
        found: usize,
    },
    /// Greedy matching found no pair while odd vertices were left over.
    /// Only possible if the odd-vertex set was built wrong.
    MatchingFailed { unmatched: Vec<usize> },
    /// A group order that repeats or skips an index.
    NotAPermutation { order: Vec<usize> },
    /// A triple's group id is too large to use as a matrix row.
    GroupOutOfRange { group: i32, limit: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::RaggedMatrix {
                group,
                expected,
                found,
            } => write!(
                f,
                "Occupancy row for group {} has {} floors, expected {}",
                group, found, expected
            ),
            SolveError::MatchingFailed { unmatched } => write!(
                f,
                "Matching left {} odd vertices unpaired: {:?}",
                unmatched.len(),
                unmatched
            ),
            SolveError::NotAPermutation { order } => {
                write!(f, "Group order {:?} is not a permutation", order)
            }
            SolveError::GroupOutOfRange { group, limit } => write!(
                f,
                "Group {} is out of range, groups must be below {}",
                group, limit
            ),
        }
    }
}

impl std::error::Error for SolveError {}
