//! Recoverable runtime failures.
//!
//! Contract violations (calling an unsupported operation, attaching an
//! object twice, a floor above a ceiling) are not represented here: they
//! panic at the call site. Everything in [`AxError`] is a condition the
//! caller is expected to check and propagate, and an operation returning
//! one has left its receiver exactly as it found it.

use std::error::Error;
use std::fmt;

/// Errors reported by container, buffer and value-semantics operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AxError {
    /// The allocator refused to provide memory.
    AllocFailed {
        /// Number of bytes (or elements, for typed storage) requested.
        requested: usize,
    },
    /// The request exceeds the object's upper bound.
    CapacityExceeded {
        /// The size that was requested.
        requested: usize,
        /// The ceiling in force.
        max: usize,
    },
    /// Removal from an empty collection.
    Empty,
    /// A key lookup that found nothing.
    Missing,
    /// A position or index outside the valid range.
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The collection size at the time of the call.
        size: usize,
    },
}

impl fmt::Display for AxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocFailed { requested } => {
                write!(f, "allocation failed: requested {requested}")
            }
            Self::CapacityExceeded { requested, max } => {
                write!(f, "capacity exceeded: requested {requested}, max {max}")
            }
            Self::Empty => write!(f, "collection is empty"),
            Self::Missing => write!(f, "key not found"),
            Self::OutOfRange { index, size } => {
                write!(f, "index {index} out of range for size {size}")
            }
        }
    }
}

impl Error for AxError {}
