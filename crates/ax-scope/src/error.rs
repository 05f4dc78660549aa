//! Runtime-level error types.

use std::error::Error;
use std::fmt;

use ax_core::AxError;

use crate::handle::ObjectId;

/// Errors reported by object-level runtime operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    /// The id refers to an object that has been freed.
    StaleObject {
        /// The stale id.
        id: ObjectId,
    },
    /// A typed copy or move produced an object of another concrete type.
    TypeMismatch {
        /// Type the handle was typed with.
        expected: &'static str,
        /// Name of the object actually produced.
        found: &'static str,
    },
    /// The object itself reported a failure.
    Object(AxError),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleObject { id } => write!(f, "stale object {id}"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            Self::Object(e) => write!(f, "object operation failed: {e}"),
        }
    }
}

impl Error for ScopeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Object(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AxError> for ScopeError {
    fn from(e: AxError) -> Self {
        Self::Object(e)
    }
}

/// Invalid [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `compact_threshold` must be at least 1.
    InvalidCompactThreshold {
        /// The rejected value.
        value: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCompactThreshold { value } => {
                write!(f, "invalid compact threshold {value}: must be at least 1")
            }
        }
    }
}

impl Error for ConfigError {}
