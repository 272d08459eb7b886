//! Error type shared by every numeric routine in the crate.
//!
//! All failures are values: domain violations are reported at the call that
//! detects them, and iterative methods that run out of iterations report
//! [`NumericError::NonConvergence`] instead of returning a partial result.

use thiserror::Error;

/// Errors raised by special functions, distributions and selection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    /// A parameter violates its documented precondition.
    #[error("domain error: {0}")]
    Domain(String),

    /// An iterative method exhausted its iteration budget.
    #[error("{method} did not converge within {max_iterations} iterations{context}")]
    NonConvergence {
        method: &'static str,
        max_iterations: usize,
        /// Extra diagnostic text, e.g. the failing `(a, b, x)`.
        context: String,
    },

    /// A rank or element index outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    Index { index: usize, len: usize },

    /// A parameter vector with the wrong number of elements.
    #[error("expected a {expected}-dimensional parameter vector, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl NumericError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        NumericError::Domain(msg.into())
    }

    pub(crate) fn non_convergence(method: &'static str, max_iterations: usize) -> Self {
        NumericError::NonConvergence {
            method,
            max_iterations,
            context: String::new(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NumericError>;
