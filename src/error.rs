//! Errors that abort an optimization run.
//!
//! Only conditions a caller can act on are surfaced here. A degenerate
//! crowding-distance dimension (all values equal) is recovered locally and
//! never reported, and calling sorting or selection on an empty pool is a
//! programming error that panics.

use thiserror::Error;

/// An error reported by an [`Evaluator`](crate::evaluation::Evaluator).
///
/// The core doesn't retry failed evaluations. An evaluator that wants retries
/// must implement them itself.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EvaluationError(pub String);

impl EvaluationError {
  /// Creates an error with given message.
  pub fn new(message: impl Into<String>) -> Self {
    Self(message.into())
  }
}

/// Errors reported by optimizers, archives and parameter validation.
#[derive(Debug, Error)]
pub enum Error {
  /// A parameter's lower bound is not strictly below its upper bound.
  #[error("parameter `{name}` has invalid bounds [{low}, {high}]")]
  InvalidParameterBounds {
    /// Name of the offending parameter.
    name: String,
    /// Lower bound.
    low: f64,
    /// Upper bound.
    high: f64,
  },

  /// More members were requested from an archive than it holds.
  #[error("cannot sample {requested} members from an archive of {available}")]
  InsufficientArchiveSample {
    /// Number of requested members.
    requested: usize,
    /// Number of members in the archive.
    available: usize,
  },

  /// The evaluator failed for an individual. The run is aborted.
  #[error("evaluation of individual {id} failed: {source}")]
  EvaluatorFailure {
    /// Id of the individual that failed to evaluate.
    id: u64,
    /// Error reported by the evaluator.
    source: EvaluationError,
  },

  /// The optimizer was configured with values it cannot run with.
  #[error("invalid configuration: {0}")]
  InvalidConfiguration(String),
}

/// A `Result` alias with [`Error`] as its error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use std::error::Error as _;

  use super::*;

  #[test]
  fn test_error_display() {
    let err = Error::InvalidParameterBounds {
      name: "x_1".into(),
      low: 5.0,
      high: 0.0,
    };
    assert_eq!(err.to_string(), "parameter `x_1` has invalid bounds [5, 0]");

    let err = Error::InsufficientArchiveSample {
      requested: 2,
      available: 1,
    };
    assert_eq!(
      err.to_string(),
      "cannot sample 2 members from an archive of 1"
    );
  }

  #[test]
  fn test_evaluator_failure_keeps_source() {
    let err = Error::EvaluatorFailure {
      id: 7,
      source: EvaluationError::new("solver diverged"),
    };
    assert_eq!(
      err.to_string(),
      "evaluation of individual 7 failed: solver diverged"
    );
    assert_eq!(
      err.source().map(ToString::to_string),
      Some("solver diverged".to_string())
    );
  }
}
