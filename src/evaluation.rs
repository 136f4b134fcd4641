//! Objective evaluation operators and utilities.

use executor::EvaluationExecutor;
use log::warn;
use rayon::prelude::*;

use crate::{
  error::{Error, EvaluationError, Result},
  execution::strategy::*,
  individual::Individual,
  operator::{IntoPar, ParBatch, ParEach},
};

/// Result of evaluating one decision vector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluation {
  /// Objective values, all minimized.
  pub costs: Vec<f64>,
  /// Constraint violations, `0` for satisfied constraints.
  pub constraints: Vec<f64>,
}

impl Evaluation {
  /// Creates an evaluation without constraints.
  pub fn new(costs: Vec<f64>) -> Self {
    Self {
      costs,
      constraints: Vec::new(),
    }
  }

  /// Attaches constraint violations.
  pub fn with_constraints(mut self, constraints: Vec<f64>) -> Self {
    self.constraints = constraints;
    self
  }

  /// Sum of absolute constraint violations.
  pub fn feasibility(&self) -> f64 {
    self.constraints.iter().map(|c| c.abs()).sum()
  }
}

impl From<Vec<f64>> for Evaluation {
  fn from(costs: Vec<f64>) -> Self {
    Self::new(costs)
  }
}

impl<const N: usize> From<[f64; N]> for Evaluation {
  fn from(costs: [f64; N]) -> Self {
    Self::new(costs.to_vec())
  }
}

/// Values an [`Evaluator`] closure may return.
pub trait IntoEvaluation {
  /// Converts the value into an evaluation result.
  fn into_evaluation(self) -> std::result::Result<Evaluation, EvaluationError>;
}

impl IntoEvaluation for Evaluation {
  fn into_evaluation(self) -> std::result::Result<Evaluation, EvaluationError> {
    Ok(self)
  }
}

impl IntoEvaluation for Vec<f64> {
  fn into_evaluation(self) -> std::result::Result<Evaluation, EvaluationError> {
    Ok(self.into())
  }
}

impl<const N: usize> IntoEvaluation for [f64; N] {
  fn into_evaluation(self) -> std::result::Result<Evaluation, EvaluationError> {
    Ok(self.into())
  }
}

impl<T> IntoEvaluation for std::result::Result<T, EvaluationError>
where
  T: Into<Evaluation>,
{
  fn into_evaluation(self) -> std::result::Result<Evaluation, EvaluationError> {
    self.map(Into::into)
  }
}

/// An operator that evaluates a decision vector, returning its objective
/// values and, optionally, constraint violations.
///
/// All objectives are minimized. An evaluator must not depend on the order in
/// which individuals are evaluated: parallel executors evaluate them
/// concurrently. A failed evaluation aborts the run, so retries, timeouts and
/// remote execution are the evaluator's business.
///
/// Can be applied in parallel to each individual or to batches of individuals
/// by converting it into a parallelized operator with `par_each()` or
/// `par_batch()` methods.
///
/// # Examples
/// ```
/// # use moevo::{error::EvaluationError, evaluation::*, operator::IntoPar};
/// let e = |x: &[f64]| vec![x[0].powi(2), (x[0] - 2.0).powi(2)];
/// let e = |x: &[f64]| [x[0], 1.0 - x[0]];
/// let e = |x: &[f64]| {
///   Evaluation::new(vec![x[0]]).with_constraints(vec![(x[0] - 1.0).max(0.0)])
/// };
/// let e = |x: &[f64]| {
///   if x[0].is_finite() {
///     Ok(vec![x[0]])
///   } else {
///     Err(EvaluationError::new("not a number"))
///   }
/// };
/// let e = e.par_batch();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Evaluator {
  /// Evaluates given decision vector.
  fn evaluate(
    &self,
    vector: &[f64],
  ) -> std::result::Result<Evaluation, EvaluationError>;
}

impl<F, O> Evaluator for F
where
  F: Fn(&[f64]) -> O,
  O: IntoEvaluation,
{
  fn evaluate(
    &self,
    vector: &[f64],
  ) -> std::result::Result<Evaluation, EvaluationError> {
    self(vector).into_evaluation()
  }
}

impl<E> IntoPar for E where E: Evaluator + Sync {}

/// This private module prevents exposing the `Executor` to a user.
pub(crate) mod executor {
  use crate::{error::Result, individual::Individual};

  /// An internal evaluation executor.
  pub trait EvaluationExecutor<ExecutionStrategy> {
    /// Evaluates every unevaluated individual, optionally parallelizing
    /// evaluator's application. Returns the number of evaluated individuals.
    ///
    /// Returns once every evaluation has finished, so callers may rank the
    /// individuals right away.
    fn execute_evaluations(
      &self,
      individuals: &mut [Individual],
    ) -> Result<usize>;
  }
}

fn evaluate_individual<E>(
  evaluator: &E,
  individual: &mut Individual,
) -> Result<()>
where
  E: Evaluator + ?Sized,
{
  let evaluation = evaluator.evaluate(individual.vector()).map_err(|source| {
    warn!("evaluation of individual {} failed: {source}", individual.id());
    Error::EvaluatorFailure {
      id: individual.id(),
      source,
    }
  })?;
  individual.set_evaluation(evaluation);
  Ok(())
}

fn evaluate_sequentially<E>(
  evaluator: &E,
  individuals: &mut [Individual],
) -> Result<usize>
where
  E: Evaluator + ?Sized,
{
  individuals
    .iter_mut()
    .filter(|i| !i.is_evaluated())
    .try_fold(0, |count, individual| {
      evaluate_individual(evaluator, individual)?;
      Ok(count + 1)
    })
}

impl<E> EvaluationExecutor<SequentialExecutionStrategy> for E
where
  E: Evaluator,
{
  fn execute_evaluations(
    &self,
    individuals: &mut [Individual],
  ) -> Result<usize> {
    evaluate_sequentially(self, individuals)
  }
}

impl<E> EvaluationExecutor<ParallelEachExecutionStrategy> for ParEach<E>
where
  E: Evaluator + Sync,
{
  fn execute_evaluations(
    &self,
    individuals: &mut [Individual],
  ) -> Result<usize> {
    individuals
      .par_iter_mut()
      .filter(|i| !i.is_evaluated())
      .map(|individual| {
        evaluate_individual(self.operator(), individual).map(|_| 1)
      })
      .try_reduce(|| 0, |a, b| Ok(a + b))
  }
}

impl<E> EvaluationExecutor<ParallelBatchExecutionStrategy> for ParBatch<E>
where
  E: Evaluator + Sync,
{
  fn execute_evaluations(
    &self,
    individuals: &mut [Individual],
  ) -> Result<usize> {
    let chunk_size = (individuals.len() / rayon::current_num_threads()).max(1);
    individuals
      .par_chunks_mut(chunk_size)
      .map(|chunk| evaluate_sequentially(self.operator(), chunk))
      .try_reduce(|| 0, |a, b| Ok(a + b))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::individual::IdSequence;

  fn individuals(count: usize) -> Vec<Individual> {
    let ids = IdSequence::new();
    (0..count)
      .map(|i| Individual::new(&ids, vec![i as f64, 1.0], 0))
      .collect()
  }

  fn takes_evaluator<ES, E: EvaluationExecutor<ES>>(
    e: &E,
    individuals: &mut [Individual],
  ) -> Result<usize> {
    e.execute_evaluations(individuals)
  }

  #[test]
  fn test_evaluator_from_closure() {
    let evaluator = |x: &[f64]| vec![x[0] + x[1], x[0] * 2.0];
    let mut pool = individuals(8);
    assert_eq!(takes_evaluator(&evaluator, &mut pool).unwrap(), 8);
    assert_eq!(pool[3].costs(), &[4.0, 6.0]);

    let mut pool = individuals(8);
    assert_eq!(takes_evaluator(&evaluator.par_each(), &mut pool).unwrap(), 8);
    assert!(pool.iter().all(Individual::is_evaluated));
    assert_eq!(pool[7].costs(), &[8.0, 14.0]);

    let mut pool = individuals(9);
    assert_eq!(takes_evaluator(&evaluator.par_batch(), &mut pool).unwrap(), 9);
    assert_eq!(pool[8].costs(), &[9.0, 16.0]);
  }

  #[test]
  fn test_evaluator_from_array_closure() {
    let evaluator = |x: &[f64]| [x[0]];
    let mut pool = individuals(2);
    takes_evaluator(&evaluator, &mut pool).unwrap();
    assert_eq!(pool[1].costs(), &[1.0]);
  }

  #[test]
  fn test_constraints_set_feasibility() {
    let evaluator = |x: &[f64]| {
      Evaluation::new(vec![x[0]]).with_constraints(vec![x[0] - 2.0, 0.0])
    };
    let mut pool = individuals(4);
    takes_evaluator(&evaluator.par_each(), &mut pool).unwrap();
    assert!(!pool[0].is_feasible());
    assert_eq!(pool[0].feasibility(), 2.0);
    assert!(pool[2].is_feasible());
  }

  #[test]
  fn test_evaluated_individuals_are_skipped() {
    let evaluator = |x: &[f64]| vec![x[0]];
    let mut pool = individuals(5);
    takes_evaluator(&evaluator, &mut pool[..2]).unwrap();
    assert_eq!(takes_evaluator(&evaluator.par_batch(), &mut pool).unwrap(), 3);
    assert_eq!(takes_evaluator(&evaluator.par_each(), &mut pool).unwrap(), 0);
  }

  #[test]
  fn test_failure_is_reported() {
    let evaluator = |x: &[f64]| {
      if x[0] < 3.0 {
        Ok(vec![x[0]])
      } else {
        Err(EvaluationError::new("diverged"))
      }
    };
    let mut pool = individuals(5);
    let err = takes_evaluator(&evaluator, &mut pool).unwrap_err();
    assert!(matches!(err, Error::EvaluatorFailure { id: 3, .. }));

    let mut pool = individuals(5);
    let err = takes_evaluator(&evaluator.par_each(), &mut pool).unwrap_err();
    assert!(matches!(err, Error::EvaluatorFailure { .. }));

    let mut pool = individuals(5);
    let result = takes_evaluator(&evaluator.par_batch(), &mut pool);
    assert!(matches!(result, Err(Error::EvaluatorFailure { .. })));
  }

  #[test]
  fn test_custom_evaluator() {
    struct Sphere;
    impl Evaluator for Sphere {
      fn evaluate(
        &self,
        vector: &[f64],
      ) -> std::result::Result<Evaluation, EvaluationError> {
        Ok(Evaluation::new(vec![vector.iter().map(|x| x * x).sum()]))
      }
    }

    let mut pool = individuals(3);
    takes_evaluator(&Sphere, &mut pool).unwrap();
    takes_evaluator(&Sphere.par_each(), &mut individuals(3)).unwrap();
    takes_evaluator(&Sphere.par_batch(), &mut individuals(3)).unwrap();
    assert_eq!(pool[2].costs(), &[5.0]);
  }
}
