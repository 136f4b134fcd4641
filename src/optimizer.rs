//! Abstract optimizer and the building blocks shared by its implementations.

pub mod nsga;
pub mod omopso;

use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::{
  error::Result,
  evaluation::executor::EvaluationExecutor,
  individual::{IdSequence, Individual},
  parameter::{Distribution, Parameter},
  population::{History, Population},
  sink::PersistenceSink,
};

/// Represents an abstract optimizer.
pub trait Optimizer: Sized {
  /// Runs `Optimizer` until it exhausts its generations, then returns the
  /// approximation of the Pareto front it has found.
  fn optimize(self) -> Result<Optimized>;
}

/// Outcome of an optimization run.
#[derive(Clone, Debug, Default)]
pub struct Optimized {
  /// Approximation of the Pareto front.
  pub solutions: Vec<Individual>,
  /// Secondary archive kept by the optimizer, empty if it keeps none.
  pub archive: Vec<Individual>,
  /// Every recorded population, the initial one first.
  pub history: History,
  /// Number of evaluator calls.
  pub evaluations: usize,
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
  seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Draws `size` unevaluated individuals for the first population.
pub(crate) fn initial_population(
  parameters: &[Parameter],
  size: usize,
  distribution: Distribution,
  ids: &IdSequence,
  rng: &mut dyn RngCore,
) -> Vec<Individual> {
  (0..size)
    .map(|_| {
      let vector = parameters
        .iter()
        .map(|p| p.sample(distribution, rng))
        .collect();
      Individual::new(ids, vector, 0)
    })
    .collect()
}

/// Evaluates individuals and reports every one of them to the sink.
pub(crate) fn evaluate<Ev, ES>(
  evaluator: &Ev,
  individuals: &mut [Individual],
  sink: &mut dyn PersistenceSink,
) -> Result<usize>
where
  Ev: EvaluationExecutor<ES>,
{
  let evaluated = evaluator.execute_evaluations(individuals)?;
  for individual in individuals.iter() {
    sink.write_individual(&individual.snapshot());
  }
  Ok(evaluated)
}

/// Appends a copy of `individuals` to the history and reports it to the sink.
pub(crate) fn record(
  history: &mut History,
  individuals: &[Individual],
  sink: &mut dyn PersistenceSink,
) -> usize {
  let population = Population::new(individuals.to_vec());
  sink.write_population(&population.snapshot(history.len()));
  history.push(population)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sink::MemorySink;

  #[test]
  fn test_initial_population_is_within_bounds() {
    let ids = IdSequence::new();
    let mut rng = seeded_rng(Some(1));
    let parameters =
      [Parameter::new("x", -1.0, 1.0), Parameter::new("y", 10.0, 20.0)];
    let population = initial_population(
      &parameters,
      50,
      Distribution::Uniform,
      &ids,
      &mut rng,
    );
    assert_eq!(population.len(), 50);
    for individual in &population {
      assert!(!individual.is_evaluated());
      assert!((-1.0..=1.0).contains(&individual.vector()[0]));
      assert!((10.0..=20.0).contains(&individual.vector()[1]));
    }
  }

  #[test]
  fn test_seeded_rng_is_deterministic() {
    let ids = IdSequence::new();
    let parameters = [Parameter::new("x", 0.0, 1.0)];
    let draw = |seed| {
      let mut rng = seeded_rng(Some(seed));
      initial_population(&parameters, 5, Distribution::Normal, &ids, &mut rng)
        .iter()
        .map(|i| i.vector()[0])
        .collect::<Vec<_>>()
    };
    assert_eq!(draw(3), draw(3));
  }

  #[test]
  fn test_evaluate_and_record_report_to_sink() {
    let ids = IdSequence::new();
    let mut sink = MemorySink::default();
    let mut history = History::new();
    let mut individuals: Vec<_> =
      (0..3).map(|i| Individual::new(&ids, vec![i as f64], 0)).collect();

    let evaluator = |x: &[f64]| vec![x[0] * 2.0];
    let evaluated = evaluate(&evaluator, &mut individuals, &mut sink).unwrap();
    assert_eq!(evaluated, 3);
    assert_eq!(sink.individuals.len(), 3);
    assert_eq!(sink.individuals[2].costs, vec![4.0]);

    assert_eq!(record(&mut history, &individuals, &mut sink), 0);
    assert_eq!(record(&mut history, &individuals, &mut sink), 1);
    assert_eq!(sink.populations[1].population_id, 1);
    assert_eq!(history.len(), 2);
  }
}
