//! OMOPSO: multi-objective particle swarm optimization with crowding-bounded
//! leaders, turbulence and an epsilon-dominance archive.

use std::marker::PhantomData;

use log::{debug, info};
use typed_builder::TypedBuilder;

use super::{evaluate, initial_population, record, seeded_rng, Optimized};
use crate::{
  archive::Archive,
  crowding::Dimensions,
  dominance::{EpsilonDominance, ParetoDominance},
  error::{Error, Result},
  evaluation::executor::EvaluationExecutor,
  individual::{IdSequence, Individual},
  mutation::{Mutation, PolynomialMutation},
  optimizer::Optimizer,
  parameter::{validate_all, Distribution, Parameter},
  population::History,
  sink::PersistenceSink,
  swarm::{
    select_global_best, update_personal_best, ConstrictedUpdate, SwarmUpdater,
  },
};

/// OMOPSO optimizer.
///
/// Every iteration each particle follows a leader drawn from an archive of
/// non-dominated particles, is perturbed by the turbulence operator and is
/// evaluated anew. Leaders are kept at `swarm_size` members by crowding
/// distance over decision vectors. A second archive keeps every particle
/// that is not epsilon-dominated and is returned as [`Optimized::archive`].
///
/// Particles of each iteration are fresh individuals, so the history holds
/// the initial swarm followed by the swarm of every iteration.
///
/// # Examples
/// ```
/// # use moevo::{optimizer::{omopso::Omopso, Optimizer}, parameter::Parameter};
/// let optimized = Omopso::builder()
///   .parameters(vec![Parameter::new("x", -10.0, 10.0)])
///   .evaluator(|x: &[f64]| [x[0].powi(2), (x[0] - 2.0).powi(2)])
///   .swarm_size(10)
///   .iterations(20)
///   .seed(7)
///   .build()
///   .optimize()
///   .unwrap();
/// assert!(optimized.solutions.len() <= 10);
/// assert!(!optimized.archive.is_empty());
/// ```
#[derive(TypedBuilder)]
pub struct Omopso<Ev, ES> {
  /// Decision variables, one per dimension of the search space.
  #[builder(setter(into))]
  parameters: Vec<Parameter>,
  /// Evaluator, optionally wrapped with `par_each()` or `par_batch()`.
  evaluator: Ev,
  /// Number of particles, also the capacity of the leaders archive.
  swarm_size: usize,
  /// Number of iterations to run.
  iterations: usize,
  #[builder(
    default = Box::new(ConstrictedUpdate::default()) as Box<dyn SwarmUpdater>
  )]
  updater: Box<dyn SwarmUpdater>,
  /// Applied to every particle after it moves.
  #[builder(
    default = Box::new(PolynomialMutation::default()) as Box<dyn Mutation>
  )]
  turbulence: Box<dyn Mutation>,
  /// Box widths of the epsilon archive, one per objective or a single one
  /// for all of them. Any other count fails the run once the objective count
  /// is known.
  #[builder(default = vec![0.01])]
  epsilons: Vec<f64>,
  /// Distribution of the initial swarm.
  #[builder(default)]
  distribution: Distribution,
  /// Seed of the random number generator, drawn from entropy if unset.
  #[builder(default, setter(strip_option))]
  seed: Option<u64>,
  #[builder(default = Box::new(()) as Box<dyn PersistenceSink>)]
  sink: Box<dyn PersistenceSink>,
  #[builder(default)]
  ids: IdSequence,
  #[builder(setter(skip), default)]
  _strategy: PhantomData<ES>,
}

impl<Ev, ES> Optimizer for Omopso<Ev, ES>
where
  Ev: EvaluationExecutor<ES>,
{
  fn optimize(mut self) -> Result<Optimized> {
    self.validate()?;
    info!(
      "starting OMOPSO: {} parameters, swarm {}, {} iterations",
      self.parameters.len(),
      self.swarm_size,
      self.iterations
    );
    let mut rng = seeded_rng(self.seed);
    let mut history = History::new();
    let mut leaders = Archive::new(ParetoDominance);
    let mut archive =
      Archive::new(EpsilonDominance::new(self.epsilons.clone()));

    let mut swarm = initial_population(
      &self.parameters,
      self.swarm_size,
      self.distribution,
      &self.ids,
      &mut rng,
    );
    let mut evaluations =
      evaluate(&self.evaluator, &mut swarm, self.sink.as_mut())?;
    self.validate_epsilons(swarm[0].costs().len())?;
    swarm.iter_mut().for_each(Individual::init_swarm);
    self.update_archives(&mut leaders, &mut archive, &swarm);
    record(&mut history, &swarm, self.sink.as_mut());

    for iteration in 0..self.iterations {
      let population_id = history.len();
      let mut next = Vec::with_capacity(swarm.len());
      for particle in &swarm {
        let mut successor = particle.successor(&self.ids, population_id);
        let leader = select_global_best(&leaders, &mut rng)?;
        self.updater.update_velocity(
          &mut successor,
          leader.vector(),
          &self.parameters,
          &mut rng,
        );
        self.updater.update_position(&mut successor, &self.parameters);
        self
          .turbulence
          .mutate(successor.vector_mut(), &self.parameters, &mut rng);
        next.push(successor);
      }

      evaluations += evaluate(&self.evaluator, &mut next, self.sink.as_mut())?;
      let mut improved = 0;
      for particle in &mut next {
        if update_personal_best(particle, &ParetoDominance) {
          improved += 1;
        }
      }
      self.update_archives(&mut leaders, &mut archive, &next);
      record(&mut history, &next, self.sink.as_mut());
      debug!(
        "iteration {iteration}: {improved} personal bests improved, {} \
         leaders, {} archived",
        leaders.len(),
        archive.len()
      );
      swarm = next;
    }

    info!(
      "OMOPSO finished after {evaluations} evaluations, {} leaders",
      leaders.len()
    );
    Ok(Optimized {
      solutions: leaders.into_members(),
      archive: archive.into_members(),
      history,
      evaluations,
    })
  }
}

impl<Ev, ES> Omopso<Ev, ES> {
  fn validate(&self) -> Result<()> {
    validate_all(&self.parameters)?;
    if self.swarm_size == 0 {
      return Err(Error::InvalidConfiguration(
        "swarm size must be positive".to_string(),
      ));
    }
    if self.epsilons.is_empty() || self.epsilons.iter().any(|e| *e <= 0.0) {
      return Err(Error::InvalidConfiguration(format!(
        "epsilons must be positive, got {:?}",
        self.epsilons
      )));
    }
    Ok(())
  }

  // known only once the first particle is evaluated
  fn validate_epsilons(&self, objectives: usize) -> Result<()> {
    match self.epsilons.len() {
      1 => Ok(()),
      n if n == objectives => Ok(()),
      n => Err(Error::InvalidConfiguration(format!(
        "{n} epsilons given for {objectives} objectives"
      ))),
    }
  }

  /// Offers particles to both archives and bounds the leaders.
  fn update_archives(
    &self,
    leaders: &mut Archive<ParetoDominance>,
    archive: &mut Archive<EpsilonDominance>,
    particles: &[Individual],
  ) {
    for particle in particles {
      leaders.add(particle.clone());
      archive.add(particle.clone());
    }
    leaders.truncate(self.swarm_size, Dimensions::Parameters);
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::{
    dominance::DominanceComparator, error::EvaluationError,
    mutation::NoMutation, operator::IntoPar, sink::MemorySink,
  };

  fn schaffer(x: &[f64]) -> Vec<f64> {
    vec![x[0].powi(2), (x[0] - 2.0).powi(2)]
  }

  fn builder_run(seed: u64) -> Optimized {
    Omopso::builder()
      .parameters(vec![Parameter::new("x", -10.0, 10.0)])
      .evaluator(schaffer)
      .swarm_size(12)
      .iterations(25)
      .seed(seed)
      .build()
      .optimize()
      .unwrap()
  }

  #[test]
  fn test_history_and_evaluation_count() {
    let optimized = builder_run(1);
    assert_eq!(optimized.history.len(), 26);
    assert_eq!(optimized.evaluations, 12 * 26);
    assert!(optimized.history.iter().all(|p| p.len() == 12));
  }

  #[test]
  fn test_leaders_are_bounded_and_non_dominated() {
    let optimized = builder_run(2);
    let leaders = &optimized.solutions;
    assert!(!leaders.is_empty() && leaders.len() <= 12);
    for a in leaders {
      for b in leaders {
        assert!(!ParetoDominance.dominates(a.costs(), b.costs()));
      }
      assert!((-10.0..=10.0).contains(&a.vector()[0]));
    }
  }

  #[test]
  fn test_epsilon_archive_is_non_dominated() {
    let optimized = builder_run(3);
    let comparator = EpsilonDominance::new(vec![0.01]);
    for a in &optimized.archive {
      for b in &optimized.archive {
        assert!(!comparator.dominates(a.costs(), b.costs()));
      }
    }
  }

  #[test]
  fn test_seeded_runs_are_reproducible() {
    let vectors = |o: Optimized| {
      o.solutions
        .iter()
        .map(|i| i.vector().to_vec())
        .collect::<Vec<_>>()
    };
    assert_eq!(vectors(builder_run(11)), vectors(builder_run(11)));
  }

  #[test]
  fn test_particles_stay_within_bounds() {
    let optimized = Omopso::builder()
      .parameters(vec![
        Parameter::new("x", -1.0, 1.0),
        Parameter::new("y", 0.0, 0.5),
      ])
      .evaluator(|x: &[f64]| [x[0] + x[1], x[1] - x[0]])
      .swarm_size(6)
      .iterations(15)
      .turbulence(Box::new(NoMutation))
      .seed(6)
      .build()
      .optimize()
      .unwrap();
    for population in optimized.history.iter() {
      for particle in population.iter() {
        assert!((-1.0..=1.0).contains(&particle.vector()[0]));
        assert!((0.0..=0.5).contains(&particle.vector()[1]));
        assert!(particle.swarm().is_some());
      }
    }
  }

  #[test]
  fn test_parallel_evaluation_and_sink() {
    let sink = Arc::new(Mutex::new(MemorySink::default()));
    let optimized = Omopso::builder()
      .parameters(vec![Parameter::new("x", -1.0, 1.0)])
      .evaluator(schaffer.par_each())
      .swarm_size(4)
      .iterations(3)
      .sink(Box::new(Arc::clone(&sink)))
      .seed(8)
      .build()
      .optimize()
      .unwrap();
    let sink = sink.lock().unwrap();
    assert_eq!(sink.individuals.len(), optimized.evaluations);
    assert_eq!(sink.populations.len(), 4);
  }

  #[test]
  fn test_evaluator_failure_aborts() {
    let result = Omopso::builder()
      .parameters(vec![Parameter::new("x", -1.0, 1.0)])
      .evaluator(
        (|_: &[f64]| -> std::result::Result<Vec<f64>, _> {
          Err(EvaluationError::new("timeout"))
        })
        .par_batch(),
      )
      .swarm_size(4)
      .iterations(3)
      .build()
      .optimize();
    assert!(matches!(result, Err(Error::EvaluatorFailure { .. })));
  }

  #[test]
  fn test_invalid_configuration() {
    let result = Omopso::builder()
      .parameters(vec![Parameter::new("x", -1.0, 1.0)])
      .evaluator(schaffer)
      .swarm_size(4)
      .iterations(3)
      .epsilons(vec![0.0])
      .build()
      .optimize();
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

    let result = Omopso::builder()
      .parameters(Vec::<Parameter>::new())
      .evaluator(schaffer)
      .swarm_size(4)
      .iterations(3)
      .build()
      .optimize();
    assert!(result.is_err());
  }

  #[test]
  fn test_epsilon_count_must_match_objectives() {
    let run = |epsilons: Vec<f64>| {
      Omopso::builder()
        .parameters(vec![Parameter::new("x", -1.0, 1.0)])
        .evaluator(|x: &[f64]| [x[0], -x[0], x[0].powi(2)])
        .swarm_size(4)
        .iterations(3)
        .epsilons(epsilons)
        .seed(6)
        .build()
        .optimize()
    };
    assert!(matches!(
      run(vec![0.1, 0.1]),
      Err(Error::InvalidConfiguration(_))
    ));
    assert!(matches!(
      run(vec![0.1; 4]),
      Err(Error::InvalidConfiguration(_))
    ));
    assert!(run(vec![0.1, 0.2, 0.3]).is_ok());
    assert!(run(vec![0.1]).is_ok());
  }
}
