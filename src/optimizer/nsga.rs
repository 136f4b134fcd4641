//! NSGA-II: elitist non-dominated sorting genetic algorithm.

use std::marker::PhantomData;

use log::{debug, info};
use rand::RngCore;
use typed_builder::TypedBuilder;

use super::{evaluate, initial_population, record, seeded_rng, Optimized};
use crate::{
  crowding::{crowding_distance, Dimensions},
  dominance::{DominanceComparator, ParetoDominance},
  error::{Error, Result},
  evaluation::executor::EvaluationExecutor,
  individual::{IdSequence, Individual},
  mutation::{Mutation, UniformMutation},
  optimizer::Optimizer,
  parameter::{validate_all, Distribution, Parameter},
  population::History,
  recombination::{BlendCrossover, Crossover},
  selection::{Selector, TournamentSelector},
  sink::PersistenceSink,
  sorting::{nondominated_sort, Front},
};

/// NSGA-II optimizer.
///
/// Each generation merges parents with their offspring, ranks the union by
/// non-dominated sorting and crowding distance, and keeps the best
/// `population_size` individuals. Whole fronts are kept while they fit, the
/// front that doesn't fit is cut by decreasing crowding distance.
///
/// The initial population is recorded in the history first, followed by the
/// parents selected in every generation. With zero generations the evaluated
/// initial population is returned unranked. No offspring are bred after the
/// last generation since none of them could be selected, so a run evaluates
/// `population_size` individuals per generation in total and the
/// persistence sink sees `population_size` fewer individuals than a loop
/// breeding after every generation would report.
///
/// # Examples
/// ```
/// # use moevo::{optimizer::{nsga::Nsga2, Optimizer}, parameter::Parameter};
/// let optimized = Nsga2::builder()
///   .parameters(vec![Parameter::new("x", -10.0, 10.0)])
///   .evaluator(|x: &[f64]| [x[0].powi(2), (x[0] - 2.0).powi(2)])
///   .population_size(20)
///   .generations(10)
///   .seed(7)
///   .build()
///   .optimize()
///   .unwrap();
/// assert_eq!(optimized.solutions.len(), 20);
/// assert_eq!(optimized.history.len(), 11);
/// ```
#[derive(TypedBuilder)]
pub struct Nsga2<Ev, ES> {
  /// Decision variables, one per gene.
  #[builder(setter(into))]
  parameters: Vec<Parameter>,
  /// Evaluator, optionally wrapped with `par_each()` or `par_batch()`.
  evaluator: Ev,
  /// Number of parents kept every generation.
  population_size: usize,
  /// Number of generations to run.
  generations: usize,
  #[builder(
    default = Box::new(TournamentSelector::default()) as Box<dyn Selector>
  )]
  selector: Box<dyn Selector>,
  #[builder(
    default = Box::new(BlendCrossover::default()) as Box<dyn Crossover>
  )]
  crossover: Box<dyn Crossover>,
  #[builder(
    default = Box::new(UniformMutation::default()) as Box<dyn Mutation>
  )]
  mutation: Box<dyn Mutation>,
  #[builder(
    default = Box::new(ParetoDominance) as Box<dyn DominanceComparator>
  )]
  comparator: Box<dyn DominanceComparator>,
  /// Distribution of the initial population.
  #[builder(default)]
  distribution: Distribution,
  /// Clamps offspring into the parameter bounds after mutation.
  #[builder(default = false)]
  clamp_offspring: bool,
  /// Seed of the random number generator, drawn from entropy if unset.
  #[builder(default, setter(strip_option))]
  seed: Option<u64>,
  #[builder(default = Box::new(()) as Box<dyn PersistenceSink>)]
  sink: Box<dyn PersistenceSink>,
  /// Source of individual ids. Share one sequence between runs to keep ids
  /// unique across them.
  #[builder(default)]
  ids: IdSequence,
  #[builder(setter(skip), default)]
  _strategy: PhantomData<ES>,
}

impl<Ev, ES> Optimizer for Nsga2<Ev, ES>
where
  Ev: EvaluationExecutor<ES>,
{
  fn optimize(mut self) -> Result<Optimized> {
    self.validate()?;
    info!(
      "starting NSGA-II: {} parameters, population {}, {} generations",
      self.parameters.len(),
      self.population_size,
      self.generations
    );
    let mut rng = seeded_rng(self.seed);
    let mut history = History::new();

    let mut parents = initial_population(
      &self.parameters,
      self.population_size,
      self.distribution,
      &self.ids,
      &mut rng,
    );
    let mut evaluations =
      evaluate(&self.evaluator, &mut parents, self.sink.as_mut())?;
    record(&mut history, &parents, self.sink.as_mut());

    let mut offspring = Vec::new();
    for generation in 0..self.generations {
      let mut pool = parents;
      pool.append(&mut offspring);
      let fronts = nondominated_sort(&mut pool, &self.comparator);
      debug!(
        "generation {generation}: {} fronts, {} in the first",
        fronts.len(),
        fronts[0].len()
      );
      parents = select_survivors(pool, fronts, self.population_size);
      record(&mut history, &parents, self.sink.as_mut());

      if generation + 1 < self.generations {
        offspring = self.reproduce(&parents, history.len(), &mut rng);
        evaluations +=
          evaluate(&self.evaluator, &mut offspring, self.sink.as_mut())?;
      }
    }

    info!(
      "NSGA-II finished after {evaluations} evaluations, {} solutions",
      parents.len()
    );
    Ok(Optimized {
      solutions: parents,
      archive: Vec::new(),
      history,
      evaluations,
    })
  }
}

impl<Ev, ES> Nsga2<Ev, ES> {
  fn validate(&self) -> Result<()> {
    validate_all(&self.parameters)?;
    if self.population_size < 2 {
      return Err(Error::InvalidConfiguration(format!(
        "population size must be at least 2, got {}",
        self.population_size
      )));
    }
    Ok(())
  }

  /// Breeds `population_size` unevaluated offspring from ranked parents.
  fn reproduce(
    &self,
    parents: &[Individual],
    population_id: usize,
    rng: &mut dyn RngCore,
  ) -> Vec<Individual> {
    let candidates: Vec<usize> = (0..parents.len()).collect();
    let mut vectors = Vec::with_capacity(self.population_size + 1);
    while vectors.len() < self.population_size {
      let first = self.selector.select(parents, &candidates, rng);
      let others: Vec<usize> =
        candidates.iter().copied().filter(|&i| i != first).collect();
      let second = self.selector.select(parents, &others, rng);

      let (mut a, mut b) = self.crossover.crossover(
        parents[first].vector(),
        parents[second].vector(),
        rng,
      );
      for child in [&mut a, &mut b] {
        self.mutation.mutate(child, &self.parameters, rng);
        if self.clamp_offspring {
          for (gene, parameter) in child.iter_mut().zip(&self.parameters) {
            *gene = parameter.clamp(*gene);
          }
        }
      }
      vectors.push(a);
      vectors.push(b);
    }
    // an odd population size leaves one surplus child
    vectors.truncate(self.population_size);

    vectors
      .into_iter()
      .map(|vector| Individual::new(&self.ids, vector, population_id))
      .collect()
  }
}

/// Keeps the best `size` individuals of `pool`, best first.
///
/// Crowding distance is computed once over the whole pool. Whole fronts are
/// kept while they fit, the first front that doesn't fit is cut by
/// decreasing crowding distance.
fn select_survivors(
  mut pool: Vec<Individual>,
  fronts: Vec<Front>,
  size: usize,
) -> Vec<Individual> {
  crowding_distance(&mut pool, Dimensions::Objectives);

  let mut selected: Vec<usize> = Vec::with_capacity(size);
  for mut front in fronts {
    let free = size - selected.len();
    if front.len() > free {
      // stable sort keeps index order among equally crowded members
      front.sort_by(|&a, &b| {
        pool[b].crowding_distance().total_cmp(&pool[a].crowding_distance())
      });
      front.truncate(free);
    }
    selected.append(&mut front);
    if selected.len() == size {
      break;
    }
  }

  let mut some_individuals: Vec<_> = pool.into_iter().map(Some).collect();
  selected
    .into_iter()
    .filter_map(|idx| some_individuals[idx].take())
    .collect()
}
