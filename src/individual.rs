//! Candidate solutions and the sequence that numbers them.

use std::{
  ops::Range,
  sync::atomic::{AtomicU64, Ordering},
};

use crate::{evaluation::Evaluation, sink::IndividualSnapshot};

/// Hands out unique, monotonically increasing individual ids.
///
/// A sequence is owned by an optimizer run, so repeated runs within one
/// process number their individuals independently. Allocation is atomic,
/// which makes it safe to share a sequence between threads, although
/// optimizers only allocate ids on their coordinating thread.
#[derive(Debug, Default)]
pub struct IdSequence {
  next: AtomicU64,
}

impl IdSequence {
  /// Creates a sequence starting at `0`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a sequence whose first id is `first`. Useful to continue
  /// numbering of a previously persisted run.
  pub fn starting_at(first: u64) -> Self {
    Self {
      next: AtomicU64::new(first),
    }
  }

  /// Allocates the next id.
  pub fn next_id(&self) -> u64 {
    self.next.fetch_add(1, Ordering::Relaxed)
  }

  /// Reserves a contiguous block of `count` ids.
  pub fn reserve(&self, count: usize) -> Range<u64> {
    let start = self.next.fetch_add(count as u64, Ordering::Relaxed);
    start..start + count as u64
  }

  /// Returns the id that will be allocated next without allocating it.
  pub fn peek(&self) -> u64 {
    self.next.load(Ordering::Relaxed)
  }
}

/// Per-particle state carried by swarm optimizers.
#[derive(Clone, Debug, PartialEq)]
pub struct SwarmFeatures {
  /// Velocity, one component per decision parameter.
  pub velocity: Vec<f64>,
  /// Objective vector of the particle's personal best.
  pub best_costs: Vec<f64>,
  /// Decision vector of the particle's personal best.
  pub best_vector: Vec<f64>,
}

/// One candidate solution.
///
/// An individual is created unevaluated, evaluated exactly once, and from then
/// on its decision and objective vectors stay fixed. Front number, crowding
/// distance and dominance bookkeeping are recomputed from scratch on every
/// ranking pass.
#[derive(Clone, Debug)]
pub struct Individual {
  id: u64,
  population_id: usize,
  pub(crate) vector: Vec<f64>,
  pub(crate) costs: Vec<f64>,
  feasibility: f64,
  evaluated: bool,
  pub(crate) front_number: u32,
  pub(crate) crowding_distance: f64,
  pub(crate) domination_counter: u32,
  pub(crate) dominates: Vec<u64>,
  pub(crate) swarm: Option<SwarmFeatures>,
}

impl Individual {
  /// Creates an unevaluated individual with an id taken from `ids`.
  pub fn new(ids: &IdSequence, vector: Vec<f64>, population_id: usize) -> Self {
    Self::with_id(ids.next_id(), vector, population_id)
  }

  /// Creates an unevaluated individual with an explicit, previously reserved
  /// id.
  pub fn with_id(id: u64, vector: Vec<f64>, population_id: usize) -> Self {
    Self {
      id,
      population_id,
      vector,
      costs: Vec::new(),
      feasibility: 0.0,
      evaluated: false,
      front_number: 0,
      crowding_distance: 0.0,
      domination_counter: 0,
      dominates: Vec::new(),
      swarm: None,
    }
  }

  /// Creates an individual that is already evaluated, e.g. one restored from
  /// persisted results.
  pub fn with_costs(
    ids: &IdSequence,
    vector: Vec<f64>,
    costs: Vec<f64>,
  ) -> Self {
    let mut individual = Self::new(ids, vector, 0);
    individual.set_evaluation(Evaluation::new(costs));
    individual
  }

  /// Creates a fresh, unevaluated individual that starts at this individual's
  /// decision vector and inherits its swarm features.
  pub fn successor(&self, ids: &IdSequence, population_id: usize) -> Self {
    let mut next = Self::new(ids, self.vector.clone(), population_id);
    next.swarm = self.swarm.clone();
    next
  }

  /// Unique id of the individual.
  pub fn id(&self) -> u64 {
    self.id
  }

  /// Index of the population this individual was created for.
  pub fn population_id(&self) -> usize {
    self.population_id
  }

  /// Decision vector.
  pub fn vector(&self) -> &[f64] {
    &self.vector
  }

  /// Mutable decision vector.
  ///
  /// # Panics
  ///
  /// Panics if the individual has already been evaluated.
  pub fn vector_mut(&mut self) -> &mut [f64] {
    assert!(
      !self.evaluated,
      "individual {} is evaluated and cannot be changed",
      self.id
    );
    &mut self.vector
  }

  /// Objective vector. Empty until the individual is evaluated.
  pub fn costs(&self) -> &[f64] {
    &self.costs
  }

  /// Sum of absolute constraint violations, `0` for feasible individuals.
  pub fn feasibility(&self) -> f64 {
    self.feasibility
  }

  /// Returns `true` if no constraint is violated.
  pub fn is_feasible(&self) -> bool {
    self.feasibility == 0.0
  }

  /// Returns `true` once the individual was evaluated.
  pub fn is_evaluated(&self) -> bool {
    self.evaluated
  }

  /// Front number, `1` being the best front and `0` meaning unranked.
  pub fn front_number(&self) -> u32 {
    self.front_number
  }

  /// Crowding distance computed by the last density pass.
  pub fn crowding_distance(&self) -> f64 {
    self.crowding_distance
  }

  /// Number of individuals that dominated this one in the last sort.
  pub fn domination_counter(&self) -> u32 {
    self.domination_counter
  }

  /// Ids of individuals this one dominated in the last sort.
  pub fn dominates(&self) -> &[u64] {
    &self.dominates
  }

  /// Swarm features, if this individual is a swarm particle.
  pub fn swarm(&self) -> Option<&SwarmFeatures> {
    self.swarm.as_ref()
  }

  /// Mutable swarm features, if this individual is a swarm particle.
  pub fn swarm_mut(&mut self) -> Option<&mut SwarmFeatures> {
    self.swarm.as_mut()
  }

  /// Turns an evaluated individual into a swarm particle at rest whose
  /// personal best is its current state.
  ///
  /// # Panics
  ///
  /// Panics if the individual has not been evaluated.
  pub fn init_swarm(&mut self) {
    assert!(
      self.evaluated,
      "individual {} must be evaluated to join a swarm",
      self.id
    );
    self.swarm = Some(SwarmFeatures {
      velocity: vec![0.0; self.vector.len()],
      best_costs: self.costs.clone(),
      best_vector: self.vector.clone(),
    });
  }

  /// Stores the evaluation result.
  ///
  /// # Panics
  ///
  /// Panics if the individual has already been evaluated.
  pub(crate) fn set_evaluation(&mut self, evaluation: Evaluation) {
    assert!(!self.evaluated, "individual {} evaluated twice", self.id);
    self.feasibility = evaluation.feasibility();
    self.costs = evaluation.costs;
    self.evaluated = true;
  }

  /// Resets front number, crowding distance and dominance bookkeeping.
  pub(crate) fn reset_ranking(&mut self) {
    self.front_number = 0;
    self.crowding_distance = 0.0;
    self.domination_counter = 0;
    self.dominates.clear();
  }

  /// Returns a flat record of this individual for persistence sinks.
  pub fn snapshot(&self) -> IndividualSnapshot {
    let finite_or_zero = |v: f64| if v.is_infinite() { 0.0 } else { v };
    IndividualSnapshot {
      id: self.id,
      population_id: self.population_id,
      parameters: self.vector.clone(),
      costs: self.costs.clone(),
      front_number: self.front_number,
      crowding_distance: finite_or_zero(self.crowding_distance),
      feasibility: finite_or_zero(self.feasibility),
      dominates: self.dominates.clone(),
    }
  }
}
