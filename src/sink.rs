//! Persistence hooks.
//!
//! Optimizers report every evaluated individual and every recorded population
//! to a [`PersistenceSink`]. Writes are fire-and-forget: a sink cannot fail a
//! run, so it has nothing to return.

use std::sync::{Arc, Mutex};

/// A flat record of an individual.
///
/// Infinite crowding distances and feasibilities are written as `0`.
#[derive(Clone, Debug, PartialEq)]
pub struct IndividualSnapshot {
  /// Id of the individual.
  pub id: u64,
  /// Index of the population the individual was created for.
  pub population_id: usize,
  /// Decision vector.
  pub parameters: Vec<f64>,
  /// Objective vector.
  pub costs: Vec<f64>,
  /// Front number at the time of the snapshot.
  pub front_number: u32,
  /// Crowding distance at the time of the snapshot.
  pub crowding_distance: f64,
  /// Sum of absolute constraint violations.
  pub feasibility: f64,
  /// Ids of individuals dominated by this one.
  pub dominates: Vec<u64>,
}

/// A flat record of a population.
#[derive(Clone, Debug, PartialEq)]
pub struct PopulationSnapshot {
  /// Index of the population in the run's history.
  pub population_id: usize,
  /// Records of the population's individuals in population order.
  pub individuals: Vec<IndividualSnapshot>,
}

/// Receives snapshots of individuals and populations during a run.
pub trait PersistenceSink {
  /// Called after an individual is evaluated.
  fn write_individual(&mut self, snapshot: &IndividualSnapshot);

  /// Called after a population is recorded.
  fn write_population(&mut self, snapshot: &PopulationSnapshot);
}

/// Discards everything.
impl PersistenceSink for () {
  fn write_individual(&mut self, _: &IndividualSnapshot) {}

  fn write_population(&mut self, _: &PopulationSnapshot) {}
}

impl<S: PersistenceSink + ?Sized> PersistenceSink for Box<S> {
  fn write_individual(&mut self, snapshot: &IndividualSnapshot) {
    (**self).write_individual(snapshot)
  }

  fn write_population(&mut self, snapshot: &PopulationSnapshot) {
    (**self).write_population(snapshot)
  }
}

/// Lets the caller keep a handle to a sink that was moved into an optimizer.
/// A poisoned lock drops the write.
impl<S: PersistenceSink + ?Sized> PersistenceSink for Arc<Mutex<S>> {
  fn write_individual(&mut self, snapshot: &IndividualSnapshot) {
    if let Ok(mut sink) = self.lock() {
      sink.write_individual(snapshot);
    }
  }

  fn write_population(&mut self, snapshot: &PopulationSnapshot) {
    if let Ok(mut sink) = self.lock() {
      sink.write_population(snapshot);
    }
  }
}

/// Keeps every snapshot in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
  /// Individual records in the order they were written.
  pub individuals: Vec<IndividualSnapshot>,
  /// Population records in the order they were written.
  pub populations: Vec<PopulationSnapshot>,
}

impl PersistenceSink for MemorySink {
  fn write_individual(&mut self, snapshot: &IndividualSnapshot) {
    self.individuals.push(snapshot.clone());
  }

  fn write_population(&mut self, snapshot: &PopulationSnapshot) {
    self.populations.push(snapshot.clone());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::individual::{IdSequence, Individual};

  #[test]
  fn test_shared_memory_sink() {
    let ids = IdSequence::new();
    let shared = Arc::new(Mutex::new(MemorySink::default()));
    let mut sink: Box<dyn PersistenceSink + Send> = Box::new(shared.clone());

    let individual = Individual::with_costs(&ids, vec![1.0], vec![1.0]);
    sink.write_individual(&individual.snapshot());
    sink.write_population(&PopulationSnapshot {
      population_id: 0,
      individuals: vec![individual.snapshot()],
    });

    let memory = shared.lock().unwrap();
    assert_eq!(memory.individuals.len(), 1);
    assert_eq!(memory.populations.len(), 1);
    assert_eq!(memory.populations[0].individuals[0].id, 0);
  }
}
