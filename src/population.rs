//! Populations of individuals and the history of a run.

use std::ops::Deref;

use crate::{individual::Individual, sink::PopulationSnapshot};

/// An ordered collection of individuals of one generation. Insertion order
/// is creation order.
#[derive(Clone, Debug, Default)]
pub struct Population {
  individuals: Vec<Individual>,
}

impl Population {
  /// Creates a population owning given individuals.
  pub fn new(individuals: Vec<Individual>) -> Self {
    Self { individuals }
  }

  /// Returns the individuals.
  pub fn individuals(&self) -> &[Individual] {
    &self.individuals
  }

  /// Moves the individuals out of the population.
  pub fn into_individuals(self) -> Vec<Individual> {
    self.individuals
  }

  /// Returns a flat record of every individual for persistence sinks.
  pub fn snapshot(&self, population_id: usize) -> PopulationSnapshot {
    PopulationSnapshot {
      population_id,
      individuals: self.individuals.iter().map(Individual::snapshot).collect(),
    }
  }
}

impl Deref for Population {
  type Target = [Individual];

  fn deref(&self) -> &Self::Target {
    &self.individuals
  }
}

impl FromIterator<Individual> for Population {
  fn from_iter<I: IntoIterator<Item = Individual>>(iter: I) -> Self {
    Self::new(iter.into_iter().collect())
  }
}

impl IntoIterator for Population {
  type Item = Individual;
  type IntoIter = std::vec::IntoIter<Individual>;

  fn into_iter(self) -> Self::IntoIter {
    self.individuals.into_iter()
  }
}

/// Append-only record of the populations of a run, one per generation or
/// iteration. Recorded populations are never changed.
#[derive(Clone, Debug, Default)]
pub struct History {
  populations: Vec<Population>,
}

impl History {
  /// Creates an empty history.
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a population and returns its index.
  pub fn push(&mut self, population: Population) -> usize {
    self.populations.push(population);
    self.populations.len() - 1
  }

  /// Number of recorded populations.
  pub fn len(&self) -> usize {
    self.populations.len()
  }

  /// Returns `true` if nothing was recorded yet.
  pub fn is_empty(&self) -> bool {
    self.populations.is_empty()
  }

  /// Returns the population recorded at `index`.
  pub fn get(&self, index: usize) -> Option<&Population> {
    self.populations.get(index)
  }

  /// Returns the last recorded population.
  pub fn last(&self) -> Option<&Population> {
    self.populations.last()
  }

  /// Iterates over recorded populations in recording order.
  pub fn iter(&self) -> std::slice::Iter<'_, Population> {
    self.populations.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::individual::IdSequence;

  #[test]
  fn test_history_appends_in_order() {
    let ids = IdSequence::new();
    let mut history = History::new();
    assert!(history.is_empty());

    let first: Population =
      (0..3).map(|i| Individual::new(&ids, vec![i as f64], 0)).collect();
    let second: Population =
      (0..2).map(|i| Individual::new(&ids, vec![i as f64], 1)).collect();
    assert_eq!(history.push(first), 0);
    assert_eq!(history.push(second), 1);

    assert_eq!(history.len(), 2);
    assert_eq!(history.get(0).map(|p| p.len()), Some(3));
    assert_eq!(history.last().map(|p| p[0].id()), Some(3));
    assert_eq!(history.iter().map(|p| p.len()).sum::<usize>(), 5);
  }

  #[test]
  fn test_population_snapshot() {
    let ids = IdSequence::new();
    let population = Population::new(vec![
      Individual::with_costs(&ids, vec![1.0], vec![2.0]),
      Individual::with_costs(&ids, vec![3.0], vec![4.0]),
    ]);
    let snapshot = population.snapshot(5);
    assert_eq!(snapshot.population_id, 5);
    assert_eq!(
      snapshot.individuals.iter().map(|s| s.id).collect::<Vec<_>>(),
      vec![0, 1]
    );
  }
}
