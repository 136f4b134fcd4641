//! Bounded, dominance-pruned elite archive.

use itertools::Itertools;
use log::trace;
use rand::{seq::SliceRandom, RngCore};

use crate::{
  crowding::{crowding_distance, Dimensions},
  dominance::{DominanceComparator, ParetoDominance},
  error::{Error, Result},
  individual::Individual,
};

/// A set of mutually non-dominated individuals.
///
/// The archive owns copies of its members. No member dominates another under
/// the archive's comparator after any sequence of [`add`](Archive::add)
/// calls. The archive is unbounded until it is explicitly
/// [truncated](Archive::truncate).
#[derive(Clone, Debug, Default)]
pub struct Archive<D = ParetoDominance> {
  members: Vec<Individual>,
  comparator: D,
}

impl<D: DominanceComparator> Archive<D> {
  /// Creates an empty archive using given comparator.
  pub fn new(comparator: D) -> Self {
    Self {
      members: Vec::new(),
      comparator,
    }
  }

  /// Comparator of the archive.
  pub fn comparator(&self) -> &D {
    &self.comparator
  }

  /// Number of members.
  pub fn len(&self) -> usize {
    self.members.len()
  }

  /// Returns `true` if the archive holds no members.
  pub fn is_empty(&self) -> bool {
    self.members.is_empty()
  }

  /// Members in insertion order.
  pub fn members(&self) -> &[Individual] {
    &self.members
  }

  /// Iterates over members in insertion order.
  pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
    self.members.iter()
  }

  /// Moves the members out of the archive.
  pub fn into_members(self) -> Vec<Individual> {
    self.members
  }

  /// Offers an individual to the archive.
  ///
  /// The individual is rejected if any member dominates it. Otherwise it is
  /// accepted and every member it dominates is evicted. Returns `true` if the
  /// individual was accepted.
  ///
  /// # Panics
  ///
  /// Panics if the individual has not been evaluated.
  pub fn add(&mut self, individual: Individual) -> bool {
    assert!(
      individual.is_evaluated(),
      "individual {} must be evaluated to enter an archive",
      individual.id()
    );
    if let Some(dominator) = self
      .members
      .iter()
      .find(|m| self.comparator.dominates(m.costs(), individual.costs()))
    {
      trace!(
        "individual {} rejected, dominated by {}",
        individual.id(),
        dominator.id()
      );
      return false;
    }

    let comparator = &self.comparator;
    self.members.retain(|member| {
      let evicted = comparator.dominates(individual.costs(), member.costs());
      if evicted {
        trace!(
          "individual {} evicted by {}",
          member.id(),
          individual.id()
        );
      }
      !evicted
    });
    self.members.push(individual);
    true
  }

  /// Removes members one at a time until at most `max_size` remain.
  ///
  /// Before every removal the crowding distance is recomputed over the
  /// current members along `dimensions`, and the member with the smallest
  /// distance is removed. The first of several equally crowded members goes.
  /// Returns the removed members in removal order.
  pub fn truncate(
    &mut self,
    max_size: usize,
    dimensions: Dimensions,
  ) -> Vec<Individual> {
    let mut removed = Vec::new();
    while self.members.len() > max_size {
      crowding_distance(&mut self.members, dimensions);
      let Some(idx) = self
        .members
        .iter()
        .position_min_by(|a, b| {
          a.crowding_distance().total_cmp(&b.crowding_distance())
        })
      else {
        break;
      };
      let member = self.members.remove(idx);
      trace!(
        "individual {} truncated with crowding distance {}",
        member.id(),
        member.crowding_distance()
      );
      removed.push(member);
    }
    removed
  }

  /// Picks one member uniformly at random.
  pub fn rand_choice(&self, rng: &mut dyn RngCore) -> Result<&Individual> {
    self
      .members
      .choose(rng)
      .ok_or(Error::InsufficientArchiveSample {
        requested: 1,
        available: 0,
      })
  }

  /// Picks `k` distinct members uniformly at random.
  ///
  /// Fails with [`Error::InsufficientArchiveSample`] if `k` exceeds the
  /// number of members.
  pub fn rand_sample(
    &self,
    k: usize,
    rng: &mut dyn RngCore,
  ) -> Result<Vec<&Individual>> {
    if k > self.members.len() {
      return Err(Error::InsufficientArchiveSample {
        requested: k,
        available: self.members.len(),
      });
    }
    Ok(
      rand::seq::index::sample(rng, self.members.len(), k)
        .iter()
        .map(|idx| &self.members[idx])
        .collect(),
    )
  }
}

impl<'a, D> IntoIterator for &'a Archive<D> {
  type Item = &'a Individual;
  type IntoIter = std::slice::Iter<'a, Individual>;

  fn into_iter(self) -> Self::IntoIter {
    self.members.iter()
  }
}
