//! Parent selection operators.

use std::cmp::Ordering;

use rand::RngCore;

use crate::individual::Individual;

/// An operator that picks one parent out of a pool of ranked individuals.
///
/// `candidates` holds indices into `pool` the parent may be chosen from, so a
/// driver can exclude an already chosen parent without copying the pool. The
/// returned value is an index into `pool`.
///
/// # Examples
/// ```
/// # use moevo::{individual::Individual, selection::Selector};
/// # use rand::RngCore;
/// // always picks the first candidate
/// let s = |_: &[Individual], c: &[usize], _: &mut dyn RngCore| c[0];
/// # fn takes<S: Selector>(_: S) {}
/// # takes(s);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Selector {
  /// Returns the index of the selected individual.
  ///
  /// # Panics
  ///
  /// Implementations panic if `candidates` is empty.
  fn select(
    &self,
    pool: &[Individual],
    candidates: &[usize],
    rng: &mut dyn RngCore,
  ) -> usize;
}

impl<F> Selector for F
where
  F: Fn(&[Individual], &[usize], &mut dyn RngCore) -> usize,
{
  fn select(
    &self,
    pool: &[Individual],
    candidates: &[usize],
    rng: &mut dyn RngCore,
  ) -> usize {
    self(pool, candidates, rng)
  }
}

/// Crowded comparison: the individual from the lower front is better, and
/// within a front the one with the larger crowding distance is. `Less` means
/// `a` is better.
pub fn crowded_cmp(a: &Individual, b: &Individual) -> Ordering {
  a.front_number()
    .cmp(&b.front_number())
    .then_with(|| b.crowding_distance().total_cmp(&a.crowding_distance()))
}

/// Samples `n` distinct candidates uniformly and selects the best of them by
/// [`crowded_cmp`]. When two sampled individuals tie, the one sampled first
/// wins. A pool smaller than `n` holds a tournament among all its candidates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TournamentSelector(pub usize);

impl Default for TournamentSelector {
  /// Binary tournament.
  fn default() -> Self {
    Self(2)
  }
}

impl Selector for TournamentSelector {
  fn select(
    &self,
    pool: &[Individual],
    candidates: &[usize],
    rng: &mut dyn RngCore,
  ) -> usize {
    assert!(!candidates.is_empty(), "cannot select from an empty pool");
    let size = self.0.clamp(1, candidates.len());
    rand::seq::index::sample(rng, candidates.len(), size)
      .iter()
      .map(|i| candidates[i])
      .reduce(|best, idx| {
        if crowded_cmp(&pool[idx], &pool[best]) == Ordering::Less {
          idx
        } else {
          best
        }
      })
      .unwrap_or(candidates[0])
  }
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;
  use crate::individual::IdSequence;

  fn ranked(ids: &IdSequence, front: u32, crowding: f64) -> Individual {
    let mut individual = Individual::with_costs(ids, vec![0.0], vec![0.0]);
    individual.front_number = front;
    individual.crowding_distance = crowding;
    individual
  }

  #[test]
  fn test_crowded_comparison() {
    let ids = IdSequence::new();
    let a = ranked(&ids, 1, 0.1);
    let b = ranked(&ids, 2, f64::INFINITY);
    let c = ranked(&ids, 1, 0.5);
    assert_eq!(crowded_cmp(&a, &b), Ordering::Less);
    assert_eq!(crowded_cmp(&c, &a), Ordering::Less);
    assert_eq!(crowded_cmp(&a, &a), Ordering::Equal);
  }

  #[test]
  fn test_full_tournament_picks_the_best() {
    let ids = IdSequence::new();
    let pool = vec![
      ranked(&ids, 2, 1.0),
      ranked(&ids, 1, 0.2),
      ranked(&ids, 1, 0.7),
      ranked(&ids, 3, f64::INFINITY),
    ];
    let mut rng = StdRng::seed_from_u64(0);
    let selector = TournamentSelector(pool.len());
    assert_eq!(selector.select(&pool, &[0, 1, 2, 3], &mut rng), 2);
    assert_eq!(selector.select(&pool, &[0, 1, 3], &mut rng), 1);
    assert_eq!(selector.select(&pool, &[3], &mut rng), 3);
  }

  #[test]
  fn test_selection_is_reproducible() {
    let ids = IdSequence::new();
    let pool: Vec<_> = (0..20)
      .map(|i| ranked(&ids, 1 + i % 4, f64::from(i) / 10.0))
      .collect();
    let candidates: Vec<usize> = (0..pool.len()).collect();
    let run = |seed| {
      let mut rng = StdRng::seed_from_u64(seed);
      (0..30)
        .map(|_| {
          TournamentSelector::default().select(&pool, &candidates, &mut rng)
        })
        .collect::<Vec<_>>()
    };
    assert_eq!(run(5), run(5));
  }

  #[test]
  fn test_selection_respects_candidates() {
    let ids = IdSequence::new();
    let pool: Vec<_> = (0..6).map(|_| ranked(&ids, 1, 1.0)).collect();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
      let idx = TournamentSelector::default().select(&pool, &[1, 4], &mut rng);
      assert!(idx == 1 || idx == 4);
    }
  }

  #[test]
  fn test_selector_from_closure() {
    let ids = IdSequence::new();
    let pool = vec![ranked(&ids, 1, 0.0), ranked(&ids, 1, 0.0)];
    let last =
      |_: &[Individual], c: &[usize], _: &mut dyn RngCore| c[c.len() - 1];
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(last.select(&pool, &[0, 1], &mut rng), 1);
  }

  #[test]
  #[should_panic]
  fn test_empty_pool_panics() {
    let mut rng = StdRng::seed_from_u64(0);
    TournamentSelector::default().select(&[], &[], &mut rng);
  }
}
