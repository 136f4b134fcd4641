//! Crowding distance, a density estimate used to prefer individuals from
//! sparse regions among equally ranked ones.

use itertools::Itertools;

use crate::individual::Individual;

/// Dimensions the crowding distance is measured over.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Dimensions {
  /// Objective vectors. Used to rank NSGA-II fronts.
  #[default]
  Objectives,
  /// Decision vectors. Used to truncate the swarm leader archive.
  Parameters,
}

impl Dimensions {
  /// Returns the values of `individual` along these dimensions.
  pub fn of(self, individual: &Individual) -> &[f64] {
    match self {
      Dimensions::Objectives => individual.costs(),
      Dimensions::Parameters => individual.vector(),
    }
  }
}

/// Computes the crowding distance of every individual in `pool`.
///
/// For each dimension, individuals are sorted by their value on it. The two
/// extremes get an infinite contribution and every interior individual gets
/// the distance between its neighbours divided by the dimension's range. A
/// dimension where all values are equal contributes nothing to interior
/// individuals. Accumulated distances are divided by the dimension count, so
/// values are comparable only within the pool they were computed over.
///
/// # Examples
/// ```
/// # use moevo::{crowding::{crowding_distance, Dimensions}, individual::*};
/// let ids = IdSequence::new();
/// let mut pool: Vec<_> = [[1.0, 5.0], [2.0, 3.0], [3.0, 2.0], [5.0, 1.0]]
///   .iter()
///   .map(|c| Individual::with_costs(&ids, vec![0.0], c.to_vec()))
///   .collect();
/// crowding_distance(&mut pool, Dimensions::Objectives);
/// assert_eq!(pool[0].crowding_distance(), f64::INFINITY);
/// assert_eq!(pool[1].crowding_distance(), 0.625);
/// ```
pub fn crowding_distance(pool: &mut [Individual], dimensions: Dimensions) {
  let members: Vec<usize> = (0..pool.len()).collect();
  assign_crowding(pool, &members, dimensions);
}

/// Computes the crowding distance over the `members` subset of `pool`, e.g.
/// over one front. Individuals outside of `members` are left untouched.
pub(crate) fn assign_crowding(
  pool: &mut [Individual],
  members: &[usize],
  dimensions: Dimensions,
) {
  for &idx in members {
    pool[idx].crowding_distance = 0.0;
  }
  let Some(&first) = members.first() else {
    return;
  };
  let dimension_count = dimensions.of(&pool[first]).len();
  if dimension_count == 0 {
    return;
  }

  for dim in 0..dimension_count {
    let value = |idx: usize| dimensions.of(&pool[idx])[dim];
    let sorted: Vec<usize> = members
      .iter()
      .copied()
      .sorted_by(|&a, &b| value(a).total_cmp(&value(b)))
      .collect();
    let (low_idx, high_idx) = (sorted[0], sorted[sorted.len() - 1]);
    let range = value(high_idx) - value(low_idx);
    let contributions: Vec<(usize, f64)> = if range > 0.0 && range.is_finite() {
      sorted
        .windows(3)
        .map(|w| (w[1], (value(w[2]) - value(w[0])) / range))
        .collect()
    } else {
      Vec::new()
    };

    pool[low_idx].crowding_distance += f64::INFINITY;
    pool[high_idx].crowding_distance += f64::INFINITY;
    for (idx, contribution) in contributions {
      pool[idx].crowding_distance += contribution;
    }
  }

  for &idx in members {
    pool[idx].crowding_distance /= dimension_count as f64;
  }
}
