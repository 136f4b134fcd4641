//! Fast non-dominated sorting.

use crate::{
  dominance::{Dominance, DominanceComparator},
  individual::Individual,
};

/// Indices of pool members that share a front.
pub type Front = Vec<usize>;

// index of an individual in the sorted pool
type PoolIndex = usize;
// number of individuals dominating an individual
type DominanceCounter = u32;
// indices of individuals dominated by an individual
type DominanceList = Vec<PoolIndex>;

/// Assigns a front number to every individual of `pool` and returns the fronts
/// as lists of pool indices, best front first.
///
/// The dominance relation is built over indices, then written back into the
/// individuals: every individual gets its domination counter, the ids of the
/// individuals it dominates and its front number, starting at `1`. Ranking
/// bookkeeping from previous passes is reset first.
///
/// # Panics
///
/// Panics if `pool` is empty or contains an unevaluated individual.
pub fn nondominated_sort<D>(
  pool: &mut [Individual],
  comparator: &D,
) -> Vec<Front>
where
  D: DominanceComparator + ?Sized,
{
  assert!(!pool.is_empty(), "cannot sort an empty pool");
  assert!(
    pool.iter().all(Individual::is_evaluated),
    "every individual must be evaluated before sorting"
  );
  pool.iter_mut().for_each(Individual::reset_ranking);

  let mut dominance_lists: Vec<DominanceList> = vec![Vec::new(); pool.len()];
  let mut dominance_counters: Vec<DominanceCounter> = vec![0; pool.len()];

  // one comparison per unordered pair updates both sides
  for p_idx in 0..pool.len() {
    for q_idx in p_idx + 1..pool.len() {
      match comparator.compare(pool[p_idx].costs(), pool[q_idx].costs()) {
        Dominance::ADominates => {
          dominance_lists[p_idx].push(q_idx);
          dominance_counters[q_idx] += 1;
        }
        Dominance::BDominates => {
          dominance_lists[q_idx].push(p_idx);
          dominance_counters[p_idx] += 1;
        }
        Dominance::NonDominated => {}
      }
    }
  }

  for (idx, individual) in pool.iter_mut().enumerate() {
    individual.domination_counter = dominance_counters[idx];
  }
  for (idx, dominated) in dominance_lists.iter().enumerate() {
    let ids: Vec<u64> = dominated.iter().map(|&q| pool[q].id()).collect();
    pool[idx].dominates = ids;
  }

  let mut fronts: Vec<Front> = Vec::new();
  let mut front: Front = (0..pool.len())
    .filter(|&idx| dominance_counters[idx] == 0)
    .collect();
  let mut front_number = 1;
  while !front.is_empty() {
    let mut next_front = Vec::new();
    for &p_idx in &front {
      pool[p_idx].front_number = front_number;
      for &q_idx in &dominance_lists[p_idx] {
        dominance_counters[q_idx] -= 1;
        if dominance_counters[q_idx] == 0 {
          next_front.push(q_idx);
        }
      }
    }
    fronts.push(front);
    front = next_front;
    front_number += 1;
  }

  debug_assert_eq!(
    fronts.iter().map(Vec::len).sum::<usize>(),
    pool.len(),
    "every individual must be assigned a front"
  );

  fronts
}
