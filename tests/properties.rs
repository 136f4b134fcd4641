//! Property-based tests of ranking and archiving.

use moevo::{
  archive::Archive,
  crowding::{crowding_distance, Dimensions},
  dominance::{DominanceComparator, EpsilonDominance, ParetoDominance},
  individual::{IdSequence, Individual},
  sorting::nondominated_sort,
};
use proptest::prelude::*;

fn pool(costs: &[Vec<f64>]) -> Vec<Individual> {
  let ids = IdSequence::new();
  costs
    .iter()
    .map(|c| Individual::with_costs(&ids, vec![0.0], c.clone()))
    .collect()
}

// small integer grids produce plenty of ties and duplicates
fn cost_grid(
  objectives: usize,
  max: usize,
) -> impl Strategy<Value = Vec<Vec<f64>>> {
  prop::collection::vec(
    prop::collection::vec((0u8..6).prop_map(f64::from), objectives),
    1..max,
  )
}

proptest! {
  #[test]
  fn fronts_layer_the_dominance_relation(costs in cost_grid(3, 25)) {
    let mut pool = pool(&costs);
    let fronts = nondominated_sort(&mut pool, &ParetoDominance);

    prop_assert_eq!(fronts.iter().map(Vec::len).sum::<usize>(), pool.len());
    for (k, front) in fronts.iter().enumerate() {
      for &a in front {
        prop_assert_eq!(pool[a].front_number() as usize, k + 1);
        for &b in front {
          prop_assert!(
            !ParetoDominance.dominates(pool[b].costs(), pool[a].costs())
          );
        }
        if k > 0 {
          let dominated_by_previous = fronts[k - 1].iter().any(|&b| {
            ParetoDominance.dominates(pool[b].costs(), pool[a].costs())
          });
          prop_assert!(dominated_by_previous);
        }
      }
    }
  }

  #[test]
  fn extremes_are_infinitely_crowded(
    values in prop::collection::hash_set(-500i32..500, 1..30)
  ) {
    let costs: Vec<Vec<f64>> =
      values.iter().map(|&v| vec![f64::from(v)]).collect();
    let mut pool = pool(&costs);
    crowding_distance(&mut pool, Dimensions::Objectives);

    let by_value = |a: &&Individual, b: &&Individual| {
      a.costs()[0].total_cmp(&b.costs()[0])
    };
    let min = pool.iter().min_by(by_value).unwrap();
    let max = pool.iter().max_by(by_value).unwrap();
    prop_assert_eq!(min.crowding_distance(), f64::INFINITY);
    prop_assert_eq!(max.crowding_distance(), f64::INFINITY);
    for individual in &pool {
      prop_assert!(individual.crowding_distance() >= 0.0);
    }
  }

  #[test]
  fn pareto_archive_holds_no_dominated_pair(costs in cost_grid(2, 40)) {
    let mut archive = Archive::new(ParetoDominance);
    for individual in pool(&costs) {
      archive.add(individual);
    }
    prop_assert!(!archive.is_empty());
    for a in &archive {
      for b in &archive {
        prop_assert!(!ParetoDominance.dominates(a.costs(), b.costs()));
      }
    }
  }

  #[test]
  fn epsilon_archive_holds_no_dominated_pair(costs in cost_grid(2, 40)) {
    let comparator = EpsilonDominance::uniform(1.5);
    let mut archive = Archive::new(comparator.clone());
    for individual in pool(&costs) {
      archive.add(individual);
    }
    for a in &archive {
      for b in &archive {
        prop_assert!(!comparator.dominates(a.costs(), b.costs()));
      }
    }
  }

  #[test]
  fn truncation_removes_the_most_crowded(
    costs in cost_grid(2, 40),
    max_size in 0usize..12
  ) {
    let mut archive = Archive::new(ParetoDominance);
    for individual in pool(&costs) {
      archive.add(individual);
    }
    let size = archive.len();
    let mut current = archive.members().to_vec();

    let removed = archive.truncate(max_size, Dimensions::Objectives);
    prop_assert_eq!(archive.len(), size.min(max_size));
    prop_assert_eq!(removed.len(), size - archive.len());

    for member in &removed {
      crowding_distance(&mut current, Dimensions::Objectives);
      let lowest = current
        .iter()
        .map(Individual::crowding_distance)
        .fold(f64::INFINITY, f64::min);
      let idx = current.iter().position(|i| i.id() == member.id()).unwrap();
      prop_assert_eq!(current[idx].crowding_distance(), lowest);
      current.remove(idx);
    }
  }
}
