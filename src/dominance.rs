//! Pareto dominance comparators.
//!
//! All objectives are minimized. A vector `a` dominates a vector `b` if `a`
//! is no worse than `b` in every objective and strictly better in at least
//! one of them.

use std::cmp::Ordering;

/// Outcome of a pairwise dominance comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Dominance {
  /// The first vector dominates the second.
  ADominates,
  /// The second vector dominates the first.
  BDominates,
  /// Neither vector dominates the other. Equal vectors are non-dominated.
  NonDominated,
}

impl Dominance {
  /// Numeric outcome code: `0` non-dominated, `1` first dominates, `2` second
  /// dominates.
  pub fn code(self) -> u8 {
    match self {
      Dominance::NonDominated => 0,
      Dominance::ADominates => 1,
      Dominance::BDominates => 2,
    }
  }

  /// Outcome of the same comparison with swapped arguments.
  pub fn flip(self) -> Self {
    match self {
      Dominance::ADominates => Dominance::BDominates,
      Dominance::BDominates => Dominance::ADominates,
      Dominance::NonDominated => Dominance::NonDominated,
    }
  }
}

/// Compares two objective vectors.
pub trait DominanceComparator {
  /// Compares objective vectors `a` and `b`.
  fn compare(&self, a: &[f64], b: &[f64]) -> Dominance;

  /// Returns `true` if `a` dominates `b`.
  fn dominates(&self, a: &[f64], b: &[f64]) -> bool {
    self.compare(a, b) == Dominance::ADominates
  }
}

impl<C: DominanceComparator + ?Sized> DominanceComparator for &C {
  fn compare(&self, a: &[f64], b: &[f64]) -> Dominance {
    (**self).compare(a, b)
  }
}

impl<C: DominanceComparator + ?Sized> DominanceComparator for Box<C> {
  fn compare(&self, a: &[f64], b: &[f64]) -> Dominance {
    (**self).compare(a, b)
  }
}

/// Folds per-objective orderings into a dominance outcome. Comparing with a
/// `NaN` makes the pair non-dominated.
fn pareto<I>(pairs: I) -> Dominance
where
  I: IntoIterator<Item = (f64, f64)>,
{
  let mut ord = Ordering::Equal;
  for (a, b) in pairs {
    match (ord, a.partial_cmp(&b)) {
      (_, None) => return Dominance::NonDominated,
      (Ordering::Equal, Some(next_ord)) => ord = next_ord,
      (Ordering::Greater, Some(Ordering::Less))
      | (Ordering::Less, Some(Ordering::Greater)) => {
        return Dominance::NonDominated
      }
      _ => {}
    }
  }
  match ord {
    Ordering::Less => Dominance::ADominates,
    Ordering::Greater => Dominance::BDominates,
    Ordering::Equal => Dominance::NonDominated,
  }
}

/// Plain Pareto dominance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ParetoDominance;

impl DominanceComparator for ParetoDominance {
  fn compare(&self, a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective counts differ");
    pareto(a.iter().copied().zip(b.iter().copied()))
  }
}

/// Pareto dominance over epsilon boxes.
///
/// Every objective value is mapped to the index of its box,
/// `floor(value / epsilon)`, before comparison, so solutions sharing a box
/// are equal on that axis.
#[derive(Clone, PartialEq, Debug)]
pub struct EpsilonDominance {
  epsilons: Vec<f64>,
}

impl EpsilonDominance {
  /// Creates a comparator with one box width per objective. A single width is
  /// used for every objective.
  ///
  /// # Panics
  ///
  /// Panics if `epsilons` is empty or contains a non-positive width.
  pub fn new(epsilons: Vec<f64>) -> Self {
    assert!(!epsilons.is_empty(), "at least one epsilon is required");
    assert!(
      epsilons.iter().all(|e| *e > 0.0),
      "epsilons must be positive, got {epsilons:?}"
    );
    Self { epsilons }
  }

  /// Creates a comparator with the same box width for every objective.
  pub fn uniform(epsilon: f64) -> Self {
    Self::new(vec![epsilon])
  }

  /// Box width of the objective at `index`.
  ///
  /// # Panics
  ///
  /// Panics if more than one width was given and `index` is out of range.
  pub fn epsilon(&self, index: usize) -> f64 {
    match self.epsilons.as_slice() {
      [single] => *single,
      many => many[index],
    }
  }

  /// Box index of `value` on the objective at `index`.
  pub fn boxed(&self, index: usize, value: f64) -> f64 {
    (value / self.epsilon(index)).floor()
  }
}

impl DominanceComparator for EpsilonDominance {
  fn compare(&self, a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective counts differ");
    pareto(
      a.iter()
        .zip(b)
        .enumerate()
        .map(|(i, (x, y))| (self.boxed(i, *x), self.boxed(i, *y))),
    )
  }
}
