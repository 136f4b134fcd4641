//! Recombination operators.

use rand::{Rng, RngCore};

/// An operator that creates two offspring decision vectors from two parents.
///
/// # Examples
/// ```
/// # use moevo::recombination::Crossover;
/// # use rand::RngCore;
/// // offspring are the midpoint and a copy of the first parent
/// let c = |a: &[f64], b: &[f64], _: &mut dyn RngCore| {
///   let mid = a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect();
///   (mid, a.to_vec())
/// };
/// # fn takes<C: Crossover>(_: C) {}
/// # takes(c);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Crossover {
  /// Returns two offspring vectors of the parents' length.
  fn crossover(
    &self,
    first: &[f64],
    second: &[f64],
    rng: &mut dyn RngCore,
  ) -> (Vec<f64>, Vec<f64>);
}

impl<F> Crossover for F
where
  F: Fn(&[f64], &[f64], &mut dyn RngCore) -> (Vec<f64>, Vec<f64>),
{
  fn crossover(
    &self,
    first: &[f64],
    second: &[f64],
    rng: &mut dyn RngCore,
  ) -> (Vec<f64>, Vec<f64>) {
    self(first, second, rng)
  }
}

/// Blend (arithmetic) crossover.
///
/// With probability `probability` a factor `alpha` is drawn uniformly from
/// `[0, linear_range]` and the offspring are
/// `alpha * p1 + (1 - alpha) * p2` and `(1 - alpha) * p1 + alpha * p2`.
/// Otherwise the offspring are copies of the parents. Offspring are not
/// clamped to parameter bounds.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BlendCrossover {
  /// Probability of blending a pair of parents.
  pub probability: f64,
  /// Upper limit of the blend factor.
  pub linear_range: f64,
}

impl Default for BlendCrossover {
  fn default() -> Self {
    Self {
      probability: 0.6,
      linear_range: 2.0,
    }
  }
}

impl BlendCrossover {
  /// Blends two parents with a fixed factor.
  pub fn blend(
    first: &[f64],
    second: &[f64],
    alpha: f64,
  ) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(first.len(), second.len(), "parents differ in length");
    first
      .iter()
      .zip(second)
      .map(|(a, b)| {
        (alpha * a + (1.0 - alpha) * b, (1.0 - alpha) * a + alpha * b)
      })
      .unzip()
  }
}

impl Crossover for BlendCrossover {
  fn crossover(
    &self,
    first: &[f64],
    second: &[f64],
    rng: &mut dyn RngCore,
  ) -> (Vec<f64>, Vec<f64>) {
    if rng.gen_bool(self.probability.clamp(0.0, 1.0)) {
      let alpha = rng.gen_range(0.0..=self.linear_range);
      Self::blend(first, second, alpha)
    } else {
      (first.to_vec(), second.to_vec())
    }
  }
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;

  #[test]
  fn test_zero_alpha_swaps_parents() {
    let (c1, c2) = BlendCrossover::blend(&[1.0, 2.0], &[3.0, 4.0], 0.0);
    assert_eq!(c1, vec![3.0, 4.0]);
    assert_eq!(c2, vec![1.0, 2.0]);
  }

  #[test]
  fn test_unit_alpha_copies_parents() {
    let (c1, c2) = BlendCrossover::blend(&[1.0, 2.0], &[3.0, 4.0], 1.0);
    assert_eq!(c1, vec![1.0, 2.0]);
    assert_eq!(c2, vec![3.0, 4.0]);
  }

  #[test]
  fn test_blend_preserves_sum() {
    let mut rng = StdRng::seed_from_u64(9);
    let crossover = BlendCrossover {
      probability: 1.0,
      ..Default::default()
    };
    for _ in 0..100 {
      let (c1, c2) = crossover.crossover(&[1.0, -2.0], &[4.0, 6.0], &mut rng);
      assert!((c1[0] + c2[0] - 5.0).abs() < 1e-12);
      assert!((c1[1] + c2[1] - 4.0).abs() < 1e-12);
    }
  }

  #[test]
  fn test_no_crossover_copies_parents() {
    let mut rng = StdRng::seed_from_u64(9);
    let crossover = BlendCrossover {
      probability: 0.0,
      ..Default::default()
    };
    let (c1, c2) = crossover.crossover(&[1.0], &[2.0], &mut rng);
    assert_eq!((c1, c2), (vec![1.0], vec![2.0]));
  }
}
