//! Mutation operators.
//!
//! The same trait serves genetic mutation and swarm turbulence: OMOPSO
//! applies a [`Mutation`] to every particle after its position update.

use rand::{Rng, RngCore};

use crate::parameter::Parameter;

/// An operator that mutates a decision vector in place.
///
/// `parameters` holds one entry per gene, in gene order.
///
/// # Examples
/// ```
/// # use moevo::{mutation::Mutation, parameter::Parameter};
/// # use rand::RngCore;
/// // moves every gene to the middle of its bounds
/// let m = |v: &mut [f64], ps: &[Parameter], _: &mut dyn RngCore| {
///   for (x, p) in v.iter_mut().zip(ps) {
///     *x = (p.low() + p.high()) / 2.0;
///   }
/// };
/// # fn takes<M: Mutation>(_: M) {}
/// # takes(m);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Mutation {
  /// Mutates given vector.
  fn mutate(
    &self,
    vector: &mut [f64],
    parameters: &[Parameter],
    rng: &mut dyn RngCore,
  );
}

impl<F> Mutation for F
where
  F: Fn(&mut [f64], &[Parameter], &mut dyn RngCore),
{
  fn mutate(
    &self,
    vector: &mut [f64],
    parameters: &[Parameter],
    rng: &mut dyn RngCore,
  ) {
    self(vector, parameters, rng)
  }
}

/// Leaves vectors unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct NoMutation;

impl Mutation for NoMutation {
  fn mutate(&self, _: &mut [f64], _: &[Parameter], _: &mut dyn RngCore) {}
}

/// Adds uniform noise to genes.
///
/// Each gene is perturbed with probability `probability` by a value drawn
/// uniformly from `[-s, s]`, where `s` is `mutation_space` times the width of
/// the gene's bounds. Mutated genes are not clamped to the bounds.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct UniformMutation {
  /// Per-gene mutation probability.
  pub probability: f64,
  /// Perturbation limit relative to the width of the bounds.
  pub mutation_space: f64,
}

impl Default for UniformMutation {
  fn default() -> Self {
    Self {
      probability: 0.05,
      mutation_space: 0.1,
    }
  }
}

impl Mutation for UniformMutation {
  fn mutate(
    &self,
    vector: &mut [f64],
    parameters: &[Parameter],
    rng: &mut dyn RngCore,
  ) {
    let probability = self.probability.clamp(0.0, 1.0);
    for (gene, parameter) in vector.iter_mut().zip(parameters) {
      if rng.gen_bool(probability) {
        let space = self.mutation_space * parameter.range();
        if space > 0.0 {
          *gene += rng.gen_range(-space..=space);
        }
      }
    }
  }
}

/// Bounded polynomial mutation.
///
/// Each gene is mutated with probability `probability` by a perturbation
/// drawn from the polynomial distribution with given distribution index;
/// larger indices produce smaller perturbations. Mutated genes always stay
/// within their bounds.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PolynomialMutation {
  /// Per-gene mutation probability.
  pub probability: f64,
  /// Distribution index of the polynomial distribution.
  pub distribution_index: f64,
}

impl Default for PolynomialMutation {
  fn default() -> Self {
    Self {
      probability: 0.2,
      distribution_index: 20.0,
    }
  }
}

impl PolynomialMutation {
  fn mutate_gene(&self, gene: f64, low: f64, high: f64, u: f64) -> f64 {
    let range = high - low;
    if range <= 0.0 {
      return gene;
    }
    let gene = gene.clamp(low, high);
    let delta1 = (gene - low) / range;
    let delta2 = (high - gene) / range;
    let exponent = self.distribution_index + 1.0;

    let delta_q = if u <= 0.5 {
      let val = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - delta1).powf(exponent);
      val.powf(1.0 / exponent) - 1.0
    } else {
      let val =
        2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - delta2).powf(exponent);
      1.0 - val.powf(1.0 / exponent)
    };

    (gene + delta_q * range).clamp(low, high)
  }
}

impl Mutation for PolynomialMutation {
  fn mutate(
    &self,
    vector: &mut [f64],
    parameters: &[Parameter],
    rng: &mut dyn RngCore,
  ) {
    let probability = self.probability.clamp(0.0, 1.0);
    for (gene, parameter) in vector.iter_mut().zip(parameters) {
      if rng.gen_bool(probability) {
        let u = rng.gen::<f64>();
        *gene = self.mutate_gene(*gene, parameter.low(), parameter.high(), u);
      }
    }
  }
}
