//! Particle swarm operators.
//!
//! A particle is an [`Individual`] carrying [`SwarmFeatures`]: a velocity and
//! its personal best. Every iteration a particle is moved towards its personal
//! best and a leader taken from an archive of non-dominated particles.
//!
//! [`SwarmFeatures`]: crate::individual::SwarmFeatures

use rand::{Rng, RngCore};
use typed_builder::TypedBuilder;

use crate::{
  archive::Archive,
  dominance::{Dominance, DominanceComparator},
  error::Result,
  individual::Individual,
  parameter::Parameter,
};

/// Constriction coefficient for acceleration coefficients `c1` and `c2`.
///
/// Equals `1` when `c1 + c2 <= 4` and `2 / (2 - ρ - sqrt(ρ² - 4ρ))` with
/// `ρ = c1 + c2` otherwise.
pub fn constriction(c1: f64, c2: f64) -> f64 {
  let rho = c1 + c2;
  if rho <= 4.0 {
    1.0
  } else {
    2.0 / (2.0 - rho - (rho * rho - 4.0 * rho).sqrt())
  }
}

/// Clamps a velocity component to half the width of the parameter's bounds.
///
/// # Examples
/// ```
/// # use moevo::{parameter::Parameter, swarm::clamp_velocity};
/// let x = Parameter::new("x", 0.0, 10.0);
/// assert_eq!(clamp_velocity(20.0, &x), 5.0);
/// assert_eq!(clamp_velocity(-2.0, &x), -2.0);
/// ```
pub fn clamp_velocity(velocity: f64, parameter: &Parameter) -> f64 {
  let limit = parameter.range() / 2.0;
  velocity.clamp(-limit, limit)
}

// rounds to one decimal place
fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

/// Acceleration coefficients drawn for one particle.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Coefficients {
  /// Cognitive acceleration.
  pub c1: f64,
  /// Social acceleration.
  pub c2: f64,
  /// Cognitive random factor.
  pub r1: f64,
  /// Social random factor.
  pub r2: f64,
}

/// Moves particles.
pub trait SwarmUpdater {
  /// Computes a new velocity of `particle` from its current velocity, its
  /// personal best and the decision vector of its `leader`.
  fn update_velocity(
    &self,
    particle: &mut Individual,
    leader: &[f64],
    parameters: &[Parameter],
    rng: &mut dyn RngCore,
  );

  /// Moves `particle` by its velocity.
  fn update_position(
    &self,
    particle: &mut Individual,
    parameters: &[Parameter],
  ) {
    move_particle(particle, parameters);
  }
}

/// Adds the velocity to the position. A component that leaves its bounds is
/// clamped to the bound and its velocity changes sign.
///
/// # Panics
///
/// Panics if `particle` is evaluated or is not a swarm particle.
pub fn move_particle(particle: &mut Individual, parameters: &[Parameter]) {
  assert!(
    !particle.is_evaluated(),
    "particle {} is evaluated and cannot move",
    particle.id()
  );
  let id = particle.id();
  let Some(features) = particle.swarm.as_mut() else {
    panic!("individual {id} is not a swarm particle");
  };
  let position = particle.vector.iter_mut();
  let velocity = features.velocity.iter_mut();
  for ((x, v), parameter) in position.zip(velocity).zip(parameters) {
    *x += *v;
    if *x > parameter.high() {
      *x = parameter.high();
      *v = -*v;
    } else if *x < parameter.low() {
      *x = parameter.low();
      *v = -*v;
    }
  }
}

/// Velocity update with a constriction coefficient and a random inertia.
///
/// For every particle, `c1` and `c2` are drawn from `cognitive` and `social`
/// and `r1` and `r2` from `cognitive_random` and `social_random`, all rounded
/// to one decimal place. Every velocity component is then
/// `χ(c1, c2) * (w * v + c1 * r1 * (pbest - x) + c2 * r2 * (leader - x))`
/// with a fresh inertia weight `w` drawn from `inertia`, clamped by
/// [`clamp_velocity`].
#[derive(Clone, Debug, TypedBuilder)]
pub struct ConstrictedUpdate {
  /// Range of the inertia weight.
  #[builder(default = (0.1, 0.5))]
  pub inertia: (f64, f64),
  /// Range of the cognitive acceleration `c1`.
  #[builder(default = (1.5, 2.0))]
  pub cognitive: (f64, f64),
  /// Range of the social acceleration `c2`.
  #[builder(default = (1.5, 2.0))]
  pub social: (f64, f64),
  /// Range of the cognitive random factor `r1`.
  #[builder(default = (0.0, 1.0))]
  pub cognitive_random: (f64, f64),
  /// Range of the social random factor `r2`.
  #[builder(default = (0.0, 1.0))]
  pub social_random: (f64, f64),
}

impl Default for ConstrictedUpdate {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl ConstrictedUpdate {
  /// Draws the coefficients of one particle.
  pub fn coefficients(&self, rng: &mut dyn RngCore) -> Coefficients {
    let mut draw = |(low, high): (f64, f64)| round1(rng.gen_range(low..=high));
    let r1 = draw(self.cognitive_random);
    let r2 = draw(self.social_random);
    let c1 = draw(self.cognitive);
    let c2 = draw(self.social);
    Coefficients { c1, c2, r1, r2 }
  }
}

impl SwarmUpdater for ConstrictedUpdate {
  fn update_velocity(
    &self,
    particle: &mut Individual,
    leader: &[f64],
    parameters: &[Parameter],
    rng: &mut dyn RngCore,
  ) {
    assert_eq!(
      particle.vector.len(),
      leader.len(),
      "leader and particle differ in length"
    );
    let id = particle.id();
    let Some(features) = particle.swarm.as_mut() else {
      panic!("individual {id} is not a swarm particle");
    };
    let Coefficients { c1, c2, r1, r2 } = self.coefficients(rng);
    let chi = constriction(c1, c2);
    let (w_low, w_high) = self.inertia;

    for (i, parameter) in parameters.iter().enumerate() {
      let x = particle.vector[i];
      let w = rng.gen_range(w_low..=w_high);
      let momentum = w * features.velocity[i];
      let cognitive = c1 * r1 * (features.best_vector[i] - x);
      let social = c2 * r2 * (leader[i] - x);
      features.velocity[i] =
        clamp_velocity(chi * (momentum + cognitive + social), parameter);
    }
  }
}

/// Replaces the personal best of `particle` with its current state unless
/// the stored best dominates it. Returns `true` if the best was replaced.
///
/// Non-dominated outcomes replace the stored best.
///
/// # Panics
///
/// Panics if `particle` is not an evaluated swarm particle.
pub fn update_personal_best<D>(
  particle: &mut Individual,
  comparator: &D,
) -> bool
where
  D: DominanceComparator + ?Sized,
{
  assert!(
    particle.is_evaluated(),
    "particle {} must be evaluated",
    particle.id()
  );
  let id = particle.id();
  let Some(features) = particle.swarm.as_mut() else {
    panic!("individual {id} is not a swarm particle");
  };
  match comparator.compare(&particle.costs, &features.best_costs) {
    Dominance::BDominates => false,
    Dominance::ADominates | Dominance::NonDominated => {
      features.best_costs.clone_from(&particle.costs);
      features.best_vector.clone_from(&particle.vector);
      true
    }
  }
}

/// Picks a leader from the archive.
///
/// A single member is returned as is. Otherwise two distinct members are
/// sampled, and the one dominating the other under the archive's comparator
/// is returned, or a random one of the two if neither dominates.
pub fn select_global_best<'a, D>(
  leaders: &'a Archive<D>,
  rng: &mut dyn RngCore,
) -> Result<&'a Individual>
where
  D: DominanceComparator,
{
  if leaders.len() == 1 {
    return leaders.rand_choice(rng);
  }
  let candidates = leaders.rand_sample(2, rng)?;
  let (first, second) = (candidates[0], candidates[1]);
  let pick = if rng.gen_bool(0.5) { first } else { second };
  Ok(
    match leaders.comparator().compare(first.costs(), second.costs()) {
      Dominance::ADominates => first,
      Dominance::BDominates => second,
      Dominance::NonDominated => pick,
    },
  )
}
