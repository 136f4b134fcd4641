//! Decision parameters: bounds, precision and sampling.
//!
//! Parameters are consumed when an optimizer generates its initial population:
//! bounds are validated, and generated values are drawn within them and
//! quantized to the parameter's precision.

use std::collections::HashSet;

use rand::{Rng, RngCore};
use rand_distr::{Distribution as _, Normal};
use typed_builder::TypedBuilder;

use crate::error::{Error, Result};

/// Quantization step used when a parameter has no precision.
pub const DEFAULT_PRECISION: f64 = 1e-12;

/// Distribution initial values are drawn from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Distribution {
  /// Uniform within bounds.
  #[default]
  Uniform,
  /// Normal around the middle of the bounds with a standard deviation of a
  /// sixth of their width, clamped into bounds.
  Normal,
}

/// One decision parameter.
///
/// # Examples
/// ```
/// # use moevo::parameter::Parameter;
/// let x = Parameter::builder()
///   .name("x_1")
///   .bounds((0.0, 5.0))
///   .precision(0.25)
///   .build();
/// assert_eq!(x.quantize(2.4), 2.5);
/// ```
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Parameter {
  #[builder(setter(into))]
  name: String,
  bounds: (f64, f64),
  #[builder(default, setter(strip_option))]
  precision: Option<f64>,
  #[builder(default, setter(strip_option))]
  initial_value: Option<f64>,
}

impl Parameter {
  /// Creates a parameter with given bounds and no precision.
  pub fn new(name: impl Into<String>, low: f64, high: f64) -> Self {
    Self::builder().name(name).bounds((low, high)).build()
  }

  /// Creates a parameter bounded to `[0.5, 1.5]` times its initial value.
  pub fn from_initial_value(name: impl Into<String>, value: f64) -> Self {
    let (a, b) = (0.5 * value, 1.5 * value);
    Self::builder()
      .name(name)
      .bounds((a.min(b), a.max(b)))
      .initial_value(value)
      .build()
  }

  /// Name of the parameter.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Lower bound.
  pub fn low(&self) -> f64 {
    self.bounds.0
  }

  /// Upper bound.
  pub fn high(&self) -> f64 {
    self.bounds.1
  }

  /// Width of the bounds.
  pub fn range(&self) -> f64 {
    self.bounds.1 - self.bounds.0
  }

  /// Quantization step, if any.
  pub fn precision(&self) -> Option<f64> {
    self.precision
  }

  /// Initial value, if any.
  pub fn initial_value(&self) -> Option<f64> {
    self.initial_value
  }

  /// Checks that bounds are finite and `low < high`.
  pub fn validate(&self) -> Result<()> {
    let (low, high) = self.bounds;
    if low.is_finite() && high.is_finite() && low < high {
      Ok(())
    } else {
      Err(Error::InvalidParameterBounds {
        name: self.name.clone(),
        low,
        high,
      })
    }
  }

  /// Rounds `value` to the nearest multiple of the precision.
  pub fn quantize(&self, value: f64) -> f64 {
    let step = self
      .precision
      .filter(|p| *p > 0.0)
      .unwrap_or(DEFAULT_PRECISION);
    (value / step).round() * step
  }

  /// Clamps `value` into the bounds.
  pub fn clamp(&self, value: f64) -> f64 {
    value.clamp(self.bounds.0, self.bounds.1)
  }

  /// Draws a value within bounds from given distribution and quantizes it.
  pub fn sample(
    &self,
    distribution: Distribution,
    rng: &mut dyn RngCore,
  ) -> f64 {
    let (low, high) = self.bounds;
    let value = match distribution {
      Distribution::Uniform => rng.gen_range(low..=high),
      Distribution::Normal => {
        let mean = (low + high) / 2.0;
        Normal::new(mean, (high - low) / 6.0)
          .map(|normal| normal.sample(rng))
          .unwrap_or(mean)
      }
    };
    self.clamp(self.quantize(self.clamp(value)))
  }
}

/// Validates every parameter and checks that names are unique.
pub fn validate_all(parameters: &[Parameter]) -> Result<()> {
  if parameters.is_empty() {
    return Err(Error::InvalidConfiguration(
      "at least one parameter is required".into(),
    ));
  }
  let mut names = HashSet::new();
  for parameter in parameters {
    parameter.validate()?;
    if !names.insert(parameter.name()) {
      return Err(Error::InvalidConfiguration(format!(
        "parameter `{}` is declared twice",
        parameter.name()
      )));
    }
  }
  Ok(())
}
