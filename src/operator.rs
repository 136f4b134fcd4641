//! Parallelization wrappers for operators.

/// A wrapper around an operator that marks it to
/// be executed in parallel for **each** individual by executor.
#[derive(Clone, Copy, Debug)]
pub struct ParEach<O> {
  operator: O,
}

impl<O> ParEach<O> {
  /// Returns the wrapped operator.
  pub fn operator(&self) -> &O {
    &self.operator
  }
}

/// A wrapper around an operator that marks it to
/// be executed in parallel for each **batch** of individuals by executor.
#[derive(Clone, Copy, Debug)]
pub struct ParBatch<O> {
  operator: O,
}

impl<O> ParBatch<O> {
  /// Returns the wrapped operator.
  pub fn operator(&self) -> &O {
    &self.operator
  }
}

/// Converts an operator into a parallelized one.
pub trait IntoPar: Sized {
  /// Creates a wrapper around given operator that marks it to
  /// be executed in parallel for **each** individual.
  ///
  /// **Parallelization is implemented with [rayon]. As a result, for simple
  /// functions, parallelization may only decrease performance because of
  /// additional overhead introduced. Benchmark if in doubt.**
  fn par_each(self) -> ParEach<Self> {
    ParEach { operator: self }
  }

  /// Creates a wrapper around given operator that marks it to
  /// be executed in parallel for each **batch** of individuals.
  /// The crate calculates the size of the batch in such a way as to evenly
  /// distribute the calculations across all available threads.
  ///
  /// **Parallelization is implemented with [rayon]. As a result, for simple
  /// functions, parallelization may only decrease performance because of
  /// additional overhead introduced. Benchmark if in doubt.**
  fn par_batch(self) -> ParBatch<Self> {
    ParBatch { operator: self }
  }
}
