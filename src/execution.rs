pub mod strategy {
  //! Execution strategy markers. Executors are implemented per strategy, so
  //! the strategy of an operator is inferred from its type.

  /// Sequential execution strategy marker, i.e. no parallelization involved.
  pub enum SequentialExecutionStrategy {}

  /// Parallel execution strategy marker, parallelizes evaluation of **each**
  /// individual.
  pub enum ParallelEachExecutionStrategy {}

  /// Parallel execution strategy marker, parallelizes evaluation of a
  /// **batch** of individuals. The crate tries to split the work equally for
  /// each available thread.
  pub enum ParallelBatchExecutionStrategy {}
}
