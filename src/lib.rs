//! **moevo** is a multi-objective evolutionary optimization core. It ranks
//! candidate solutions by Pareto dominance, keeps the search diverse with
//! crowding distance and bounded archives, and drives populations forward
//! with either genetic or swarm operators.
//!
//! Here's a [quick start example](#example) for the impatient.
//!
//! A few abstractions make up the framework:
//! - **Individual** - a decision vector of `f64` values together with its
//!   objective values, constraint violations and ranking bookkeeping
//! - **Evaluator** - a user supplied function turning a decision vector into
//!   objective values. Every objective is minimized
//! - **Operator** - an exchangeable step of the search loop: **selection**,
//!   **crossover**, **mutation** or a **swarm update**
//! - **Optimizer** - a driver running the loop until it exhausts its
//!   generations:
//!   1. **Evaluate** every new individual
//!   2. **Rank** individuals by non-dominated sorting and crowding distance,
//!      or keep the non-dominated ones in an **archive**
//!   3. **Vary** the survivors, creating the next population
//!   4. **Record** the population in the run's history
//!
//! # Optimizers
//!
//! **Optimizer** is represented with the [`Optimizer`] trait. This crate
//! features two implementations of it:
//! - [NSGA-II] - an elitist genetic algorithm with tournament selection,
//!   blend crossover and uniform mutation by default
//! - [OMOPSO] - a particle swarm with a constricted velocity update,
//!   polynomial turbulence, a crowding-bounded leaders archive and an
//!   epsilon-dominance archive
//!
//! Both are built with a builder from the `typed-builder` crate, which checks
//! at compile time that every required field is set. Every run returns an
//! [`Optimized`]: the solutions found, the secondary archive, the history of
//! populations and the number of evaluations.
//!
//! # Operators
//!
//! Every operator is a trait implemented for a matching closure, so a custom
//! operator can be a closure or your own type. Each operator receives the
//! run's random number generator, which keeps seeded runs reproducible.
//!
//! | Operator                   | Trait                  | Default                  |
//! |:---------------------------|:-----------------------|:-------------------------|
//! | **Evaluation**             | [`Evaluator`]          | *(required)*             |
//! | **Selection**              | [`Selector`]           | [`TournamentSelector`]   |
//! | **Crossover**              | [`Crossover`]          | [`BlendCrossover`]       |
//! | **Mutation**, turbulence   | [`Mutation`]           | [`UniformMutation`], [`PolynomialMutation`] |
//! | **Swarm update**           | [`SwarmUpdater`]       | [`ConstrictedUpdate`]    |
//! | **Dominance**              | [`DominanceComparator`] | [`ParetoDominance`]     |
//!
//! # Parallelization
//!
//! An [`Evaluator`] can be parallelized by calling [`par_each()`] or
//! [`par_batch()`] on it. This cheap conversion only wraps the evaluator into
//! a struct, tagging it, so an internal executor evaluates individuals in
//! parallel one by one or in batches of equal size. A parallelized evaluator
//! must be `Sync`.
//! ```
//! # use moevo::{
//! #   operator::IntoPar,
//! #   optimizer::{nsga::Nsga2, Optimizer},
//! #   parameter::Parameter,
//! # };
//! let evaluator = |x: &[f64]| [x[0] + 1.0, x[0] * 2.0];
//! let optimized = Nsga2::builder()
//!   .parameters(vec![Parameter::new("x", 0.0, 1.0)])
//!   // evaluated concurrently for each batch of individuals
//!   .evaluator(evaluator.par_batch())
//!   .population_size(10)
//!   .generations(5)
//!   .build()
//!   .optimize();
//! # assert!(optimized.is_ok());
//! ```
//!
//! Parallelization is implemented with [rayon]. For cheap evaluators the
//! overhead usually only decreases performance. Benchmark if in doubt.
//!
//! # Example
//!
//! Here's a solution for the textbook *Schaffer's Problem No.1* with the
//! [NSGA-II] optimizer.
//! ```
//! use moevo::{
//!   optimizer::{nsga::Nsga2, Optimizer},
//!   parameter::Parameter,
//! };
//! // objective functions `f1(x) = x^2` and `f2(x) = (x - 2)^2`
//! let evaluator = |x: &[f64]| [x[0].powi(2), (x[0] - 2.0).powi(2)];
//! let nsga2 = Nsga2::builder()
//!   .parameters(vec![Parameter::new("x", -10.0, 10.0)])
//!   .evaluator(evaluator)
//!   .population_size(50)
//!   .generations(50)
//!   .seed(42)
//!   .build();
//! let optimized = nsga2.optimize().unwrap();
//! // Pareto optimal solutions lie between 0 and 2
//! assert!(optimized
//!   .solutions
//!   .iter()
//!   .filter(|s| s.front_number() == 1)
//!   .all(|s| (-0.5..=2.5).contains(&s.vector()[0])));
//! ```
//!
//! You can find more examples in the *demos* folder in the root of the
//! project.
//!
//! # Common pitfalls
//!
//! - A closure evaluator needs its argument annotated, `|x: &[f64]| ...`,
//!   otherwise the compiler can't tell which `Evaluator` it is.
//! - Blend crossover and uniform mutation don't respect parameter bounds.
//!   Set `clamp_offspring(true)` on [NSGA-II] if your evaluator can't handle
//!   vectors outside of them.
//! - An evaluation error aborts the whole run. Retries and timeouts are the
//!   evaluator's business.
//!
//! [`Optimizer`]: crate::optimizer::Optimizer
//! [`Optimized`]: crate::optimizer::Optimized
//! [NSGA-II]: crate::optimizer::nsga::Nsga2
//! [OMOPSO]: crate::optimizer::omopso::Omopso
//! [`Evaluator`]: crate::evaluation::Evaluator
//! [`Selector`]: crate::selection::Selector
//! [`TournamentSelector`]: crate::selection::TournamentSelector
//! [`Crossover`]: crate::recombination::Crossover
//! [`BlendCrossover`]: crate::recombination::BlendCrossover
//! [`Mutation`]: crate::mutation::Mutation
//! [`UniformMutation`]: crate::mutation::UniformMutation
//! [`PolynomialMutation`]: crate::mutation::PolynomialMutation
//! [`SwarmUpdater`]: crate::swarm::SwarmUpdater
//! [`ConstrictedUpdate`]: crate::swarm::ConstrictedUpdate
//! [`DominanceComparator`]: crate::dominance::DominanceComparator
//! [`ParetoDominance`]: crate::dominance::ParetoDominance
//! [`par_each()`]: crate::operator::IntoPar::par_each
//! [`par_batch()`]: crate::operator::IntoPar::par_batch

#![warn(missing_docs)]

pub mod archive;
pub mod crowding;
pub mod dominance;
pub mod error;
pub mod evaluation;
mod execution;
pub mod individual;
pub mod mutation;
pub mod operator;
pub mod optimizer;
pub mod parameter;
pub mod population;
pub mod recombination;
pub mod selection;
pub mod sink;
pub mod sorting;
pub mod swarm;
