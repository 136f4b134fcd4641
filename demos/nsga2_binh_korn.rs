use std::{io::Write, path::Path};

use moevo::{
  evaluation::Evaluation,
  operator::IntoPar,
  optimizer::{nsga::Nsga2, Optimizer},
  parameter::Parameter,
  recombination::BlendCrossover,
};
use rand::seq::IteratorRandom;

fn main() {
  // try `RUST_LOG=debug` to follow the generations
  env_logger::init();

  // decision variables x in [0, 5] and y in [0, 3]
  let parameters = vec![
    Parameter::new("x", 0.0, 5.0),
    Parameter::new("y", 0.0, 3.0),
  ];

  // objectives f1(x, y) = 4x^2 + 4y^2 and f2(x, y) = (x - 5)^2 + (y - 5)^2
  // with two constraints reported as violations
  let binh_korn = |v: &[f64]| {
    let (x, y) = (v[0], v[1]);
    let f1 = 4.0 * x.powi(2) + 4.0 * y.powi(2);
    let f2 = (x - 5.0).powi(2) + (y - 5.0).powi(2);
    let g1 = (x - 5.0).powi(2) + y.powi(2) - 25.0;
    let g2 = 7.7 - (x - 8.0).powi(2) - (y + 3.0).powi(2);
    Evaluation::new(vec![f1, f2])
      .with_constraints(vec![g1.max(0.0), g2.max(0.0)])
  };

  let optimized = Nsga2::builder()
    .parameters(parameters)
    // evaluated in parallel, one task per individual
    .evaluator(binh_korn.par_each())
    .population_size(100)
    .generations(100)
    // blend every pair of parents
    .crossover(Box::new(BlendCrossover {
      probability: 1.0,
      linear_range: 1.5,
    }))
    // keep offspring within the parameter bounds
    .clamp_offspring(true)
    .build()
    .optimize()
    .unwrap();

  // write objective values to demos/binh_korn.csv
  let _ =
    std::fs::File::create(Path::new(file!()).with_file_name("binh_korn.csv"))
      .unwrap()
      .write_all(
        optimized
          .solutions
          .iter()
          .map(|s| format!("{} {}", s.costs()[0], s.costs()[1]))
          .collect::<Vec<_>>()
          .join("\n")
          .as_bytes(),
      );

  println!(
    "{} evaluations, {} populations",
    optimized.evaluations,
    optimized.history.len()
  );
  // and print 10 random solutions
  println!("   x   |   y   | front | feasible");
  for s in optimized
    .solutions
    .iter()
    .choose_multiple(&mut rand::thread_rng(), 10)
  {
    println!(
      "{:.4} | {:.4} | {:5} | {}",
      s.vector()[0],
      s.vector()[1],
      s.front_number(),
      s.is_feasible()
    );
  }
  println!("  ...  |  ...  |  ...  | ...");
}
