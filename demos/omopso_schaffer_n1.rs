use std::sync::{Arc, Mutex};

use moevo::{
  optimizer::{omopso::Omopso, Optimizer},
  parameter::Parameter,
  sink::MemorySink,
  swarm::ConstrictedUpdate,
};

fn main() {
  env_logger::init();

  // keeps every evaluated particle and every swarm in memory
  let sink = Arc::new(Mutex::new(MemorySink::default()));
  // heavier inertia than the default
  let updater = ConstrictedUpdate::builder().inertia((0.3, 0.7)).build();

  let optimized = Omopso::builder()
    .parameters(vec![Parameter::new("x", -1000.0, 1000.0)])
    // f1(x) = x^2 and f2(x) = (x - 2)^2
    .evaluator(|x: &[f64]| [x[0].powi(2), (x[0] - 2.0).powi(2)])
    .swarm_size(50)
    .iterations(100)
    .updater(Box::new(updater))
    .epsilons(vec![0.05])
    .sink(Box::new(Arc::clone(&sink)))
    .seed(2024)
    .build()
    .optimize()
    .unwrap();

  let sink = sink.lock().unwrap();
  println!(
    "{} evaluations, {} swarms recorded",
    sink.individuals.len(),
    sink.populations.len()
  );
  println!(
    "{} leaders, {} epsilon-archived solutions",
    optimized.solutions.len(),
    optimized.archive.len()
  );

  let mut archive = optimized.archive;
  archive.sort_by(|a, b| a.vector()[0].total_cmp(&b.vector()[0]));
  println!("    x    |    f1   |    f2   ");
  for s in archive.iter().step_by((archive.len() / 10).max(1)) {
    println!(
      "{:8.4} | {:7.4} | {:7.4}",
      s.vector()[0],
      s.costs()[0],
      s.costs()[1]
    );
  }
}
