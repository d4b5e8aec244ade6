//! Elitist evolutionary refinement.
//!
//! A population of candidate tours evolves around a single elite: each
//! generation keeps the fittest tour unchanged and refills the rest of the
//! population with copies of it, each mutated by one random swap with
//! probability `mutation_rate`.
//!
//! This is a hill climber around one elite, not a crossover-based genetic
//! algorithm. It strongly favors exploitation over exploration and can
//! stagnate on the first good tour it finds; the optimizer always follows
//! it with 2-opt.
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: population size, generations, mutation rate
//! - [`EvolutionaryRefiner`]: executes the generation loop
//! - [`EvolutionResult`]: best tour and per-generation statistics

mod config;
mod refiner;

pub use config::EvolutionConfig;
pub use refiner::{fitness, refine_tour, EvolutionResult, EvolutionaryRefiner};
