//! Generation loop for elitist refinement.
//!
//! initialization → evaluation → elite selection → cloning + swap mutation → repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use super::config::EvolutionConfig;
use crate::constructive::nearest_neighbor;
use crate::cost::{apply_order, order_cost};
use crate::distance::{DistanceFn, DistanceMatrix};
use crate::error::{OptimizeError, Result};
use crate::models::Stop;

/// Fitness of a tour with total cost `cost`: `1 / (1 + cost)`.
///
/// Higher is better; a zero-cost tour has fitness 1.
pub fn fitness(cost: f64) -> f64 {
    1.0 / (1.0 + cost)
}

/// Result of an evolutionary refinement run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The fittest permutation of the final generation.
    pub best: Vec<usize>,

    /// Cost of `best`.
    pub best_cost: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Elite cost after initialization and after each generation.
    pub cost_history: Vec<f64>,
}

/// Executes elitist refinement over permutations with a fixed first stop.
///
/// Every candidate keeps `seed[0]` at position 0: random candidates shuffle
/// only the tail, and mutation swaps positions `>= 1`.
pub struct EvolutionaryRefiner;

impl EvolutionaryRefiner {
    /// Runs the refinement.
    ///
    /// `seed` is a starting tour (typically nearest neighbor) placed in the
    /// initial population next to random permutations of the same stops.
    /// All randomness comes from `rng`.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`EvolutionConfig::validate`] first to get a descriptive error).
    pub fn run<R: Rng>(
        matrix: &DistanceMatrix,
        seed: &[usize],
        config: &EvolutionConfig,
        rng: &mut R,
    ) -> EvolutionResult {
        Self::run_with_cancel(matrix, seed, config, rng, None)
    }

    /// Runs the refinement with an optional cancellation token.
    ///
    /// The flag is checked between generations only. When set, the run
    /// stops and returns the elite of the last completed generation.
    pub fn run_with_cancel<R: Rng>(
        matrix: &DistanceMatrix,
        seed: &[usize],
        config: &EvolutionConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> EvolutionResult {
        if let Err(e) = config.validate() {
            panic!("invalid EvolutionConfig: {e}");
        }

        let n = seed.len();
        if n < 3 {
            // Fewer than two free positions: every candidate equals the seed.
            let best_cost = order_cost(seed, matrix);
            return EvolutionResult {
                best: seed.to_vec(),
                best_cost,
                generations: 0,
                cancelled: false,
                cost_history: vec![best_cost],
            };
        }

        let (population_size, generations) = config.resolve(n);

        // 1. Initialize: the seed tour plus random tail permutations
        let mut population: Vec<Vec<usize>> = Vec::with_capacity(population_size);
        population.push(seed.to_vec());
        while population.len() < population_size {
            let mut candidate = seed.to_vec();
            candidate[1..].shuffle(rng);
            population.push(candidate);
        }

        // 2. Evaluate
        let mut costs = evaluate_population(matrix, &population, config.parallel);
        let mut elite = fittest(&costs);

        let mut cost_history = Vec::with_capacity(generations + 1);
        cost_history.push(costs[elite]);

        let mut executed = 0;
        let mut cancelled = false;

        // 3. Generation loop
        for gen in 0..generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let parent = population.swap_remove(elite);
            let parent_cost = costs[elite];

            let mut next_gen: Vec<Vec<usize>> = Vec::with_capacity(population_size);
            next_gen.push(parent.clone());
            while next_gen.len() < population_size {
                let mut child = parent.clone();
                if rng.random_range(0.0..1.0) < config.mutation_rate {
                    swap_tail(&mut child, rng);
                }
                next_gen.push(child);
            }

            // The elite sits at index 0 and keeps its known cost.
            let mut next_costs = Vec::with_capacity(population_size);
            next_costs.push(parent_cost);
            next_costs.extend(evaluate_population(matrix, &next_gen[1..], config.parallel));

            population = next_gen;
            costs = next_costs;
            elite = fittest(&costs);
            cost_history.push(costs[elite]);
            executed = gen + 1;

            trace!("generation {executed}: elite cost {:.6}", costs[elite]);
        }

        EvolutionResult {
            best_cost: costs[elite],
            best: population.swap_remove(elite),
            generations: executed,
            cancelled,
            cost_history,
        }
    }
}

/// Evolutionary refinement over stops, evaluated with `distance`.
///
/// Seeds the population with the nearest-neighbor tour and returns the
/// fittest tour as found, without a 2-opt pass. `stops[0]` stays first.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_tour::evolution::{refine_tour, EvolutionConfig};
/// use u_tour::geo::RoadDistance;
/// use u_tour::models::Stop;
///
/// let stops = Stop::from_coords(&[(-34.60, -58.38), (-34.63, -58.36), (-34.59, -58.40), (-34.61, -58.43)]);
/// let mut rng = StdRng::seed_from_u64(42);
/// let tour = refine_tour(&stops, &RoadDistance::default(), &EvolutionConfig::default(), &mut rng).unwrap();
///
/// assert_eq!(tour[0], stops[0]);
/// assert_eq!(tour.len(), 4);
/// ```
pub fn refine_tour<D: DistanceFn + ?Sized, R: Rng>(
    stops: &[Stop],
    distance: &D,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Result<Vec<Stop>> {
    config.validate().map_err(OptimizeError::InvalidInput)?;
    if stops.len() <= 1 {
        return Ok(stops.to_vec());
    }
    let matrix = DistanceMatrix::build(stops, distance)?;
    let seed = nearest_neighbor(&matrix);
    let result = EvolutionaryRefiner::run(&matrix, &seed, config, rng);
    Ok(apply_order(stops, &result.best))
}

/// Swaps two random positions of the tail `perm[1..]`.
///
/// Both positions may coincide, reproducing the parent.
fn swap_tail<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    let i = rng.random_range(1..n);
    let j = rng.random_range(1..n);
    perm.swap(i, j);
}

/// Scores every candidate.
fn evaluate_population(matrix: &DistanceMatrix, population: &[Vec<usize>], parallel: bool) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return population
                .par_iter()
                .map(|candidate| order_cost(candidate, matrix))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    population
        .iter()
        .map(|candidate| order_cost(candidate, matrix))
        .collect()
}

/// Index of the fittest candidate; ties go to the lowest index.
fn fittest(costs: &[f64]) -> usize {
    let mut best = 0;
    let mut best_fitness = fitness(costs[0]);
    for (i, &cost) in costs.iter().enumerate().skip(1) {
        let f = fitness(cost);
        if f > best_fitness {
            best = i;
            best_fitness = f;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ring_matrix(n: usize) -> DistanceMatrix {
        // Stops on a circle; the optimal open path walks around it.
        let points: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                (a.cos() * 10.0, a.sin() * 10.0)
            })
            .collect();
        DistanceMatrix::from_rows(
            points
                .iter()
                .map(|a| {
                    points
                        .iter()
                        .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                        .collect()
                })
                .collect(),
        )
    }

    fn scrambled(n: usize) -> Vec<usize> {
        let mut order = vec![0];
        order.extend((1..n).step_by(2));
        order.extend((2..n).step_by(2));
        order
    }

    #[test]
    fn test_fitness() {
        assert_eq!(fitness(0.0), 1.0);
        assert_eq!(fitness(1.0), 0.5);
        assert!(fitness(10.0) < fitness(9.0));
    }

    #[test]
    fn test_fittest_ties_go_to_first() {
        assert_eq!(fittest(&[3.0, 1.0, 1.0, 2.0]), 1);
        assert_eq!(fittest(&[1.0, 1.0]), 0);
    }

    #[test]
    fn test_never_worse_than_seed() {
        let m = ring_matrix(12);
        let seed = scrambled(12);
        let config = EvolutionConfig::default().with_mutation_rate(0.5);
        let mut rng = StdRng::seed_from_u64(42);

        let result = EvolutionaryRefiner::run(&m, &seed, &config, &mut rng);

        assert!(result.best_cost <= order_cost(&seed, &m) + 1e-12);
        assert!((result.best_cost - order_cost(&result.best, &m)).abs() < 1e-9);
        assert_eq!(result.generations, 120);
        assert_eq!(result.cost_history.len(), 121);
    }

    #[test]
    fn test_elite_cost_non_increasing() {
        let m = ring_matrix(10);
        let config = EvolutionConfig::default()
            .with_population_size(20)
            .with_generations(60)
            .with_mutation_rate(0.8);
        let mut rng = StdRng::seed_from_u64(7);

        let result = EvolutionaryRefiner::run(&m, &scrambled(10), &config, &mut rng);

        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "elite cost should never increase: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_improves_scrambled_tour() {
        let m = ring_matrix(10);
        let seed = scrambled(10);
        let config = EvolutionConfig::default()
            .with_population_size(40)
            .with_generations(200)
            .with_mutation_rate(1.0);
        let mut rng = StdRng::seed_from_u64(3);

        let result = EvolutionaryRefiner::run(&m, &seed, &config, &mut rng);

        assert!(
            result.best_cost < order_cost(&seed, &m),
            "expected improvement over {}, got {}",
            order_cost(&seed, &m),
            result.best_cost
        );
    }

    #[test]
    fn test_start_is_fixed_and_permutation_kept() {
        let m = ring_matrix(9);
        let config = EvolutionConfig::default().with_mutation_rate(1.0);
        let mut rng = StdRng::seed_from_u64(11);

        let result = EvolutionaryRefiner::run(&m, &scrambled(9), &config, &mut rng);

        assert_eq!(result.best[0], 0);
        let mut sorted = result.best.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_result() {
        let m = ring_matrix(11);
        let config = EvolutionConfig::default().with_mutation_rate(0.4);

        let a = EvolutionaryRefiner::run(&m, &scrambled(11), &config, &mut StdRng::seed_from_u64(5));
        let b = EvolutionaryRefiner::run(&m, &scrambled(11), &config, &mut StdRng::seed_from_u64(5));

        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_zero_mutation_keeps_initial_elite() {
        let m = ring_matrix(8);
        let config = EvolutionConfig::default()
            .with_population_size(1)
            .with_generations(10)
            .with_mutation_rate(0.0);
        let seed = scrambled(8);
        let mut rng = StdRng::seed_from_u64(1);

        let result = EvolutionaryRefiner::run(&m, &seed, &config, &mut rng);

        assert_eq!(result.best, seed);
        assert_eq!(result.generations, 10);
    }

    #[test]
    fn test_cancellation_before_first_generation() {
        let m = ring_matrix(10);
        let config = EvolutionConfig::default().with_generations(1000);
        let cancel = Arc::new(AtomicBool::new(true));
        let mut rng = StdRng::seed_from_u64(42);

        let result = EvolutionaryRefiner::run_with_cancel(&m, &scrambled(10), &config, &mut rng, Some(cancel));

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.cost_history.len(), 1);
    }

    #[test]
    fn test_refine_tour_over_stops() {
        let stops = Stop::from_coords(&[(0.0, 0.0), (0.0, 0.3), (0.0, 0.1), (0.0, 0.4), (0.0, 0.2)]);
        let distance = crate::geo::RoadDistance::straight_line();
        let config = EvolutionConfig::default().with_mutation_rate(0.5);
        let mut rng = StdRng::seed_from_u64(9);

        let tour = refine_tour(&stops, &distance, &config, &mut rng).unwrap();

        assert_eq!(tour[0], stops[0]);
        let lngs: Vec<f64> = tour.iter().map(|s| s.lng).collect();
        assert_eq!(lngs, vec![0.0, 0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_refine_tour_rejects_invalid_config() {
        let stops = Stop::from_coords(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        let config = EvolutionConfig::default().with_population_size(0);
        let mut rng = StdRng::seed_from_u64(0);
        let err = refine_tour(&stops, &crate::geo::RoadDistance::default(), &config, &mut rng).unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidInput(_)));
    }

    #[test]
    fn test_tiny_instances_return_seed() {
        let m = ring_matrix(2);
        let mut rng = StdRng::seed_from_u64(0);
        let result = EvolutionaryRefiner::run(&m, &[0, 1], &EvolutionConfig::default(), &mut rng);
        assert_eq!(result.best, vec![0, 1]);
        assert_eq!(result.generations, 0);
    }
}
