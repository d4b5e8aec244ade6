//! Optimization entry points.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::OptimizerConfig;
use crate::constructive::nearest_neighbor;
use crate::cost::{apply_order, order_cost};
use crate::distance::{DistanceFn, DistanceMatrix};
use crate::error::{OptimizeError, Result};
use crate::evolution::EvolutionaryRefiner;
use crate::exact::solve_exact;
use crate::local_search::two_opt;
use crate::models::{OptimizationResult, Stop, Strategy, StrategyHint};

/// Everything one optimization call needs, built by the caller.
///
/// The engine reads no ambient configuration: stops, hint and distance
/// function all arrive through this value.
///
/// # Examples
///
/// ```
/// use u_tour::geo::RoadDistance;
/// use u_tour::models::{Stop, StrategyHint};
/// use u_tour::optimizer::OptimizeRequest;
///
/// let stops = Stop::from_coords(&[(-34.60, -58.38), (-34.61, -58.40)]);
/// let distance = RoadDistance::default();
/// let request = OptimizeRequest::new(&stops, &distance).with_hint(StrategyHint::NearestNeighborOnly);
/// assert_eq!(request.hint, StrategyHint::NearestNeighborOnly);
/// ```
pub struct OptimizeRequest<'a, D: ?Sized> {
    pub stops: &'a [Stop],
    pub hint: StrategyHint,
    pub distance: &'a D,
}

impl<D: ?Sized> Clone for OptimizeRequest<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for OptimizeRequest<'_, D> {}

impl<'a, D: DistanceFn + ?Sized> OptimizeRequest<'a, D> {
    pub fn new(stops: &'a [Stop], distance: &'a D) -> Self {
        Self {
            stops,
            hint: StrategyHint::Auto,
            distance,
        }
    }

    pub fn with_hint(mut self, hint: StrategyHint) -> Self {
        self.hint = hint;
        self
    }
}

/// Selects and runs a tour strategy.
///
/// # Usage
///
/// ```
/// use u_tour::geo::RoadDistance;
/// use u_tour::models::{Stop, Strategy};
/// use u_tour::optimizer::{OptimizeRequest, OptimizerConfig, RouteOptimizer};
///
/// let stops = Stop::from_coords(&[
///     (-34.6037, -58.3816),
///     (-34.6158, -58.4333),
///     (-34.5875, -58.3974),
///     (-34.6345, -58.3631),
/// ]);
/// let distance = RoadDistance::default();
///
/// let optimizer = RouteOptimizer::new(OptimizerConfig::default());
/// let result = optimizer.optimize(&OptimizeRequest::new(&stops, &distance)).unwrap();
///
/// assert_eq!(result.strategy(), Strategy::Exact);
/// assert_eq!(result.tour()[0], stops[0]);
/// assert_eq!(result.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer {
    config: OptimizerConfig,
}

impl RouteOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimizes the request, seeding randomness from the configured seed.
    pub fn optimize<D: DistanceFn + ?Sized>(
        &self,
        request: &OptimizeRequest<'_, D>,
    ) -> Result<OptimizationResult> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.optimize_with_rng(request, &mut rng, None)
    }

    /// Optimizes the request with an injected random source and an optional
    /// cancellation flag.
    ///
    /// Zero or one stop is returned unchanged before anything else is
    /// checked. Larger requests are rejected as [`OptimizeError::InvalidInput`]
    /// for an invalid configuration, an invalid distance model or
    /// non-finite coordinates.
    ///
    /// Cancellation is only observed between evolutionary generations; the
    /// tour reached so far is still finished with 2-opt.
    pub fn optimize_with_rng<D: DistanceFn + ?Sized, R: Rng>(
        &self,
        request: &OptimizeRequest<'_, D>,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<OptimizationResult> {
        let stops = request.stops;
        let n = stops.len();
        if n <= 1 {
            return Ok(OptimizationResult::new(stops.to_vec(), Strategy::Trivial, 0.0));
        }

        self.config.validate().map_err(OptimizeError::InvalidInput)?;
        request
            .distance
            .validate()
            .map_err(|e| OptimizeError::invalid_input(format!("distance model: {e}")))?;

        if let Some(bad) = stops.iter().find(|s| !s.is_finite()) {
            return Err(OptimizeError::invalid_input(format!(
                "stop {} has non-finite coordinates",
                bad.id
            )));
        }

        let strategy = self.select_strategy(n, request.hint)?;
        debug!("optimizing {n} stops with {strategy} (hint {:?})", request.hint);

        let matrix = DistanceMatrix::build(stops, request.distance)?;

        let order = match strategy {
            Strategy::Exact => solve_exact(&matrix),
            Strategy::NearestNeighbor => {
                let initial = nearest_neighbor(&matrix);
                debug!("nearest neighbor cost {:.3} km", order_cost(&initial, &matrix));
                two_opt(&initial, &matrix).order
            }
            Strategy::Evolutionary => {
                let seed = nearest_neighbor(&matrix);
                let config = self.config.evolution_for(n);
                let evolved = EvolutionaryRefiner::run_with_cancel(&matrix, &seed, &config, rng, cancel);
                debug!(
                    "evolution cost {:.3} km after {} generations{}",
                    evolved.best_cost,
                    evolved.generations,
                    if evolved.cancelled { " (cancelled)" } else { "" }
                );
                two_opt(&evolved.best, &matrix).order
            }
            Strategy::Trivial => (0..n).collect(),
        };

        let cost = order_cost(&order, &matrix);
        debug!("{strategy} tour cost {cost:.3} km");

        Ok(OptimizationResult::new(apply_order(stops, &order), strategy, cost))
    }

    /// Resolves the strategy for `n >= 2` stops.
    fn select_strategy(&self, n: usize, hint: StrategyHint) -> Result<Strategy> {
        let cap = self.config.exact_cap;
        match hint {
            StrategyHint::Auto if n <= cap => Ok(Strategy::Exact),
            StrategyHint::Auto | StrategyHint::NearestNeighborOnly => Ok(Strategy::NearestNeighbor),
            StrategyHint::EvolutionaryOnly => Ok(Strategy::Evolutionary),
            StrategyHint::ExactIfSmall if n <= cap => Ok(Strategy::Exact),
            StrategyHint::ExactIfSmall => Err(OptimizeError::IntractableExactRequest { stops: n, cap }),
        }
    }
}

/// Optimizes `stops` with the default configuration.
///
/// # Examples
///
/// ```
/// use u_tour::geo::RoadDistance;
/// use u_tour::models::StrategyHint;
/// use u_tour::optimize;
///
/// let result = optimize(&[], &RoadDistance::default(), StrategyHint::Auto).unwrap();
/// assert!(result.is_empty());
/// assert_eq!(result.cost_km(), 0.0);
/// ```
pub fn optimize<D: DistanceFn + ?Sized>(
    stops: &[Stop],
    distance: &D,
    hint: StrategyHint,
) -> Result<OptimizationResult> {
    RouteOptimizer::default().optimize(&OptimizeRequest::new(stops, distance).with_hint(hint))
}
