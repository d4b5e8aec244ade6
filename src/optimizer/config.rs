//! Optimizer configuration.

use crate::evolution::EvolutionConfig;
use crate::exact::DEFAULT_EXACT_CAP;

/// Configuration for [`RouteOptimizer`](super::RouteOptimizer).
///
/// # Defaults
///
/// ```
/// use u_tour::optimizer::OptimizerConfig;
///
/// let config = OptimizerConfig::default();
/// assert_eq!(config.exact_cap, 8);
/// assert_eq!(config.generation_cap, 50);
/// assert_eq!(config.seed, 42);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Largest instance solved by exhaustive search.
    ///
    /// `(cap - 1)!` orderings are enumerated at the cap.
    pub exact_cap: usize,

    /// Upper bound applied to the evolutionary generation count.
    pub generation_cap: usize,

    /// Evolutionary refinement parameters.
    pub evolution: EvolutionConfig,

    /// Seed for the evolutionary random source.
    ///
    /// The engine never seeds from entropy itself; callers that want varied
    /// runs pass a random seed here.
    pub seed: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            exact_cap: DEFAULT_EXACT_CAP,
            generation_cap: 50,
            evolution: EvolutionConfig::default(),
            seed: 42,
        }
    }
}

impl OptimizerConfig {
    pub fn with_exact_cap(mut self, cap: usize) -> Self {
        self.exact_cap = cap;
        self
    }

    pub fn with_generation_cap(mut self, cap: usize) -> Self {
        self.generation_cap = cap;
        self
    }

    pub fn with_evolution(mut self, evolution: EvolutionConfig) -> Self {
        self.evolution = evolution;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Evolution parameters for `n` stops with the generation cap applied.
    pub fn evolution_for(&self, n: usize) -> EvolutionConfig {
        let (_, generations) = self.evolution.resolve(n);
        self.evolution
            .clone()
            .with_generations(generations.min(self.generation_cap))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.exact_cap > 12 {
            return Err(format!(
                "exact_cap {} is intractable (more than 11! orderings)",
                self.exact_cap
            ));
        }
        self.evolution.validate()
    }
}
