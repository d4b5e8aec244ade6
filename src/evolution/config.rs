//! Evolutionary refinement configuration.

/// Configuration for [`EvolutionaryRefiner`](super::EvolutionaryRefiner).
///
/// Population size and generation count default to values derived from the
/// instance size `n`; see [`resolve`](Self::resolve).
///
/// # Builder Pattern
///
/// ```
/// use u_tour::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_population_size(40)
///     .with_generations(25)
///     .with_mutation_rate(0.3);
/// assert_eq!(config.resolve(10), (40, 25));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    /// Number of candidate tours. `None` uses `min(100, 4n)`.
    pub population_size: Option<usize>,

    /// Number of generations. `None` uses `min(500, 10n)`.
    pub generations: Option<usize>,

    /// Probability of applying one random swap to an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Whether to score candidates in parallel with rayon.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: None,
            generations: None,
            mutation_rate: 0.1,
            parallel: false,
        }
    }
}

impl EvolutionConfig {
    /// Sets a fixed population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = Some(n);
        self
    }

    /// Sets a fixed number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = Some(n);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Population size and generation count for an instance of `n` stops.
    pub fn resolve(&self, n: usize) -> (usize, usize) {
        let population = self.population_size.unwrap_or_else(|| (4 * n).min(100));
        let generations = self.generations.unwrap_or_else(|| (10 * n).min(500));
        (population.max(1), generations)
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == Some(0) {
            return Err("population_size must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within [0, 1]".into());
        }
        Ok(())
    }
}
