//! Strategy selection and optimization results.

use std::fmt;
use std::str::FromStr;

use super::stop::Stop;

/// Caller intent for strategy selection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyHint {
    /// Exact search up to the cap, nearest neighbor + 2-opt above it.
    #[default]
    Auto,
    /// Nearest neighbor followed by 2-opt.
    NearestNeighborOnly,
    /// Evolutionary refinement followed by 2-opt.
    EvolutionaryOnly,
    /// Exact search; rejected above the cap instead of downgraded.
    ExactIfSmall,
}

impl FromStr for StrategyHint {
    type Err = String;

    /// Parses the hint names, including the identifiers used by the
    /// browser front end (`nearestNeighbor`, `genetic`, `tsp`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" | "tsp" => Ok(Self::Auto),
            "nearest-neighbor" | "nearestNeighbor" => Ok(Self::NearestNeighborOnly),
            "evolutionary" | "genetic" => Ok(Self::EvolutionaryOnly),
            "exact" => Ok(Self::ExactIfSmall),
            other => Err(format!("unknown strategy hint: {other}")),
        }
    }
}

/// The strategy that actually produced a tour.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Zero or one stop: input returned unchanged.
    Trivial,
    /// Exhaustive search with a fixed start.
    Exact,
    /// Nearest-neighbor construction improved by 2-opt.
    NearestNeighbor,
    /// Elitist evolutionary refinement improved by 2-opt.
    Evolutionary,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Trivial => "trivial",
            Strategy::Exact => "exact",
            Strategy::NearestNeighbor => "nearest-neighbor+2-opt",
            Strategy::Evolutionary => "evolutionary+2-opt",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one optimization call.
///
/// Immutable once built. A later optimization of the same stops produces
/// a new result that replaces this one.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    tour: Vec<Stop>,
    strategy: Strategy,
    cost_km: f64,
}

impl OptimizationResult {
    pub(crate) fn new(tour: Vec<Stop>, strategy: Strategy, cost_km: f64) -> Self {
        Self {
            tour,
            strategy,
            cost_km,
        }
    }

    /// The ordered stops.
    pub fn tour(&self) -> &[Stop] {
        &self.tour
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Total cost under the distance function used for the optimization.
    pub fn cost_km(&self) -> f64 {
        self.cost_km
    }

    pub fn len(&self) -> usize {
        self.tour.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tour.is_empty()
    }

    pub fn into_tour(self) -> Vec<Stop> {
        self.tour
    }
}
