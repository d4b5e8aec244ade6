//! Strategy selection and orchestration.
//!
//! [`RouteOptimizer`] picks a strategy from the instance size and the
//! caller's [`StrategyHint`](crate::models::StrategyHint), runs it against
//! a [`DistanceMatrix`](crate::distance::DistanceMatrix) evaluated once per
//! call, and returns an [`OptimizationResult`](crate::models::OptimizationResult).
//!
//! | hint | n ≤ 1 | n ≤ cap | n > cap |
//! |---|---|---|---|
//! | `Auto` | trivial | exact | nearest neighbor + 2-opt |
//! | `NearestNeighborOnly` | trivial | nearest neighbor + 2-opt | nearest neighbor + 2-opt |
//! | `EvolutionaryOnly` | trivial | evolutionary + 2-opt | evolutionary + 2-opt |
//! | `ExactIfSmall` | trivial | exact | error |

mod config;
mod runner;

pub use config::OptimizerConfig;
pub use runner::{optimize, OptimizeRequest, RouteOptimizer};
