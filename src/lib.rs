//! Open-path tour optimization over geographic stops.
//!
//! Given stops with latitude/longitude, finds a short visiting order that
//! starts at the first stop and ends wherever is cheapest. Strategies:
//!
//! - **Exact search**: exhaustive enumeration for small instances
//! - **Nearest neighbor**: greedy construction from the fixed start
//! - **2-opt**: best-improvement segment reversal, applied to every
//!   heuristic tour
//! - **Evolutionary refinement**: elitist swap mutation around a
//!   nearest-neighbor seed
//!
//! Distances come from a caller-supplied [`DistanceFn`](distance::DistanceFn).
//! The [`geo`] module provides great-circle distances scaled by a
//! configurable road factor; the [`routing`] module fetches street-routed
//! leg statistics once an order is decided.
//!
//! # Quick start
//!
//! ```
//! use u_tour::geo::RoadDistance;
//! use u_tour::models::{Stop, StrategyHint};
//!
//! let stops = Stop::from_coords(&[
//!     (-34.6037, -58.3816),
//!     (-34.6345, -58.3631),
//!     (-34.5875, -58.3974),
//! ]);
//! let result = u_tour::optimize(&stops, &RoadDistance::default(), StrategyHint::Auto).unwrap();
//!
//! assert_eq!(result.tour()[0], stops[0]);
//! assert_eq!(result.len(), 3);
//! ```
//!
//! # Features
//!
//! - `routing` (default): async routed leg statistics on `tokio`
//! - `ors`: OpenRouteService client over `reqwest`
//! - `parallel`: `rayon` population scoring in evolutionary refinement
//! - `serde`: serialization of models and leg statistics
//! - `wasm`: `wasm-bindgen` browser bindings

pub mod circuits;
pub mod constructive;
pub mod cost;
pub mod distance;
pub mod error;
pub mod evolution;
pub mod exact;
pub mod geo;
pub mod legs;
pub mod local_search;
pub mod models;
pub mod optimizer;
#[cfg(feature = "routing")]
pub mod routing;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use distance::{DistanceFn, DistanceMatrix};
pub use error::{OptimizeError, Result};
pub use models::{OptimizationResult, Stop, StopId, Strategy, StrategyHint};
pub use optimizer::{optimize, OptimizeRequest, OptimizerConfig, RouteOptimizer};
