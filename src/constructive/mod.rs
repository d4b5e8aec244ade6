//! Constructive heuristics.
//!
//! Builds an initial feasible tour from an unordered set of stops.

mod nearest_neighbor;

pub use nearest_neighbor::{nearest_neighbor, nearest_neighbor_tour};
