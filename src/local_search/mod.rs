//! Local search improvement.
//!
//! Improvement operators take an existing tour and return one that costs
//! no more. The first stop is never relocated.

mod two_opt;

pub use two_opt::{two_opt, two_opt_tour, TwoOptResult};
