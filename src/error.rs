//! Error types for tour optimization.
//!
//! Only three conditions are errors: invalid input, a failing distance
//! function, and an exact-search request above the tractability cap.
//! Ties, empty input and single-stop input are normal cases.

use thiserror::Error;

use crate::models::StopId;

/// Failure reported by a [`DistanceFn`](crate::distance::DistanceFn).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    /// The distance source could not produce a value.
    #[error("distance source failed: {0}")]
    Failed(String),

    /// The distance source produced NaN or an infinite value.
    #[error("distance is not finite")]
    NonFinite,

    /// The distance source produced a negative value.
    #[error("distance is negative: {0}")]
    Negative(f64),
}

impl DistanceError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Error returned by [`RouteOptimizer::optimize`](crate::optimizer::RouteOptimizer::optimize).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    /// Malformed request: non-finite coordinates or an invalid configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The supplied distance function failed on an ordered pair of stops.
    ///
    /// Fatal for the call: no retry and no partial result.
    #[error("distance function failed from stop {from} to stop {to}: {source}")]
    DistanceFunctionFailure {
        from: StopId,
        to: StopId,
        #[source]
        source: DistanceError,
    },

    /// Exact search was explicitly requested above the permutation cap.
    #[error("exact search requested for {stops} stops, cap is {cap}")]
    IntractableExactRequest { stops: usize, cap: usize },
}

impl OptimizeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, OptimizeError>;

/// Rejected edit of a [`CircuitStore`](crate::circuits::CircuitStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("circuit name is empty")]
    EmptyName,

    #[error("circuit {0:?} already exists")]
    DuplicateName(String),

    #[error("no circuit named {0:?}")]
    UnknownCircuit(String),

    /// The store must keep at least one circuit.
    #[error("cannot delete the last circuit")]
    LastCircuit,

    #[error("circuit is full ({cap} stops)")]
    CircuitFull { cap: usize },

    #[error("stop index {index} out of range for {len} stops")]
    StopOutOfRange { index: usize, len: usize },
}
