//! Routed distances from a street-routing service.
//!
//! The search algorithms never call a routing service. Once an order is
//! decided, [`routed_legs`] asks a [`RouteProvider`] for each leg in turn,
//! bounded by a timeout and spaced by a minimum delay, and falls back to a
//! geometric [`DistanceFn`](crate::distance::DistanceFn) for any leg the
//! service cannot answer.

mod legs;
#[cfg(feature = "ors")]
pub mod ors;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::models::{Stop, TransportProfile};

pub use legs::routed_legs;

/// Distance and duration of one leg as reported by a routing service.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedLeg {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Why a routing service gave no usable answer.
///
/// Every variant is handled the same way: the leg falls back to the
/// geometric estimate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// No route, no credentials, or the service is not configured.
    #[error("routing unavailable")]
    Unavailable,

    /// The service rejected the call for exceeding its rate limit.
    #[error("routing rate limit exceeded")]
    RateLimited,

    /// The call did not complete within the policy timeout.
    #[error("routing timed out after {0:?}")]
    Timeout(Duration),

    /// Network or HTTP failure.
    #[error("routing transport error: {0}")]
    Transport(String),

    /// The service answered with something that is not a route.
    #[error("invalid routing response: {0}")]
    InvalidResponse(String),
}

/// A street-routing service.
///
/// `profile` is a travel-mode token passed through uninterpreted.
pub trait RouteProvider: Send + Sync {
    fn route(
        &self,
        from: &Stop,
        to: &Stop,
        profile: &str,
    ) -> impl Future<Output = Result<RoutedLeg, RouteError>> + Send;
}

/// Call policy for [`routed_legs`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tour::models::TransportProfile;
/// use u_tour::routing::RoutingPolicy;
///
/// let policy = RoutingPolicy::default()
///     .with_timeout(Duration::from_secs(3))
///     .with_min_delay(Duration::from_millis(250))
///     .with_profile(TransportProfile::CyclingRegular);
/// assert!(policy.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingPolicy {
    /// Upper bound on a single routing call.
    pub timeout: Duration,

    /// Minimum spacing between the starts of consecutive calls.
    pub min_delay: Duration,

    /// Travel mode requested from the service and used for fallback timing.
    pub profile: TransportProfile,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            min_delay: Duration::from_secs(1),
            profile: TransportProfile::default(),
        }
    }
}

impl RoutingPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    pub fn with_profile(mut self, profile: TransportProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Validates the policy.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout.is_zero() {
            return Err("timeout must be positive".into());
        }
        Ok(())
    }
}
