//! Road-factor policies and the geometric distance estimate.
//!
//! A road factor is a dimensionless multiplier `>= 1` applied to the
//! straight-line distance. It is a step function over an ordered list of
//! `(upper_bound_km, factor)` buckets, evaluated against one of two metrics:
//!
//! - [`RoadFactorPolicy::ByPairDistance`]: the straight-line distance between
//!   the two stops. Short hops wind through blocks, so they get the larger
//!   factors.
//! - [`RoadFactorPolicy::ByCenterDistance`]: the mean distance of both stops
//!   to a reference city center. Dense central grids get the larger factors.

use super::haversine::{distance, haversine_km, LatLng};
use crate::distance::DistanceFn;
use crate::error::DistanceError;
use crate::models::Stop;

/// One step of a road-factor policy.
///
/// Applies `factor` when the policy metric is strictly below
/// `upper_bound_km` and no earlier bucket matched.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadFactorBucket {
    pub upper_bound_km: f64,
    pub factor: f64,
}

impl RoadFactorBucket {
    pub const fn new(upper_bound_km: f64, factor: f64) -> Self {
        Self {
            upper_bound_km,
            factor,
        }
    }
}

/// How the road factor for a pair of stops is chosen.
///
/// # Examples
///
/// ```
/// use u_tour::geo::RoadFactorPolicy;
///
/// let policy = RoadFactorPolicy::by_pair_distance([(1.0, 1.3), (f64::INFINITY, 1.1)]);
/// assert!(policy.validate().is_ok());
/// assert_eq!(policy.factor_for(0.4), 1.3);
/// assert_eq!(policy.factor_for(5.0), 1.1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum RoadFactorPolicy {
    /// Buckets over the straight-line distance between the two stops.
    ByPairDistance(Vec<RoadFactorBucket>),

    /// Buckets over the mean distance of both stops to `center`.
    ByCenterDistance {
        center: LatLng,
        buckets: Vec<RoadFactorBucket>,
    },
}

impl Default for RoadFactorPolicy {
    fn default() -> Self {
        Self::urban_default()
    }
}

impl RoadFactorPolicy {
    /// Pair-distance policy from `(upper_bound_km, factor)` pairs.
    pub fn by_pair_distance(buckets: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::ByPairDistance(collect_buckets(buckets))
    }

    /// Center-distance policy from `(upper_bound_km, factor)` pairs.
    pub fn by_center_distance(
        center: LatLng,
        buckets: impl IntoIterator<Item = (f64, f64)>,
    ) -> Self {
        Self::ByCenterDistance {
            center,
            buckets: collect_buckets(buckets),
        }
    }

    /// Urban pair-distance preset.
    ///
    /// - `< 0.5 km` → 1.35
    /// - `< 2 km` → 1.25
    /// - `< 10 km` → 1.15
    /// - otherwise → 1.05
    pub fn urban_default() -> Self {
        Self::by_pair_distance([
            (0.5, 1.35),
            (2.0, 1.25),
            (10.0, 1.15),
            (f64::INFINITY, 1.05),
        ])
    }

    /// Center-distance preset around Buenos Aires (Obelisco).
    ///
    /// - `< 5 km` (microcentro) → 1.6
    /// - `< 15 km` (urban) → 1.4
    /// - `< 30 km` (suburban) → 1.3
    /// - otherwise (rural) → 1.2
    pub fn buenos_aires() -> Self {
        Self::by_center_distance(
            LatLng::new(-34.6037, -58.3816),
            [
                (5.0, 1.6),
                (15.0, 1.4),
                (30.0, 1.3),
                (f64::INFINITY, 1.2),
            ],
        )
    }

    /// A single bucket applying `factor` everywhere.
    pub fn constant(factor: f64) -> Self {
        Self::by_pair_distance([(f64::INFINITY, factor)])
    }

    /// Straight-line distance with no correction.
    pub fn identity() -> Self {
        Self::constant(1.0)
    }

    pub fn buckets(&self) -> &[RoadFactorBucket] {
        match self {
            Self::ByPairDistance(buckets) => buckets,
            Self::ByCenterDistance { buckets, .. } => buckets,
        }
    }

    /// Looks up the factor for a metric value in kilometers.
    ///
    /// Values beyond the last bound use the last bucket; an empty policy
    /// yields 1.
    pub fn factor_for(&self, metric_km: f64) -> f64 {
        let buckets = self.buckets();
        buckets
            .iter()
            .find(|b| metric_km < b.upper_bound_km)
            .or_else(|| buckets.last())
            .map_or(1.0, |b| b.factor)
    }

    /// Road factor for the ordered pair `(a, b)`.
    pub fn road_factor(&self, a: &Stop, b: &Stop) -> f64 {
        match self {
            Self::ByPairDistance(_) => self.factor_for(distance(a, b)),
            Self::ByCenterDistance { center, .. } => {
                let avg = (haversine_km(a.into(), *center) + haversine_km(b.into(), *center)) / 2.0;
                self.factor_for(avg)
            }
        }
    }

    /// Validates the bucket list.
    ///
    /// Buckets must be non-empty with strictly increasing bounds and
    /// finite factors `>= 1` that never increase with the bound.
    pub fn validate(&self) -> Result<(), String> {
        let buckets = self.buckets();
        if buckets.is_empty() {
            return Err("road factor policy needs at least one bucket".into());
        }
        for b in buckets {
            if !b.factor.is_finite() || b.factor < 1.0 {
                return Err(format!("road factor {} must be finite and >= 1", b.factor));
            }
            if b.upper_bound_km.is_nan() || b.upper_bound_km <= 0.0 {
                return Err(format!(
                    "bucket bound {} must be positive",
                    b.upper_bound_km
                ));
            }
        }
        for w in buckets.windows(2) {
            if w[1].upper_bound_km <= w[0].upper_bound_km {
                return Err("bucket bounds must be strictly increasing".into());
            }
            if w[1].factor > w[0].factor {
                return Err("road factors must not increase with distance".into());
            }
        }
        if let Self::ByCenterDistance { center, .. } = self {
            if !center.lat.is_finite() || !center.lng.is_finite() {
                return Err("policy center must be finite".into());
            }
        }
        Ok(())
    }
}

fn collect_buckets(buckets: impl IntoIterator<Item = (f64, f64)>) -> Vec<RoadFactorBucket> {
    buckets
        .into_iter()
        .map(|(bound, factor)| RoadFactorBucket::new(bound, factor))
        .collect()
}

/// Geometric distance estimate: great-circle distance times road factor.
///
/// Deterministic and infallible for finite coordinates. This is the
/// distance the search algorithms run against, and the fallback for
/// routed distances.
///
/// # Examples
///
/// ```
/// use u_tour::distance::DistanceFn;
/// use u_tour::geo::{RoadDistance, RoadFactorPolicy};
/// use u_tour::models::Stop;
///
/// let model = RoadDistance::new(RoadFactorPolicy::constant(1.5));
/// let a = Stop::new(0, 0.0, 0.0);
/// let b = Stop::new(1, 0.0, 0.1);
/// let straight = u_tour::geo::distance(&a, &b);
/// assert!((model.distance(&a, &b).unwrap() - straight * 1.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadDistance {
    policy: RoadFactorPolicy,
}

impl RoadDistance {
    /// Wraps `policy` without checking it.
    ///
    /// The optimizer still validates the policy before use; see
    /// [`try_new`](Self::try_new) to reject it up front.
    pub fn new(policy: RoadFactorPolicy) -> Self {
        Self { policy }
    }

    /// Wraps `policy` after [`RoadFactorPolicy::validate`].
    pub fn try_new(policy: RoadFactorPolicy) -> Result<Self, String> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Plain great-circle distance (road factor 1).
    pub fn straight_line() -> Self {
        Self::new(RoadFactorPolicy::identity())
    }

    pub fn policy(&self) -> &RoadFactorPolicy {
        &self.policy
    }

    pub fn road_factor(&self, a: &Stop, b: &Stop) -> f64 {
        self.policy.road_factor(a, b)
    }

    /// `distance(a, b) * road_factor(a, b)` in kilometers.
    pub fn estimated_distance(&self, a: &Stop, b: &Stop) -> f64 {
        distance(a, b) * self.road_factor(a, b)
    }
}

impl DistanceFn for RoadDistance {
    fn distance(&self, from: &Stop, to: &Stop) -> Result<f64, DistanceError> {
        Ok(self.estimated_distance(from, to))
    }

    fn validate(&self) -> Result<(), String> {
        self.policy.validate()
    }
}
