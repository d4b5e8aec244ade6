//! Per-leg route statistics.
//!
//! Re-walks a decided tour and reports distance and travel time for each
//! leg together with running totals. This is what export and map display
//! consume; it plays no part in choosing the order.

use crate::distance::{evaluate, DistanceFn};
use crate::error::Result;
use crate::models::{Stop, StopId, TransportProfile};

/// Where a leg's numbers came from.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegSource {
    /// Distance model and average profile speed.
    Estimated,
    /// A street-routing service.
    Routed,
}

/// One leg of a tour.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub from: StopId,
    pub to: StopId,
    pub distance_km: f64,
    pub time_min: f64,
    /// Distance from the first stop up to and including this leg.
    pub cumulative_distance_km: f64,
    /// Time from the first stop up to and including this leg.
    pub cumulative_time_min: f64,
    pub source: LegSource,
}

/// Accumulates legs and their running totals.
#[derive(Debug, Default)]
pub(crate) struct LegAccumulator {
    legs: Vec<RouteLeg>,
    distance_km: f64,
    time_min: f64,
}

impl LegAccumulator {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            legs: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, from: &Stop, to: &Stop, distance_km: f64, time_min: f64, source: LegSource) {
        self.distance_km += distance_km;
        self.time_min += time_min;
        self.legs.push(RouteLeg {
            from: from.id.clone(),
            to: to.id.clone(),
            distance_km,
            time_min,
            cumulative_distance_km: self.distance_km,
            cumulative_time_min: self.time_min,
            source,
        });
    }

    pub(crate) fn finish(self) -> Vec<RouteLeg> {
        self.legs
    }
}

/// Legs of `tour` under `distance`, timed at the profile's average speed.
///
/// The result is a plain `Vec`: computed eagerly and iterable any number
/// of times.
///
/// # Examples
///
/// ```
/// use u_tour::geo::RoadDistance;
/// use u_tour::legs::{route_legs, RouteSummary};
/// use u_tour::models::{Stop, TransportProfile};
///
/// let tour = Stop::from_coords(&[(0.0, 0.0), (0.0, 0.1), (0.0, 0.2)]);
/// let legs = route_legs(&tour, &RoadDistance::straight_line(), TransportProfile::FootWalking).unwrap();
///
/// assert_eq!(legs.len(), 2);
/// let summary = RouteSummary::from_legs(tour.len(), &legs);
/// assert!((summary.total_distance_km - 22.239).abs() < 1e-3);
/// ```
pub fn route_legs<D: DistanceFn + ?Sized>(
    tour: &[Stop],
    distance: &D,
    profile: TransportProfile,
) -> Result<Vec<RouteLeg>> {
    let mut acc = LegAccumulator::with_capacity(tour.len().saturating_sub(1));
    for w in tour.windows(2) {
        let d = evaluate(distance, &w[0], &w[1])?;
        acc.push(&w[0], &w[1], d, profile.travel_minutes(d), LegSource::Estimated);
    }
    Ok(acc.finish())
}

/// Totals over a set of legs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub stops: usize,
    pub total_distance_km: f64,
    pub total_time_min: f64,
    /// Number of legs whose numbers came from a routing service.
    pub routed_legs: usize,
}

impl RouteSummary {
    pub fn from_legs(stops: usize, legs: &[RouteLeg]) -> Self {
        let last = legs.last();
        Self {
            stops,
            total_distance_km: last.map_or(0.0, |l| l.cumulative_distance_km),
            total_time_min: last.map_or(0.0, |l| l.cumulative_time_min),
            routed_legs: legs.iter().filter(|l| l.source == LegSource::Routed).count(),
        }
    }

    /// Total time as whole hours and rounded remaining minutes.
    pub fn hours_minutes(&self) -> (u64, u64) {
        let total = self.total_time_min.max(0.0);
        let hours = (total / 60.0).floor();
        let minutes = (total - hours * 60.0).round();
        if minutes >= 60.0 {
            (hours as u64 + 1, 0)
        } else {
            (hours as u64, minutes as u64)
        }
    }
}
