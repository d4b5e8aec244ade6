//! Geometric distance model.
//!
//! Great-circle distance corrected by a road factor that approximates how
//! much longer streets are than the straight line between two stops.
//!
//! - [`haversine_km`] / [`distance`]: great-circle distance on a 6371 km sphere
//! - [`RoadFactorPolicy`]: configurable step function producing the correction
//! - [`RoadDistance`]: the geometric [`DistanceFn`](crate::distance::DistanceFn)

mod haversine;
mod road_factor;

pub use haversine::{distance, haversine_km, LatLng, EARTH_RADIUS_KM};
pub use road_factor::{RoadDistance, RoadFactorBucket, RoadFactorPolicy};
