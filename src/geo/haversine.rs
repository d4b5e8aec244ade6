//! Haversine great-circle distance.

use crate::models::Stop;

/// Mean Earth radius used for all great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A bare coordinate pair in decimal degrees.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<&Stop> for LatLng {
    fn from(stop: &Stop) -> Self {
        Self::new(stop.lat, stop.lng)
    }
}

/// Great-circle distance in kilometers between two coordinates.
///
/// The haversine term is clamped into `[0, 1]` before `asin`, so antipodal
/// and coincident points never produce NaN.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lng = (d_lng / 2.0).sin();
    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;

    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Straight-line distance between two stops in kilometers.
///
/// # Examples
///
/// ```
/// use u_tour::geo::distance;
/// use u_tour::models::Stop;
///
/// let a = Stop::new(0, 0.0, 0.0);
/// let b = Stop::new(1, 0.0, 1.0);
/// assert!((distance(&a, &b) - 111.195).abs() < 1e-3);
/// assert_eq!(distance(&a, &a), 0.0);
/// ```
pub fn distance(a: &Stop, b: &Stop) -> f64 {
    haversine_km(a.into(), b.into())
}
