//! Stop and stop identity types.

use std::fmt;

use crate::error::OptimizeError;

/// Stable identity of a stop.
///
/// Either the position in the caller-supplied input sequence or an
/// opaque caller label. The optimizer never interprets it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StopId {
    Index(usize),
    Label(String),
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopId::Index(i) => write!(f, "#{i}"),
            StopId::Label(label) => f.write_str(label),
        }
    }
}

impl From<usize> for StopId {
    fn from(index: usize) -> Self {
        StopId::Index(index)
    }
}

impl From<&str> for StopId {
    fn from(label: &str) -> Self {
        StopId::Label(label.to_string())
    }
}

/// A waypoint in decimal degrees.
///
/// `label` is carried through to output only; no algorithm reads it.
///
/// # Examples
///
/// ```
/// use u_tour::models::Stop;
///
/// let stop = Stop::new(0, -34.6037, -58.3816).with_label("Obelisco");
/// assert_eq!(stop.label.as_deref(), Some("Obelisco"));
/// assert!(stop.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    /// Latitude in [-90, 90].
    pub lat: f64,
    /// Longitude in [-180, 180].
    pub lng: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub label: Option<String>,
}

impl Stop {
    /// Creates an unlabeled stop.
    pub fn new(id: impl Into<StopId>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            label: None,
        }
    }

    /// Attaches a human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builds stops from `(lat, lng)` pairs, identified by input position.
    pub fn from_coords(coords: &[(f64, f64)]) -> Vec<Stop> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lng))| Stop::new(i, lat, lng))
            .collect()
    }

    /// Returns `true` when both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Checks the WGS84 coordinate ranges.
    ///
    /// The optimizer itself only rejects non-finite coordinates; callers
    /// that import or geocode stops use this for the full range check.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if !self.is_finite() {
            return Err(OptimizeError::invalid_input(format!(
                "stop {} has non-finite coordinates",
                self.id
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(OptimizeError::invalid_input(format!(
                "stop {} latitude {} outside [-90, 90]",
                self.id, self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(OptimizeError::invalid_input(format!(
                "stop {} longitude {} outside [-180, 180]",
                self.id, self.lng
            )));
        }
        Ok(())
    }
}
