//! Travel modes.

use std::fmt;
use std::str::FromStr;

/// Average speed used for tokens no profile recognizes.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Travel mode, named by its routing-service token.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportProfile {
    #[default]
    DrivingCar,
    DrivingHgv,
    CyclingRegular,
    FootWalking,
}

impl TransportProfile {
    pub const ALL: [TransportProfile; 4] = [
        TransportProfile::DrivingCar,
        TransportProfile::DrivingHgv,
        TransportProfile::CyclingRegular,
        TransportProfile::FootWalking,
    ];

    /// Token understood by the routing collaborator.
    pub fn token(self) -> &'static str {
        match self {
            TransportProfile::DrivingCar => "driving-car",
            TransportProfile::DrivingHgv => "driving-hgv",
            TransportProfile::CyclingRegular => "cycling-regular",
            TransportProfile::FootWalking => "foot-walking",
        }
    }

    /// Average urban speed in km/h.
    pub fn average_speed_kmh(self) -> f64 {
        match self {
            TransportProfile::DrivingCar => 30.0,
            TransportProfile::DrivingHgv => 25.0,
            TransportProfile::CyclingRegular => 15.0,
            TransportProfile::FootWalking => 5.0,
        }
    }

    /// Minutes needed to cover `distance_km` at the average speed.
    pub fn travel_minutes(self, distance_km: f64) -> f64 {
        distance_km / self.average_speed_kmh() * 60.0
    }
}

impl fmt::Display for TransportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TransportProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransportProfile::ALL
            .into_iter()
            .find(|p| p.token() == s)
            .ok_or_else(|| format!("unknown transport profile: {s}"))
    }
}

/// Average speed for any travel-mode token, known or not.
pub fn average_speed_for_token(token: &str) -> f64 {
    token
        .parse::<TransportProfile>()
        .map_or(DEFAULT_SPEED_KMH, TransportProfile::average_speed_kmh)
}
