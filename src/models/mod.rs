//! Domain model types.
//!
//! - [`Stop`]: one waypoint with a stable identity and WGS84 coordinates
//! - [`OptimizationResult`]: the chosen tour, its strategy and its cost
//! - [`StrategyHint`] / [`Strategy`]: what the caller asked for and what ran
//! - [`TransportProfile`]: travel mode token and average speed

mod profile;
mod result;
mod stop;

pub use profile::{average_speed_for_token, TransportProfile, DEFAULT_SPEED_KMH};
pub use result::{OptimizationResult, Strategy, StrategyHint};
pub use stop::{Stop, StopId};
