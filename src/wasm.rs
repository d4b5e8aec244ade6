//! Browser bindings.
//!
//! Stops cross the boundary as plain objects
//! `{ id, lat, lng, label? }` where `id` is a number or a string.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::geo::RoadDistance;
use crate::legs::{route_legs, RouteLeg, RouteSummary};
use crate::models::{Stop, StrategyHint, TransportProfile};
use crate::optimizer::{OptimizeRequest, OptimizerConfig, RouteOptimizer};

/// Optimized tour with its estimated leg statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoutePlan {
    tour: Vec<Stop>,
    strategy: &'static str,
    cost_km: f64,
    legs: Vec<RouteLeg>,
    summary: RouteSummary,
}

#[derive(Debug, Serialize)]
struct RouteStatistics {
    legs: Vec<RouteLeg>,
    summary: RouteSummary,
}

fn plan(stops: &[Stop], algorithm: &str, profile: &str, seed: u64) -> Result<RoutePlan, String> {
    let hint: StrategyHint = algorithm.parse()?;
    let distance = RoadDistance::default();
    let optimizer = RouteOptimizer::new(OptimizerConfig::default().with_seed(seed));

    let result = optimizer
        .optimize(&OptimizeRequest::new(stops, &distance).with_hint(hint))
        .map_err(|e| e.to_string())?;
    let stats = statistics(result.tour(), profile)?;

    Ok(RoutePlan {
        strategy: result.strategy().label(),
        cost_km: result.cost_km(),
        tour: result.into_tour(),
        legs: stats.legs,
        summary: stats.summary,
    })
}

/// Unknown profile tokens are timed at the default car speed.
fn statistics(tour: &[Stop], profile: &str) -> Result<RouteStatistics, String> {
    let profile: TransportProfile = profile.parse().unwrap_or_default();
    let legs = route_legs(tour, &RoadDistance::default(), profile).map_err(|e| e.to_string())?;
    let summary = RouteSummary::from_legs(tour.len(), &legs);
    Ok(RouteStatistics { legs, summary })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Optimizes `stops` with the named algorithm (`tsp`, `nearestNeighbor`,
/// `genetic`, `exact`) and returns the tour with leg statistics.
///
/// Each call draws a fresh random seed.
#[wasm_bindgen(js_name = optimizeRoute)]
pub fn optimize_route(stops: JsValue, algorithm: &str, profile: &str) -> Result<JsValue, JsValue> {
    let stops: Vec<Stop> =
        serde_wasm_bindgen::from_value(stops).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let plan = plan(&stops, algorithm, profile, rand::random()).map_err(|e| JsValue::from_str(&e))?;
    to_js(&plan)
}

/// Leg statistics for a tour already in its final order.
#[wasm_bindgen(js_name = routeStatistics)]
pub fn route_statistics(tour: JsValue, profile: &str) -> Result<JsValue, JsValue> {
    let tour: Vec<Stop> =
        serde_wasm_bindgen::from_value(tour).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let stats = statistics(&tour, profile).map_err(|e| JsValue::from_str(&e))?;
    to_js(&stats)
}
