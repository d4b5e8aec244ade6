//! OpenRouteService directions client.

use std::future::Future;

use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{RouteError, RouteProvider, RoutedLeg};
use crate::models::Stop;

/// Public OpenRouteService endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    summary: Summary,
}

/// Metres and seconds.
#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

/// Parses a GeoJSON directions body into a leg.
///
/// A body without features means no route was found.
pub fn parse_directions(body: &str) -> Result<RoutedLeg, RouteError> {
    let response: DirectionsResponse =
        serde_json::from_str(body).map_err(|e| RouteError::InvalidResponse(e.to_string()))?;
    let feature = response.features.first().ok_or(RouteError::Unavailable)?;
    let summary = &feature.properties.summary;
    Ok(RoutedLeg {
        distance_km: summary.distance / 1000.0,
        duration_min: summary.duration / 60.0,
    })
}

/// Directions client for one API key.
///
/// Without a key every call reports [`RouteError::Unavailable`] without
/// touching the network, so callers always get the geometric fallback.
#[derive(Debug, Clone)]
pub struct OrsClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OrsClient {
    /// Client against [`DEFAULT_BASE_URL`]. Blank keys count as missing.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at another deployment.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn directions_url(&self, profile: &str) -> String {
        format!("{}/v2/directions/{}", self.base_url, profile)
    }

    async fn fetch(&self, from: &Stop, to: &Stop, profile: &str) -> Result<RoutedLeg, RouteError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(RouteError::Unavailable);
        };

        let start = format!("{},{}", from.lng, from.lat);
        let end = format!("{},{}", to.lng, to.lat);
        let response = self
            .client
            .get(self.directions_url(profile))
            .query(&[("api_key", key), ("start", start.as_str()), ("end", end.as_str())])
            .send()
            .await
            .map_err(|e| RouteError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RouteError::RateLimited);
        }
        if !status.is_success() {
            debug!("directions request returned {status}");
            return Err(RouteError::Transport(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RouteError::Transport(e.to_string()))?;
        parse_directions(&body)
    }
}

impl RouteProvider for OrsClient {
    fn route(
        &self,
        from: &Stop,
        to: &Stop,
        profile: &str,
    ) -> impl Future<Output = Result<RoutedLeg, RouteError>> + Send {
        self.fetch(from, to, profile)
    }
}
