//! OSRM HTTP adapter for driving directions.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RenderFailure;
use crate::polyline::{POLYLINE5, Polyline};
use crate::route::RouteStops;
use crate::traits::{Coordinate, Directions, DirectionsLeg, DirectionsProvider, Geocoder};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Directions from an OSRM `route` service.
///
/// OSRM routes coordinates, so stops are geocoded first. Leg labels are the
/// stop addresses as given.
#[derive(Debug, Clone)]
pub struct OsrmDirections<G> {
    config: OsrmConfig,
    client: reqwest::Client,
    geocoder: Arc<G>,
}

impl<G: Geocoder> OsrmDirections<G> {
    pub fn new(config: OsrmConfig, geocoder: Arc<G>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            geocoder,
        })
    }

    fn route_url(&self, coordinates: &[Coordinate]) -> String {
        let coords = coordinates
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline&steps=false",
            self.config.base_url, self.config.profile, coords
        )
    }
}

#[async_trait]
impl<G: Geocoder> DirectionsProvider for OsrmDirections<G> {
    async fn directions(&self, stops: &RouteStops) -> Result<Directions, RenderFailure> {
        let mut coordinates = Vec::with_capacity(stops.len());
        for stop in stops.iter() {
            coordinates.push(self.geocoder.resolve(stop).await?);
        }

        let url = self.route_url(&coordinates);
        debug!(%url, "requesting OSRM route");

        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                warn!(error = %err, "OSRM request failed");
                RenderFailure::new("REQUEST_FAILED")
            })?
            .text()
            .await
            .map_err(|_| RenderFailure::new("REQUEST_FAILED"))?;

        let labels: Vec<&str> = stops.iter().collect();
        parse_route(&body, &labels)
    }
}

fn parse_route(body: &str, labels: &[&str]) -> Result<Directions, RenderFailure> {
    let response: OsrmRouteResponse =
        serde_json::from_str(body).map_err(|_| RenderFailure::new("INVALID_RESPONSE"))?;

    if response.code != "Ok" {
        if let Some(message) = &response.message {
            debug!(code = %response.code, %message, "OSRM refused route");
        }
        return Err(RenderFailure::new(response.code));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RenderFailure::new("ZERO_RESULTS"))?;

    if route.legs.len() != labels.len().saturating_sub(1) {
        return Err(RenderFailure::new("LEG_COUNT_MISMATCH"));
    }

    let legs = route
        .legs
        .iter()
        .zip(labels.windows(2))
        .map(|(leg, pair)| DirectionsLeg {
            start_label: pair[0].to_string(),
            end_label: pair[1].to_string(),
            distance_meters: leg.distance,
            duration_seconds: leg.duration,
        })
        .collect();

    let geometry = match route.geometry {
        Some(encoded) => Polyline::decode(&encoded, POLYLINE5)?,
        None => Polyline::default(),
    };

    Ok(Directions { legs, geometry })
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: Option<String>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
}
