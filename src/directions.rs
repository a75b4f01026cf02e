//! Google Directions API adapter.
//!
//! Stops are sent as addresses in the order given, with waypoint optimization
//! disabled. A response that reorders the waypoints anyway is rejected.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GoogleMapsConfig;
use crate::error::RenderFailure;
use crate::polyline::{POLYLINE5, Polyline};
use crate::route::RouteStops;
use crate::traits::{Directions, DirectionsLeg, DirectionsProvider};

#[derive(Debug, Clone)]
pub struct GoogleDirections {
    config: GoogleMapsConfig,
    client: reqwest::Client,
}

impl GoogleDirections {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

/// Query parameters for a driving route through `stops`, key excluded.
fn route_query(stops: &RouteStops) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("origin", stops.origin.clone()),
        ("destination", stops.destination.clone()),
        ("mode", "driving".to_string()),
    ];
    if !stops.waypoints.is_empty() {
        let waypoints = std::iter::once("optimize:false")
            .chain(stops.waypoints.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("|");
        query.push(("waypoints", waypoints));
    }
    query
}

#[async_trait]
impl DirectionsProvider for GoogleDirections {
    async fn directions(&self, stops: &RouteStops) -> Result<Directions, RenderFailure> {
        let mut query = route_query(stops);
        query.push(("key", self.config.api_key.clone()));

        debug!(stops = stops.len(), "requesting directions");

        let body = self
            .client
            .get(&self.config.directions_url)
            .query(&query)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                warn!(error = %self.config.redact(&err.to_string()), "directions request failed");
                RenderFailure::new("REQUEST_FAILED")
            })?
            .text()
            .await
            .map_err(|_| RenderFailure::new("REQUEST_FAILED"))?;

        parse_directions(&body, stops)
    }
}

fn parse_directions(body: &str, stops: &RouteStops) -> Result<Directions, RenderFailure> {
    let response: DirectionsResponse =
        serde_json::from_str(body).map_err(|_| RenderFailure::new("INVALID_RESPONSE"))?;

    if response.status != "OK" {
        if let Some(message) = &response.error_message {
            debug!(status = %response.status, %message, "directions refused");
        }
        return Err(RenderFailure::new(response.status));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RenderFailure::new("ZERO_RESULTS"))?;

    let in_order = route
        .waypoint_order
        .iter()
        .enumerate()
        .all(|(position, index)| position == *index);
    if !in_order {
        return Err(RenderFailure::new("WAYPOINTS_REORDERED"));
    }

    if route.legs.len() != stops.leg_count() {
        return Err(RenderFailure::new("LEG_COUNT_MISMATCH"));
    }

    let legs = route
        .legs
        .into_iter()
        .map(|leg| DirectionsLeg {
            start_label: leg.start_address,
            end_label: leg.end_address,
            distance_meters: leg.distance.map_or(0.0, |d| d.value),
            duration_seconds: leg.duration.map_or(0.0, |d| d.value),
        })
        .collect();

    let geometry = match route.overview_polyline {
        Some(overview) => Polyline::decode(&overview.points, POLYLINE5)?,
        None => Polyline::default(),
    };

    Ok(Directions { legs, geometry })
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<RouteLeg>,
    #[serde(default)]
    waypoint_order: Vec<usize>,
    overview_polyline: Option<OverviewPolyline>,
}

#[derive(Debug, Deserialize)]
struct RouteLeg {
    start_address: String,
    end_address: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}
