//! Capability traits for the route planner.
//!
//! These are intentionally narrow. The orchestrator only ever talks to the
//! geocoder, the solver backend and the map through them, so tests and other
//! deployments can plug in their own implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GeocodeError, RenderFailure, SolveError};
use crate::polyline::Polyline;
use crate::route::{RenderedRoute, RouteRequest, RouteSolution, RouteStops};

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Resolves a human-readable address to a coordinate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

/// Orders a set of addresses using the strategy named in the request.
///
/// Implementations must return a permutation of `request.addresses`.
/// Results are not assumed to be repeatable across calls.
#[async_trait]
pub trait RouteSolver: Send + Sync {
    async fn solve(&self, request: &RouteRequest) -> Result<RouteSolution, SolveError>;
}

/// One leg as reported by a directions backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsLeg {
    pub start_label: String,
    pub end_label: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// A drivable path through the stops, in the order given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directions {
    pub legs: Vec<DirectionsLeg>,
    pub geometry: Polyline,
}

/// Computes driving directions through ordered stops.
///
/// Implementations must never reorder the stops.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn directions(&self, stops: &RouteStops) -> Result<Directions, RenderFailure>;
}

/// Where a map is mounted and what it initially shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub container_id: String,
    pub center: Coordinate,
    pub zoom: u8,
}

impl MapView {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            ..Self::default()
        }
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            container_id: "map".to_string(),
            center: Coordinate::new(37.3375381, -121.8897467),
            zoom: 15,
        }
    }
}

/// A labelled pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinate,
    pub label: String,
}

/// Façade over a mapping surface.
///
/// Lifecycle is driven by [`crate::map::MapHandle`]; implementations do not
/// guard against repeated initialization themselves.
#[async_trait]
pub trait MapCapability: Send {
    fn initialize(&mut self, view: &MapView);

    /// Appends a marker. No deduplication by coordinate.
    fn place_marker(&mut self, marker: Marker);

    fn clear_markers(&mut self);

    /// Draws a route through the stops in exactly the given order.
    async fn render_route(&mut self, stops: &RouteStops) -> Result<RenderedRoute, RenderFailure>;

    fn clear_route(&mut self);

    fn dispose(&mut self);
}
