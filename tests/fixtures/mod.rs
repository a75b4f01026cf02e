//! Test fixtures for route-planner.
//!
//! Provides:
//! - Downtown San Jose landmarks with addresses and coordinates
//! - Scripted fakes for the solver, geocoder and directions capabilities

#![allow(dead_code)]

pub mod san_jose_addresses;

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use route_planner::error::{GeocodeError, RenderFailure, SolveError};
use route_planner::polyline::Polyline;
use route_planner::route::{RouteRequest, RouteSolution, RouteStops};
use route_planner::traits::{
    Coordinate, Directions, DirectionsLeg, DirectionsProvider, Geocoder, RouteSolver,
};

pub use san_jose_addresses::*;

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn solution(ordered: &[&str], distance: f64, duration: f64) -> RouteSolution {
    RouteSolution {
        ordered_addresses: strings(ordered),
        total_distance_meters: distance,
        total_duration_seconds: duration,
    }
}

/// Answers solve calls from a queue and records every request.
#[derive(Default)]
pub struct ScriptedSolver {
    responses: Mutex<VecDeque<Result<RouteSolution, SolveError>>>,
    calls: Mutex<Vec<RouteRequest>>,
}

impl ScriptedSolver {
    pub fn new(responses: Vec<Result<RouteSolution, SolveError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RouteRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RouteSolver for ScriptedSolver {
    async fn solve(&self, request: &RouteRequest) -> Result<RouteSolution, SolveError> {
        self.calls.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(SolveError::Transport("no scripted response".to_string())))
    }
}

/// Resolves addresses from a fixed table and records lookups.
#[derive(Default)]
pub struct LookupGeocoder {
    table: HashMap<String, Coordinate>,
    calls: Mutex<Vec<String>>,
}

impl LookupGeocoder {
    pub fn with_landmarks() -> Self {
        let mut table: HashMap<String, Coordinate> = LANDMARKS
            .iter()
            .map(|landmark| {
                (
                    landmark.address.to_string(),
                    Coordinate::new(landmark.lat, landmark.lng),
                )
            })
            .collect();
        table.insert(
            FIXED_START.address.to_string(),
            Coordinate::new(FIXED_START.lat, FIXED_START.lng),
        );
        Self {
            table,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(mut self, address: &str, lat: f64, lng: f64) -> Self {
        self.table.insert(address.to_string(), Coordinate::new(lat, lng));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for LookupGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.calls.lock().unwrap().push(address.to_string());
        self.table
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound {
                address: address.to_string(),
            })
    }
}

/// Joins consecutive stops with fixed-length legs labelled by the stop text,
/// or fails with a fixed status.
#[derive(Default)]
pub struct EchoDirections {
    pub fail_with: Option<&'static str>,
}

impl EchoDirections {
    pub fn failing(status: &'static str) -> Self {
        Self {
            fail_with: Some(status),
        }
    }
}

#[async_trait]
impl DirectionsProvider for EchoDirections {
    async fn directions(&self, stops: &RouteStops) -> Result<Directions, RenderFailure> {
        if let Some(status) = self.fail_with {
            return Err(RenderFailure::new(status));
        }
        let labels: Vec<&str> = stops.iter().collect();
        let legs = labels
            .windows(2)
            .map(|pair| DirectionsLeg {
                start_label: pair[0].to_string(),
                end_label: pair[1].to_string(),
                distance_meters: 1000.0,
                duration_seconds: 120.0,
            })
            .collect();
        Ok(Directions {
            legs,
            geometry: Polyline::default(),
        })
    }
}
