//! Route request, solution and rendered-route types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// Heuristic used by the external solver to order stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Greedy nearest-neighbour ordering.
    Greedy,
    /// Minimum-spanning-tree based ordering.
    Mst,
}

impl Strategy {
    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::Greedy => "Greedy TSP",
            Strategy::Mst => "Kruskal TSP",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Strategy::Greedy),
            "mst" | "kruskal" => Ok(Strategy::Mst),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub addresses: Vec<String>,
    pub strategy: Strategy,
}

impl RouteRequest {
    /// Builds a request from raw entries, dropping blanks and prepending the
    /// fixed origin when one is configured.
    pub fn from_entries<S: AsRef<str>>(
        fixed_origin: Option<&str>,
        entries: &[S],
        strategy: Strategy,
    ) -> Self {
        let addresses = fixed_origin
            .into_iter()
            .chain(entries.iter().map(|entry| entry.as_ref()))
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            addresses,
            strategy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSolution {
    pub ordered_addresses: Vec<String>,
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
}

impl RouteSolution {
    /// Checks that the solution reorders the request without adding or
    /// dropping stops.
    pub fn ensure_permutation_of(&self, request: &RouteRequest) -> Result<(), SolveError> {
        if self.ordered_addresses.len() != request.addresses.len() {
            return Err(SolveError::MalformedResponse(format!(
                "expected {} ordered locations, got {}",
                request.addresses.len(),
                self.ordered_addresses.len()
            )));
        }

        let mut expected: Vec<&str> = request.addresses.iter().map(String::as_str).collect();
        let mut actual: Vec<&str> = self.ordered_addresses.iter().map(String::as_str).collect();
        expected.sort_unstable();
        actual.sort_unstable();

        if expected != actual {
            return Err(SolveError::MalformedResponse(
                "ordered locations are not a permutation of the request".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ordered stops handed to the directions backend. Order is preserved exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStops {
    pub origin: String,
    pub waypoints: Vec<String>,
    pub destination: String,
}

impl RouteStops {
    /// Returns `None` for fewer than two stops.
    pub fn from_ordered(addresses: &[String]) -> Option<Self> {
        match addresses {
            [origin, middle @ .., destination] => Some(Self {
                origin: origin.clone(),
                waypoints: middle.to_vec(),
                destination: destination.clone(),
            }),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.origin.as_str())
            .chain(self.waypoints.iter().map(String::as_str))
            .chain(std::iter::once(self.destination.as_str()))
    }

    pub fn len(&self) -> usize {
        self.waypoints.len() + 2
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn leg_count(&self) -> usize {
        self.len() - 1
    }
}

/// One drivable segment between consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// 1-based position in the route.
    pub step: usize,
    pub start_label: String,
    pub end_label: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedRoute {
    pub legs: Vec<Leg>,
}

impl RenderedRoute {
    pub fn distance_meters(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.legs.iter().map(|leg| leg.duration_seconds).sum()
    }
}
