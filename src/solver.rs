//! HTTP client for the route-optimization backend.
//!
//! Each strategy is served by its own endpoint. The request body carries the
//! addresses under a configurable field; the response is
//! `{"success": bool, "orderedLocations": [...], "totalDistance": m, "totalDuration": s}`
//! or `{"success": false, "message": "..."}`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::route::{RouteRequest, RouteSolution};
use crate::traits::RouteSolver;

#[derive(Debug, Clone)]
pub struct HttpRouteSolver {
    config: SolverConfig,
    client: reqwest::Client,
}

impl HttpRouteSolver {
    pub fn new(config: SolverConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn request_body(&self, request: &RouteRequest) -> Value {
        let mut body = Map::new();
        body.insert(
            self.config.request_field.clone(),
            Value::from(request.addresses.clone()),
        );
        Value::Object(body)
    }
}

#[async_trait]
impl RouteSolver for HttpRouteSolver {
    async fn solve(&self, request: &RouteRequest) -> Result<RouteSolution, SolveError> {
        if request.addresses.len() < 2 {
            return Err(SolveError::InsufficientLocations {
                found: request.addresses.len(),
            });
        }

        let url = self.config.endpoint(request.strategy);
        debug!(%url, stops = request.addresses.len(), "submitting route request");

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|err| SolveError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "route solver returned an error status");
            return Err(SolveError::Transport(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|err| SolveError::Transport(err.to_string()))?;

        let solution = parse_solution(&body)?;
        solution.ensure_permutation_of(request)?;

        info!(
            strategy = %request.strategy,
            distance_m = solution.total_distance_meters,
            duration_s = solution.total_duration_seconds,
            "route solved"
        );
        Ok(solution)
    }
}

/// Parses a solver response body. Absent totals default to zero.
pub fn parse_solution(body: &str) -> Result<RouteSolution, SolveError> {
    let response: SolverResponse = serde_json::from_str(body)
        .map_err(|err| SolveError::MalformedResponse(err.to_string()))?;

    match response.success {
        None => Err(SolveError::MalformedResponse(
            "missing 'success' flag".to_string(),
        )),
        Some(false) => Err(SolveError::Rejected(
            response
                .message
                .unwrap_or_else(|| "route calculation failed".to_string()),
        )),
        Some(true) => {
            let ordered_addresses = response.ordered_locations.ok_or_else(|| {
                SolveError::MalformedResponse("missing 'orderedLocations'".to_string())
            })?;

            if response.total_distance.is_none() || response.total_duration.is_none() {
                debug!("solver response without totals, defaulting to zero");
            }

            Ok(RouteSolution {
                ordered_addresses,
                total_distance_meters: response.total_distance.unwrap_or(0.0),
                total_duration_seconds: response.total_duration.unwrap_or(0.0),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolverResponse {
    success: Option<bool>,
    message: Option<String>,
    ordered_locations: Option<Vec<String>>,
    total_distance: Option<f64>,
    total_duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Strategy;

    #[test]
    fn parses_success_with_totals() {
        let body = r#"{"success": true, "orderedLocations": ["123 Main St", "456 Oak Ave"], "totalDistance": 5000, "totalDuration": 600}"#;
        let solution = parse_solution(body).unwrap();
        assert_eq!(solution.ordered_addresses, vec!["123 Main St", "456 Oak Ave"]);
        assert_eq!(solution.total_distance_meters, 5000.0);
        assert_eq!(solution.total_duration_seconds, 600.0);
    }

    #[test]
    fn missing_totals_default_to_zero() {
        let body = r#"{"success": true, "orderedLocations": ["a", "b"]}"#;
        let solution = parse_solution(body).unwrap();
        assert_eq!(solution.total_distance_meters, 0.0);
        assert_eq!(solution.total_duration_seconds, 0.0);
    }

    #[test]
    fn failure_message_is_passed_through() {
        let body = r#"{"success": false, "message": "address not found"}"#;
        assert_eq!(
            parse_solution(body),
            Err(SolveError::Rejected("address not found".to_string()))
        );
    }

    #[test]
    fn malformed_bodies() {
        for body in [
            "not json",
            r#"{"orderedLocations": ["a", "b"]}"#,
            r#"{"success": true, "totalDistance": 1}"#,
            r#"{"success": true, "orderedLocations": "a,b"}"#,
        ] {
            assert!(
                matches!(parse_solution(body), Err(SolveError::MalformedResponse(_))),
                "expected malformed for {}",
                body
            );
        }
    }

    #[test]
    fn body_uses_configured_field() {
        let solver = HttpRouteSolver::new(SolverConfig {
            request_field: "addresses".to_string(),
            ..SolverConfig::default()
        })
        .unwrap();
        let request = RouteRequest {
            addresses: vec!["a".to_string(), "b".to_string()],
            strategy: Strategy::Greedy,
        };
        assert_eq!(
            solver.request_body(&request),
            serde_json::json!({"addresses": ["a", "b"]})
        );
    }

    #[tokio::test]
    async fn too_few_locations_fail_without_network() {
        // Port 9 (discard) is never contacted: the precondition fails first.
        let solver = HttpRouteSolver::new(SolverConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..SolverConfig::default()
        })
        .unwrap();
        let request = RouteRequest {
            addresses: vec!["only one".to_string()],
            strategy: Strategy::Mst,
        };
        assert_eq!(
            solver.solve(&request).await,
            Err(SolveError::InsufficientLocations { found: 1 })
        );
    }
}
