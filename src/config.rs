//! Startup configuration.
//!
//! The Google Maps API key is the only required setting; everything else has
//! a default matching a local solver backend.

use crate::error::ConfigError;
use crate::route::Strategy;

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const SOLVER_URL_VAR: &str = "ROUTE_SOLVER_URL";
pub const SOLVER_FIELD_VAR: &str = "ROUTE_SOLVER_FIELD";
pub const SOLVER_TIMEOUT_VAR: &str = "ROUTE_SOLVER_TIMEOUT_SECS";
pub const FIXED_ORIGIN_VAR: &str = "ROUTE_PLANNER_FIXED_ORIGIN";

#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    pub api_key: String,
    pub geocode_url: String,
    pub directions_url: String,
    pub timeout_secs: u64,
}

impl GoogleMapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            directions_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            timeout_secs: 10,
        }
    }

    /// Replaces the key in a URL or message before it is logged.
    pub fn redact(&self, text: &str) -> String {
        if self.api_key.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.api_key, "***")
        }
    }
}

/// Route-solver backend. Each strategy is its own endpoint.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub base_url: String,
    pub greedy_path: String,
    pub mst_path: String,
    /// JSON field carrying the address list (`locations` or `addresses`).
    pub request_field: String,
    pub timeout_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            greedy_path: "greedy".to_string(),
            mst_path: "kruskal".to_string(),
            request_field: "locations".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SolverConfig {
    pub fn endpoint(&self, strategy: Strategy) -> String {
        let path = match strategy {
            Strategy::Greedy => &self.greedy_path,
            Strategy::Mst => &self.mst_path,
        };
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub google: GoogleMapsConfig,
    pub solver: SolverConfig,
    pub fixed_origin: Option<String>,
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let mut solver = SolverConfig::default();
        if let Some(url) = non_empty(SOLVER_URL_VAR) {
            solver.base_url = url;
        }
        if let Some(field) = non_empty(SOLVER_FIELD_VAR) {
            solver.request_field = field;
        }
        if let Some(raw) = non_empty(SOLVER_TIMEOUT_VAR) {
            solver.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                var: SOLVER_TIMEOUT_VAR,
                value: raw.clone(),
            })?;
        }

        Ok(Self {
            google: GoogleMapsConfig::new(api_key),
            solver,
            fixed_origin: non_empty(FIXED_ORIGIN_VAR),
        })
    }
}
