//! Error taxonomy for the route planner.
//!
//! Each capability seam has its own error type; [`PlanError`] is what the
//! orchestrator surfaces for a failed user action.

use thiserror::Error;

/// Errors raised by [`crate::address::AddressListStore`] edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("at least {minimum} address entries must remain")]
    BelowMinimum { minimum: usize },
}

/// Failure to resolve an address to a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("address '{address}' matched {candidates} candidates")]
    AmbiguousAddress { address: String, candidates: usize },

    #[error("address '{address}' was not found")]
    NotFound { address: String },

    #[error("geocoding provider failed with {status}")]
    Provider {
        status: String,
        message: Option<String>,
    },
}

impl GeocodeError {
    /// Provider-style status string, as shown to the user.
    pub fn status(&self) -> &str {
        match self {
            GeocodeError::AmbiguousAddress { .. } => "AMBIGUOUS_ADDRESS",
            GeocodeError::NotFound { .. } => "ZERO_RESULTS",
            GeocodeError::Provider { status, .. } => status,
        }
    }
}

/// Failure of the route-optimization backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("at least two locations are required, found {found}")]
    InsufficientLocations { found: usize },

    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with `success: false`; the message is kept verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("malformed solver response: {0}")]
    MalformedResponse(String),
}

/// The directions backend could not produce a drivable path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("directions request failed due to {status}")]
pub struct RenderFailure {
    pub status: String,
}

impl RenderFailure {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

impl From<GeocodeError> for RenderFailure {
    fn from(err: GeocodeError) -> Self {
        RenderFailure::new(err.status())
    }
}

/// Error surfaced by a [`crate::planner::RoutePlanner`] action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("at least two locations are required, found {found}")]
    InsufficientLocations { found: usize },

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Render(#[from] RenderFailure),

    #[error("map has not been initialized")]
    MapNotInitialized,
}

/// Fatal startup configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {var} has invalid value '{value}'")]
    InvalidVar { var: &'static str, value: String },
}
