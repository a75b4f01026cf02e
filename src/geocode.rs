//! Google Geocoding API adapter.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GoogleMapsConfig;
use crate::error::GeocodeError;
use crate::traits::{Coordinate, Geocoder};

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    config: GoogleMapsConfig,
    client: reqwest::Client,
}

impl GoogleGeocoder {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        debug!(%address, "geocoding");

        let body = self
            .client
            .get(&self.config.geocode_url)
            .query(&[("address", address), ("key", self.config.api_key.as_str())])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| request_failed(&self.config, err))?
            .text()
            .await
            .map_err(|err| request_failed(&self.config, err))?;

        parse_geocode(address, &body)
    }
}

fn request_failed(config: &GoogleMapsConfig, err: reqwest::Error) -> GeocodeError {
    let message = config.redact(&err.to_string());
    warn!(error = %message, "geocoding request failed");
    GeocodeError::Provider {
        status: "REQUEST_FAILED".to_string(),
        message: Some(message),
    }
}

/// Interprets a Geocoding API response for `address`.
///
/// More than one candidate is only ambiguous when the best one is a partial
/// match; otherwise the first candidate wins.
fn parse_geocode(address: &str, body: &str) -> Result<Coordinate, GeocodeError> {
    let response: GeocodeResponse =
        serde_json::from_str(body).map_err(|err| GeocodeError::Provider {
            status: "INVALID_RESPONSE".to_string(),
            message: Some(err.to_string()),
        })?;

    if response.status == "ZERO_RESULTS" {
        return Err(GeocodeError::NotFound {
            address: address.to_string(),
        });
    }
    if response.status != "OK" {
        return Err(GeocodeError::Provider {
            status: response.status,
            message: response.error_message,
        });
    }

    let first = response.results.first().ok_or_else(|| GeocodeError::NotFound {
        address: address.to_string(),
    })?;

    if response.results.len() > 1 && first.partial_match {
        return Err(GeocodeError::AmbiguousAddress {
            address: address.to_string(),
            candidates: response.results.len(),
        });
    }

    let location = first.geometry.location;
    Ok(Coordinate::new(location.lat, location.lng))
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
    #[serde(default)]
    partial_match: bool,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}
