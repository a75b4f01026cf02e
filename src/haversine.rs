//! Straight-line directions (fallback when no road router is available).
//!
//! Uses great-circle distance to estimate leg length and travel time.
//! Less accurate than a road router (ignores roads) but always available.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RenderFailure;
use crate::polyline::Polyline;
use crate::route::RouteStops;
use crate::traits::{Coordinate, Directions, DirectionsLeg, DirectionsProvider, Geocoder};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine-based directions provider.
///
/// Geocodes every stop, then joins consecutive stops with straight segments
/// travelled at an assumed speed.
pub struct StraightLineDirections<G> {
    geocoder: Arc<G>,
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl<G: Geocoder> StraightLineDirections<G> {
    pub fn new(geocoder: Arc<G>) -> Self {
        Self::with_speed(geocoder, DEFAULT_SPEED_KMH)
    }

    pub fn with_speed(geocoder: Arc<G>, speed_kmh: f64) -> Self {
        Self {
            geocoder,
            speed_kmh,
        }
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> f64 {
        let hours = km / self.speed_kmh;
        (hours * 3600.0).round()
    }
}

#[async_trait]
impl<G: Geocoder> DirectionsProvider for StraightLineDirections<G> {
    async fn directions(&self, stops: &RouteStops) -> Result<Directions, RenderFailure> {
        let mut resolved = Vec::with_capacity(stops.len());
        for stop in stops.iter() {
            let coordinate = self.geocoder.resolve(stop).await?;
            resolved.push((stop, coordinate));
        }

        let legs = resolved
            .windows(2)
            .map(|pair| {
                let (start, from) = pair[0];
                let (end, to) = pair[1];
                let km = haversine_km(from, to);
                DirectionsLeg {
                    start_label: start.to_string(),
                    end_label: end.to_string(),
                    distance_meters: (km * 1000.0).round(),
                    duration_seconds: self.km_to_seconds(km),
                }
            })
            .collect();

        let geometry = Polyline::new(resolved.iter().map(|(_, point)| *point).collect());

        Ok(Directions { legs, geometry })
    }
}
