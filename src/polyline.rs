//! Polyline representation for route geometries.
//!
//! Routes are drawn from decoded coordinate sequences. Directions backends
//! return the compact encoded format, which is decoded at that boundary.

use serde::{Deserialize, Serialize};

use crate::error::RenderFailure;
use crate::traits::Coordinate;

/// Precision used by Google and by OSRM's `geometries=polyline`.
pub const POLYLINE5: u32 = 5;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Decodes an encoded polyline string with the given precision.
    pub fn decode(encoded: &str, precision: u32) -> Result<Self, RenderFailure> {
        let factor = 10_f64.powi(precision as i32);
        let mut bytes = encoded.bytes();
        let mut points = Vec::new();
        let (mut lat, mut lng) = (0_i64, 0_i64);

        loop {
            let delta_lat = match next_value(&mut bytes)? {
                Some(value) => value,
                None => break,
            };
            let delta_lng = next_value(&mut bytes)?.ok_or_else(truncated)?;
            lat += delta_lat;
            lng += delta_lng;
            points.push(Coordinate::new(lat as f64 / factor, lng as f64 / factor));
        }

        Ok(Self { points })
    }
}

fn truncated() -> RenderFailure {
    RenderFailure::new("INVALID_POLYLINE")
}

/// Reads one zig-zag encoded varint. `None` at clean end of input.
fn next_value(bytes: &mut impl Iterator<Item = u8>) -> Result<Option<i64>, RenderFailure> {
    let mut result: i64 = 0;
    let mut shift = 0;
    let mut started = false;

    for byte in bytes {
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(truncated());
        }
        started = true;
        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            let value = if result & 1 == 1 { !(result >> 1) } else { result >> 1 };
            return Ok(Some(value));
        }
    }

    if started { Err(truncated()) } else { Ok(None) }
}
