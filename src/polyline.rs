//! Polyline representation for route geometries.
//!
//! Directions responses carry geometry in the encoded polyline format; it is
//! decoded here at the boundary and the rest of the crate works with
//! coordinate pairs.

use serde::{Deserialize, Serialize};

use crate::error::PolylineError;

/// Precision of the encoded polyline format used by Google Directions.
pub const DEFAULT_PRECISION: u32 = 5;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    ///
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Two-point path drawn directly from `origin` to `destination`.
    pub fn straight(origin: (f64, f64), destination: (f64, f64)) -> Self {
        Self {
            points: vec![origin, destination],
        }
    }

    /// Decode a polyline at the default precision of 5 decimal places.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        Self::decode_with_precision(encoded, DEFAULT_PRECISION)
    }

    /// Decode a polyline encoded with `precision` decimal places.
    pub fn decode_with_precision(encoded: &str, precision: u32) -> Result<Self, PolylineError> {
        let factor = 10_f64.powi(precision as i32);
        let bytes = encoded.as_bytes();
        let mut points = Vec::new();
        let mut cursor = 0;
        let mut lat = 0i64;
        let mut lng = 0i64;

        while cursor < bytes.len() {
            lat = accumulate(lat, bytes, &mut cursor)?;
            lng = accumulate(lng, bytes, &mut cursor)?;
            points.push((lat as f64 / factor, lng as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }
}

/// Add the next delta to a running coordinate.
fn accumulate(sum: i64, bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let position = *cursor;
    let delta = next_delta(bytes, cursor)?;
    sum.checked_add(delta).ok_or(PolylineError::Overflow { position })
}

/// Read one zig-zag encoded varint starting at `cursor`.
fn next_delta(bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let mut shift = 0;
    let mut result = 0i64;
    loop {
        let position = *cursor;
        let byte = *bytes.get(position).ok_or(PolylineError::Truncated(position))?;
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(PolylineError::InvalidByte { byte, position });
        }
        let chunk = i64::from(byte - 63);
        *cursor += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}
