//! Straight-line travel cost provider (offline fallback).
//!
//! Uses great-circle distance and an assumed speed to estimate travel time.
//! Ignores roads and traffic but never fails.

use crate::error::ProviderFailure;
use crate::polyline::Polyline;
use crate::stop::Position;
use crate::traits::{RouteQuote, TravelCostProvider};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct StraightLineProvider {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLineProvider {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl StraightLineProvider {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two points in kilometers.
    pub fn haversine_km(from: Position, to: Position) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lng - from.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_seconds(&self, km: f64) -> u64 {
        let hours = km / self.speed_kmh;
        (hours * 3600.0).round() as u64
    }
}

impl TravelCostProvider for StraightLineProvider {
    fn fetch(&self, origin: Position, destination: Position) -> Result<RouteQuote, ProviderFailure> {
        let km = Self::haversine_km(origin, destination);
        Ok(RouteQuote {
            path: Polyline::straight(origin.as_tuple(), destination.as_tuple()),
            duration_secs: self.km_to_seconds(km),
        })
    }
}
