//! Stop registry: validated delivery stops and the depot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// (lat, lng) tuple, the order used by [`crate::polyline::Polyline`].
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Parse a composite `"lat,lng"` column value.
    pub fn parse_composite(value: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedPosition(value.to_string());
        let (lat, lng) = value.split_once(',').ok_or_else(malformed)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| malformed())?;
        Ok(Self { lat, lng })
    }
}

impl From<(f64, f64)> for Position {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// A validated customer stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub position: Position,
    /// Sales/priority value. Carried for future prioritisation; the solver
    /// does not read it.
    pub weight: f64,
}

/// The fixed start of every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    stop: Stop,
}

impl Depot {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            stop: Stop {
                name: name.into(),
                position,
                weight: 0.0,
            },
        }
    }

    /// The default warehouse the fleet departs from.
    pub fn warehouse() -> Self {
        Self::new("Warehouse", Position::new(6.189746, 125.089500))
    }

    pub fn name(&self) -> &str {
        &self.stop.name
    }

    pub fn position(&self) -> Position {
        self.stop.position
    }

    pub fn as_stop(&self) -> &Stop {
        &self.stop
    }
}

/// An unvalidated stop as supplied by the stop source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopCandidate {
    pub name: Option<String>,
    pub position: Option<Position>,
    pub weight: Option<f64>,
}

impl StopCandidate {
    pub fn new(name: impl Into<String>, position: Position, weight: f64) -> Self {
        Self {
            name: Some(name.into()),
            position: Some(position),
            weight: Some(weight),
        }
    }

    /// Build a candidate from a tabular record whose position column holds
    /// `"lat,lng"`.
    pub fn from_record(
        name: impl Into<String>,
        composite_position: &str,
        sales: f64,
    ) -> Result<Self, ValidationError> {
        let position = Position::parse_composite(composite_position)?;
        Ok(Self::new(name, position, sales))
    }
}

/// Validate candidates in order, failing on the first bad record.
///
/// Names must be unique within the batch. Use [`validate_stops_for`] to also
/// reserve the depot's name.
pub fn validate_stops(candidates: &[StopCandidate]) -> Result<Vec<Stop>, ValidationError> {
    validate_with_reserved(candidates, None)
}

/// Like [`validate_stops`], but a stop may not share the depot's name.
pub fn validate_stops_for(
    depot: &Depot,
    candidates: &[StopCandidate],
) -> Result<Vec<Stop>, ValidationError> {
    validate_with_reserved(candidates, Some(depot.name()))
}

fn validate_with_reserved(
    candidates: &[StopCandidate],
    reserved: Option<&str>,
) -> Result<Vec<Stop>, ValidationError> {
    let mut seen: HashSet<&str> = reserved.into_iter().collect();
    let mut stops = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        let name = candidate
            .name
            .as_deref()
            .ok_or(ValidationError::MissingField { index, field: "name" })?;
        let position = candidate
            .position
            .ok_or(ValidationError::MissingField { index, field: "position" })?;
        let weight = candidate
            .weight
            .ok_or(ValidationError::MissingField { index, field: "weight" })?;

        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName { index });
        }
        // NaN fails both range checks.
        if !(-90.0..=90.0).contains(&position.lat) {
            return Err(ValidationError::LatitudeOutOfRange {
                name: name.to_string(),
                lat: position.lat,
            });
        }
        if !(-180.0..=180.0).contains(&position.lng) {
            return Err(ValidationError::LongitudeOutOfRange {
                name: name.to_string(),
                lng: position.lng,
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidWeight {
                name: name.to_string(),
                weight,
            });
        }
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }

        stops.push(Stop {
            name: name.to_string(),
            position,
            weight,
        });
    }

    Ok(stops)
}
