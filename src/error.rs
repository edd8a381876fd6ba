//! Error taxonomy for the route planner.
//!
//! Validation, matrix, and solver errors abort an optimization run.
//! [`ProviderFailure`] never does: it travels next to a degraded quote so the
//! caller can surface it as a warning.

use thiserror::Error;

/// Malformed or out-of-range stop data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("stop {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("stop {index}: name must not be empty")]
    EmptyName { index: usize },

    #[error("stop `{name}`: latitude {lat} outside [-90, 90]")]
    LatitudeOutOfRange { name: String, lat: f64 },

    #[error("stop `{name}`: longitude {lng} outside [-180, 180]")]
    LongitudeOutOfRange { name: String, lng: f64 },

    #[error("stop `{name}`: weight {weight} must be finite and non-negative")]
    InvalidWeight { name: String, weight: f64 },

    #[error("stop name `{0}` is not unique")]
    DuplicateName(String),

    #[error("cannot parse `{0}` as \"lat,lng\"")]
    MalformedPosition(String),
}

/// Failure to decode an encoded polyline string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("polyline truncated at byte {0}")]
    Truncated(usize),

    #[error("invalid polyline byte {byte:#04x} at {position}")]
    InvalidByte { byte: u8, position: usize },

    #[error("polyline coordinate overflows at byte {position}")]
    Overflow { position: usize },
}

/// A single travel-cost query that did not produce a real quote.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderFailure {
    #[error("directions status {status}: {}", .message.as_deref().unwrap_or("no error message provided"))]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("directions request failed: {0}")]
    Transport(String),

    #[error("malformed directions response: {0}")]
    MalformedResponse(String),

    #[error("undecodable route geometry: {0}")]
    Polyline(#[from] PolylineError),
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(err: reqwest::Error) -> Self {
        ProviderFailure::Transport(err.to_string())
    }
}

/// Cost matrix construction failed its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("row {row} has {len} entries, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    #[error("no travel cost recorded for {origin} -> {destination}")]
    Unpopulated { origin: usize, destination: usize },
}

/// Errors from [`crate::traits::RouteSolver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("no stops to order")]
    EmptyInput,

    #[error("visiting order is not a permutation of 0..{0} starting at the depot")]
    InvalidOrder(usize),
}

/// Segment lookups against the solved route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("stop `{0}` is not on the route")]
    NotFound(String),

    #[error("stop `{0}` is the last stop and has no outgoing segment")]
    TerminalStop(String),
}

/// Anything that aborts [`crate::planner::RoutePlanner::optimize`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingApiKey(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_failure_mentions_missing_message() {
        let failure = ProviderFailure::Status {
            status: "ZERO_RESULTS".to_string(),
            message: None,
        };
        assert_eq!(
            failure.to_string(),
            "directions status ZERO_RESULTS: no error message provided"
        );
    }

    #[test]
    fn plan_error_is_transparent() {
        let err = PlanError::from(SolveError::EmptyInput);
        assert_eq!(err.to_string(), "no stops to order");
    }
}
