//! Core seams of the route planner.
//!
//! Concrete directions services implement [`TravelCostProvider`]; ordering
//! heuristics implement [`RouteSolver`]. Neither knows about the other.

use serde::Serialize;
use tracing::warn;

use crate::error::{ProviderFailure, SolveError};
use crate::matrix::CostMatrix;
use crate::polyline::Polyline;
use crate::solver::Route;
use crate::stop::Position;

/// Road geometry plus traffic-aware travel time for one origin/destination
/// pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteQuote {
    pub path: Polyline,
    pub duration_secs: u64,
}

impl RouteQuote {
    /// Straight two-point path with zero duration, used when a query fails.
    pub fn degraded(origin: Position, destination: Position) -> Self {
        Self {
            path: Polyline::straight(origin.as_tuple(), destination.as_tuple()),
            duration_secs: 0,
        }
    }
}

/// A quote that is always usable, with the failure that forced a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub route: RouteQuote,
    pub failure: Option<ProviderFailure>,
}

impl Quote {
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

/// Travel-time and geometry lookups between two positions.
///
/// Each call reflects conditions at query time, so repeated calls for the
/// same pair may disagree.
pub trait TravelCostProvider {
    /// One round trip to the underlying service.
    fn fetch(&self, origin: Position, destination: Position) -> Result<RouteQuote, ProviderFailure>;

    /// Like [`fetch`](Self::fetch), but a failure becomes a degraded quote
    /// carrying the failure instead of an error.
    fn quote(&self, origin: Position, destination: Position) -> Quote {
        match self.fetch(origin, destination) {
            Ok(route) => Quote {
                route,
                failure: None,
            },
            Err(failure) => {
                warn!(
                    origin = ?origin.as_tuple(),
                    destination = ?destination.as_tuple(),
                    error = %failure,
                    "travel cost query failed, using straight-line fallback"
                );
                Quote {
                    route: RouteQuote::degraded(origin, destination),
                    failure: Some(failure),
                }
            }
        }
    }
}

impl<P: TravelCostProvider + ?Sized> TravelCostProvider for &P {
    fn fetch(&self, origin: Position, destination: Position) -> Result<RouteQuote, ProviderFailure> {
        (**self).fetch(origin, destination)
    }
}

/// Produces a visiting order from a cost matrix.
///
/// The returned route starts at index 0 (the depot) and visits every other
/// index once. Implementations must return [`SolveError::EmptyInput`] when
/// the matrix holds nothing but the depot.
pub trait RouteSolver {
    fn solve(&self, matrix: &CostMatrix) -> Result<Route, SolveError>;
}
