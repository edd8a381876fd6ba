//! Segment-addressable views over a solved route.
//!
//! Segments are never stored. Each access re-queries the travel cost
//! provider, so geometry and durations reflect traffic at access time.

use serde::Serialize;

use crate::error::{ProviderFailure, SegmentError};
use crate::planner::OptimizedRoute;
use crate::polyline::Polyline;
use crate::stop::Stop;
use crate::traits::TravelCostProvider;

/// Upper bound (exclusive) of the low tier, in seconds.
const LOW_LIMIT_SECS: u64 = 600;
/// Upper bound (exclusive) of the medium tier, in seconds.
const MEDIUM_LIMIT_SECS: u64 = 1800;

/// Three-bucket traffic classification of a segment, for presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficSeverity {
    Low,
    Medium,
    High,
}

impl TrafficSeverity {
    pub fn from_duration_secs(duration_secs: u64) -> Self {
        if duration_secs < LOW_LIMIT_SECS {
            TrafficSeverity::Low
        } else if duration_secs < MEDIUM_LIMIT_SECS {
            TrafficSeverity::Medium
        } else {
            TrafficSeverity::High
        }
    }

    /// Line colour used when drawing the segment on a map.
    pub fn color(&self) -> &'static str {
        match self {
            TrafficSeverity::Low => "green",
            TrafficSeverity::Medium => "yellow",
            TrafficSeverity::High => "red",
        }
    }
}

/// A resolved hop between two consecutive route stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    pub path: Polyline,
    pub duration_secs: u64,
    pub severity: TrafficSeverity,
    /// Why the path is a straight-line fallback, if it is one.
    #[serde(skip)]
    pub failure: Option<ProviderFailure>,
}

impl Segment {
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

/// An unresolved hop: just the two endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Leg<'a> {
    pub origin: &'a Stop,
    pub destination: &'a Stop,
}

impl Leg<'_> {
    /// Query `provider` for this hop right now.
    pub fn resolve<P>(&self, provider: &P) -> Segment
    where
        P: TravelCostProvider + ?Sized,
    {
        let quote = provider.quote(self.origin.position, self.destination.position);
        Segment {
            origin: self.origin.name.clone(),
            destination: self.destination.name.clone(),
            severity: TrafficSeverity::from_duration_secs(quote.route.duration_secs),
            duration_secs: quote.route.duration_secs,
            path: quote.route.path,
            failure: quote.failure,
        }
    }
}

/// Read access to a solved route, one segment at a time or all at once.
pub struct RouteAccessor<'a, P: ?Sized> {
    run: &'a OptimizedRoute,
    provider: &'a P,
}

impl<'a, P> RouteAccessor<'a, P>
where
    P: TravelCostProvider + ?Sized,
{
    pub fn new(run: &'a OptimizedRoute, provider: &'a P) -> Self {
        Self { run, provider }
    }

    /// Stops in visiting order, depot first.
    pub fn stops(&self) -> Vec<&'a Stop> {
        let run: &'a OptimizedRoute = self.run;
        let points = run.points();
        run.route().order().iter().map(|&index| &points[index]).collect()
    }

    /// Names of stops that have an outgoing segment, in visiting order.
    pub fn selectable_stops(&self) -> Vec<&'a str> {
        let count = self.run.route().len().saturating_sub(1);
        self.stops()
            .into_iter()
            .take(count)
            .map(|stop| stop.name.as_str())
            .collect()
    }

    /// Unresolved hops in visiting order.
    pub fn legs(&self) -> Vec<Leg<'a>> {
        let run: &'a OptimizedRoute = self.run;
        let points = run.points();
        run.route()
            .legs()
            .map(|(from, to)| Leg {
                origin: &points[from],
                destination: &points[to],
            })
            .collect()
    }

    /// Every segment of the route, each resolved now.
    pub fn full_route(&self) -> Vec<Segment> {
        self.legs()
            .iter()
            .map(|leg| leg.resolve(self.provider))
            .collect()
    }

    /// The segment leaving the stop called `name`.
    pub fn segment_from(&self, name: &str) -> Result<Segment, SegmentError> {
        let stops = self.stops();
        let position = stops
            .iter()
            .position(|stop| stop.name == name)
            .ok_or_else(|| SegmentError::NotFound(name.to_string()))?;
        let destination = stops
            .get(position + 1)
            .copied()
            .ok_or_else(|| SegmentError::TerminalStop(name.to_string()))?;

        let leg = Leg {
            origin: stops[position],
            destination,
        };
        Ok(leg.resolve(self.provider))
    }
}
