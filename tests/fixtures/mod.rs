//! Test fixtures for truck-route-planner.
//!
//! Provides:
//! - Sample stops around the default warehouse
//! - A scripted travel cost provider with per-pair durations and failures

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use truck_route_planner::error::ProviderFailure;
use truck_route_planner::polyline::Polyline;
use truck_route_planner::stop::{Depot, Position, StopCandidate};
use truck_route_planner::traits::{RouteQuote, TravelCostProvider};

pub const DEPOT: (f64, f64) = (6.1897, 125.0895);
pub const STOP_A: (f64, f64) = (6.20, 125.10);
pub const STOP_B: (f64, f64) = (6.15, 125.05);

/// Duration for pairs nobody scripted.
pub const UNSCRIPTED_SECS: u64 = 5_000;

pub fn depot() -> Depot {
    Depot::new("Warehouse", DEPOT.into())
}

pub fn two_stops() -> Vec<StopCandidate> {
    vec![
        StopCandidate::new("A", STOP_A.into(), 10.0),
        StopCandidate::new("B", STOP_B.into(), 50.0),
    ]
}

fn location_key(location: (f64, f64)) -> String {
    format!("{:.6},{:.6}", location.0, location.1)
}

fn key(from: (f64, f64), to: (f64, f64)) -> (String, String) {
    (location_key(from), location_key(to))
}

/// Road geometry the scripted provider returns: origin, a midpoint, destination.
pub fn road_path(origin: (f64, f64), destination: (f64, f64)) -> Vec<(f64, f64)> {
    let mid = (
        (origin.0 + destination.0) / 2.0,
        (origin.1 + destination.1) / 2.0 + 0.001,
    );
    vec![origin, mid, destination]
}

enum Scripted {
    Duration(u64),
    Failure(ProviderFailure),
}

/// In-memory provider answering from a per-pair script.
#[derive(Default)]
pub struct ScriptedProvider {
    script: HashMap<(String, String), Scripted>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, from: (f64, f64), to: (f64, f64), secs: u64) -> Self {
        self.script.insert(key(from, to), Scripted::Duration(secs));
        self
    }

    pub fn failure(mut self, from: (f64, f64), to: (f64, f64)) -> Self {
        let failure = ProviderFailure::Status {
            status: "ZERO_RESULTS".to_string(),
            message: None,
        };
        self.script.insert(key(from, to), Scripted::Failure(failure));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TravelCostProvider for ScriptedProvider {
    fn fetch(&self, origin: Position, destination: Position) -> Result<RouteQuote, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (from, to) = (origin.as_tuple(), destination.as_tuple());
        let duration_secs = match self.script.get(&key(from, to)) {
            Some(Scripted::Failure(failure)) => return Err(failure.clone()),
            Some(Scripted::Duration(secs)) => *secs,
            None => UNSCRIPTED_SECS,
        };
        Ok(RouteQuote {
            path: Polyline::new(road_path(from, to)),
            duration_secs,
        })
    }
}

/// The worked example: Depot->A 500s, Depot->B 1000s, A->B 200s, B->A 300s.
pub fn worked_example() -> ScriptedProvider {
    ScriptedProvider::new()
        .duration(DEPOT, STOP_A, 500)
        .duration(DEPOT, STOP_B, 1000)
        .duration(STOP_A, STOP_B, 200)
        .duration(STOP_B, STOP_A, 300)
}
