//! One optimization run: validate, build the cost matrix, solve.

use tracing::info;

use crate::error::{PlanError, SolveError};
use crate::matrix::{BuildStrategy, CostMatrix, CostMatrixBuilder, PairWarning};
use crate::route::RouteAccessor;
use crate::solver::{NearestNeighbor, Route};
use crate::stop::{Depot, Stop, StopCandidate, validate_stops_for};
use crate::traits::{RouteSolver, TravelCostProvider};

/// Everything a run produced. Immutable; a new run supersedes it.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedRoute {
    points: Vec<Stop>,
    matrix: CostMatrix,
    route: Route,
    warnings: Vec<PairWarning>,
}

impl OptimizedRoute {
    /// The point set the matrix is indexed by: depot, then stops in input
    /// order.
    pub fn points(&self) -> &[Stop] {
        &self.points
    }

    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Pairs whose quotes degraded while building the matrix.
    pub fn warnings(&self) -> &[PairWarning] {
        &self.warnings
    }

    /// Stops in visiting order, depot first.
    pub fn ordered_stops(&self) -> Vec<&Stop> {
        self.route
            .order()
            .iter()
            .map(|&index| &self.points[index])
            .collect()
    }

    /// Route cost in seconds according to the matrix.
    pub fn total_cost(&self) -> u64 {
        self.route.total_cost(&self.matrix)
    }
}

#[derive(Debug, Clone)]
pub struct RoutePlanner<P, S = NearestNeighbor> {
    provider: P,
    solver: S,
    builder: CostMatrixBuilder,
}

impl<P> RoutePlanner<P, NearestNeighbor>
where
    P: TravelCostProvider + Sync,
{
    pub fn new(provider: P) -> Self {
        Self::with_solver(provider, NearestNeighbor)
    }
}

impl<P, S> RoutePlanner<P, S>
where
    P: TravelCostProvider + Sync,
    S: RouteSolver,
{
    pub fn with_solver(provider: P, solver: S) -> Self {
        Self {
            provider,
            solver,
            builder: CostMatrixBuilder::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: BuildStrategy) -> Self {
        self.builder = CostMatrixBuilder::new(strategy);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Validate `candidates`, then plan a route through them from `depot`.
    pub fn optimize(
        &self,
        depot: &Depot,
        candidates: &[StopCandidate],
    ) -> Result<OptimizedRoute, PlanError> {
        let stops = validate_stops_for(depot, candidates)?;
        self.optimize_stops(depot, stops)
    }

    /// Plan a route through already-validated stops.
    pub fn optimize_stops(&self, depot: &Depot, stops: Vec<Stop>) -> Result<OptimizedRoute, PlanError> {
        if stops.is_empty() {
            return Err(SolveError::EmptyInput.into());
        }

        let mut points = Vec::with_capacity(stops.len() + 1);
        points.push(depot.as_stop().clone());
        points.extend(stops);

        let build = self.builder.build(&points, &self.provider)?;
        let route = self.solver.solve(&build.matrix)?;
        // A pluggable solver may hand back a route sized for another matrix.
        let route = Route::new(route.order().to_vec(), points.len())?;

        let run = OptimizedRoute {
            points,
            matrix: build.matrix,
            route,
            warnings: build.warnings,
        };
        info!(
            stops = run.points.len() - 1,
            warnings = run.warnings.len(),
            cost_secs = run.total_cost(),
            "route optimized"
        );
        Ok(run)
    }

    /// Segment access to `run` through this planner's provider.
    pub fn accessor<'a>(&'a self, run: &'a OptimizedRoute) -> RouteAccessor<'a, P> {
        RouteAccessor::new(run, &self.provider)
    }
}
