//! Property-based tests for the route solvers.
//!
//! # Invariants tested
//!
//! - **Permutation:** the route has n+1 entries, starts at the depot, and
//!   visits every index exactly once.
//! - **Determinism:** solving the same matrix twice gives the same route.
//! - **No regression:** the 2-opt layer never returns a costlier route than
//!   the solver it wraps.

use std::collections::HashSet;

use proptest::prelude::*;
use truck_route_planner::matrix::CostMatrix;
use truck_route_planner::solver::{NearestNeighbor, Route, TwoOpt};
use truck_route_planner::traits::RouteSolver;

/// Square matrices of 2..=12 points with arbitrary directional costs.
fn matrix_strategy() -> impl Strategy<Value = CostMatrix> {
    (2usize..=12).prop_flat_map(|size| {
        prop::collection::vec(prop::collection::vec(1u64..10_000, size), size).prop_map(|rows| {
            CostMatrix::from_rows(rows).expect("generated rows are square")
        })
    })
}

fn assert_permutation(route: &Route, size: usize) {
    let order = route.order();
    assert_eq!(order.len(), size);
    assert_eq!(order[0], 0);
    let unique: HashSet<_> = order.iter().copied().collect();
    assert_eq!(unique.len(), size, "duplicate index in {:?}", order);
    assert!(order.iter().all(|&index| index < size));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn nearest_neighbor_returns_permutation(matrix in matrix_strategy()) {
        let route = NearestNeighbor.solve(&matrix).expect("at least one stop");
        assert_permutation(&route, matrix.size());
    }

    #[test]
    fn nearest_neighbor_is_deterministic(matrix in matrix_strategy()) {
        let first = NearestNeighbor.solve(&matrix).expect("solve");
        let second = NearestNeighbor.solve(&matrix).expect("solve");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn two_opt_never_worsens_route(matrix in matrix_strategy()) {
        let greedy = NearestNeighbor.solve(&matrix).expect("solve");
        let improved = TwoOpt::new(NearestNeighbor).solve(&matrix).expect("solve");
        assert_permutation(&improved, matrix.size());
        prop_assert!(improved.total_cost(&matrix) <= greedy.total_cost(&matrix));
    }
}

#[test]
fn first_step_takes_unique_minimum() {
    let matrix = CostMatrix::from_rows(vec![
        vec![0, 500, 1000],
        vec![9_999, 0, 200],
        vec![9_999, 300, 0],
    ])
    .expect("square");
    let route = NearestNeighbor.solve(&matrix).expect("solve");
    assert_eq!(route.order(), &[0, 1, 2]);
}
