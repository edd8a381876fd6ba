//! Visiting-order heuristics over a [`CostMatrix`].

use tracing::debug;

use crate::error::SolveError;
use crate::matrix::CostMatrix;
use crate::traits::RouteSolver;

/// A visiting order: a permutation of point indices starting at the depot.
///
/// Open path, no return leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    order: Vec<usize>,
}

impl Route {
    /// Check that `order` visits every index in `0..point_count` exactly once,
    /// depot first.
    pub fn new(order: Vec<usize>, point_count: usize) -> Result<Self, SolveError> {
        let mut seen = vec![false; point_count];
        let valid = order.len() == point_count
            && order.first() == Some(&0)
            && order.iter().all(|&index| {
                index < point_count && !std::mem::replace(&mut seen[index], true)
            });

        if valid {
            Ok(Self { order })
        } else {
            Err(SolveError::InvalidOrder(point_count))
        }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Number of points visited, depot included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consecutive (origin, destination) index pairs.
    pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.order.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Sum of the matrix costs along the route.
    pub fn total_cost(&self, matrix: &CostMatrix) -> u64 {
        path_cost(&self.order, matrix)
    }
}

fn path_cost(order: &[usize], matrix: &CostMatrix) -> u64 {
    order
        .windows(2)
        .map(|pair| matrix.get(pair[0], pair[1]))
        .sum()
}

fn require_stops(matrix: &CostMatrix) -> Result<(), SolveError> {
    if matrix.size() < 2 {
        return Err(SolveError::EmptyInput);
    }
    Ok(())
}

/// Greedy nearest-neighbor ordering from the depot.
///
/// Ties go to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl RouteSolver for NearestNeighbor {
    fn solve(&self, matrix: &CostMatrix) -> Result<Route, SolveError> {
        require_stops(matrix)?;

        let n = matrix.size();
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut current = 0;
        visited[0] = true;
        order.push(0);

        while order.len() < n {
            let next = matrix
                .row(current)
                .iter()
                .enumerate()
                .filter(|(index, _)| !visited[*index])
                .min_by_key(|(_, cost)| **cost)
                .map(|(index, _)| index)
                .ok_or(SolveError::InvalidOrder(n))?;

            visited[next] = true;
            order.push(next);
            current = next;
        }

        debug!(points = n, cost = path_cost(&order, matrix), "nearest-neighbor route");
        Route::new(order, n)
    }
}

/// Local improvement layered over another solver.
///
/// Repeatedly reverses a stretch of stops when that strictly lowers the
/// route cost. The depot never moves and no return leg is counted.
#[derive(Debug, Clone)]
pub struct TwoOpt<S> {
    base: S,
    max_iterations: usize,
}

impl<S: RouteSolver> TwoOpt<S> {
    pub fn new(base: S) -> Self {
        Self {
            base,
            max_iterations: 100,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl<S: RouteSolver> RouteSolver for TwoOpt<S> {
    fn solve(&self, matrix: &CostMatrix) -> Result<Route, SolveError> {
        let mut order = self.base.solve(matrix)?.order;
        let before = path_cost(&order, matrix);

        for _ in 0..self.max_iterations {
            if !two_opt_improve(&mut order, matrix) {
                break;
            }
        }

        debug!(before, after = path_cost(&order, matrix), "2-opt pass finished");
        Route::new(order, matrix.size())
    }
}

/// Apply the first improving reversal of `order[i..=j]` (i >= 1).
/// Returns true if an improvement was made.
fn two_opt_improve(order: &mut [usize], matrix: &CostMatrix) -> bool {
    let n = order.len();
    if n < 3 {
        return false;
    }

    let current = path_cost(order, matrix);
    for i in 1..n - 1 {
        for j in i + 1..n {
            // Costs are directional, so the whole path is re-priced.
            order[i..=j].reverse();
            if path_cost(order, matrix) < current {
                return true;
            }
            order[i..=j].reverse();
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<u64>>) -> CostMatrix {
        CostMatrix::from_rows(rows).expect("square matrix")
    }

    #[test]
    fn route_rejects_non_permutations() {
        assert!(Route::new(vec![0, 1, 2], 3).is_ok());
        assert_eq!(Route::new(vec![1, 0, 2], 3), Err(SolveError::InvalidOrder(3)));
        assert_eq!(Route::new(vec![0, 1, 1], 3), Err(SolveError::InvalidOrder(3)));
        assert_eq!(Route::new(vec![0, 1], 3), Err(SolveError::InvalidOrder(3)));
        assert_eq!(Route::new(vec![0, 1, 3], 3), Err(SolveError::InvalidOrder(3)));
    }

    #[test]
    fn depot_only_is_empty_input() {
        assert_eq!(NearestNeighbor.solve(&matrix(vec![vec![0]])), Err(SolveError::EmptyInput));
        assert_eq!(NearestNeighbor.solve(&matrix(vec![])), Err(SolveError::EmptyInput));
    }

    #[test]
    fn single_stop() {
        let route = NearestNeighbor.solve(&matrix(vec![vec![0, 7], vec![7, 0]])).expect("route");
        assert_eq!(route.order(), &[0, 1]);
    }

    #[test]
    fn follows_directional_costs() {
        // 0 -> 2 is cheapest, then 2 -> 1 (1 -> 2 would be expensive).
        let m = matrix(vec![
            vec![0, 50, 10],
            vec![50, 0, 90],
            vec![10, 5, 0],
        ]);
        let route = NearestNeighbor.solve(&m).expect("route");
        assert_eq!(route.order(), &[0, 2, 1]);
        assert_eq!(route.total_cost(&m), 15);
        assert_eq!(route.legs().collect::<Vec<_>>(), vec![(0, 2), (2, 1)]);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let m = matrix(vec![vec![0, 5, 5], vec![5, 0, 5], vec![5, 5, 0]]);
        assert_eq!(NearestNeighbor.solve(&m).expect("route").order(), &[0, 1, 2]);
    }

    #[test]
    fn two_opt_fixes_greedy_trap() {
        // Greedy goes 0 -> 1 -> 2 -> 3 at cost 1 + 1 + 100; 0 -> 1 -> 3 -> 2
        // costs 1 + 50 + 1.
        let m = matrix(vec![
            vec![0, 1, 2, 50],
            vec![1, 0, 1, 50],
            vec![2, 1, 0, 100],
            vec![50, 50, 1, 0],
        ]);
        let greedy = NearestNeighbor.solve(&m).expect("greedy");
        let improved = TwoOpt::new(NearestNeighbor).solve(&m).expect("2-opt");
        assert_eq!(improved.order()[0], 0);
        assert!(improved.total_cost(&m) < greedy.total_cost(&m));
    }

    #[test]
    fn two_opt_with_zero_iterations_is_base_solver() {
        let m = matrix(vec![
            vec![0, 1, 2, 50],
            vec![1, 0, 1, 50],
            vec![2, 1, 0, 100],
            vec![50, 50, 1, 0],
        ]);
        let base = NearestNeighbor.solve(&m).expect("greedy");
        let layered = TwoOpt::new(NearestNeighbor)
            .with_max_iterations(0)
            .solve(&m)
            .expect("layered");
        assert_eq!(base, layered);
    }
}
