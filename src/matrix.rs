//! Pairwise travel-cost matrix over the depot and its stops.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{MatrixError, ProviderFailure};
use crate::stop::Stop;
use crate::traits::{Quote, TravelCostProvider};

/// Square, directional table of travel times in seconds.
///
/// Index 0 is the depot; `get(i, j)` is the cost of driving from point `i`
/// to point `j`. The diagonal is always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<u64>,
}

impl CostMatrix {
    /// Build from precomputed rows. Diagonal entries are ignored.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            cells.extend(values);
        }
        for i in 0..size {
            cells[i * size + i] = 0;
        }
        Ok(Self { size, cells })
    }

    /// Build from optional cells, rejecting any off-diagonal gap.
    fn from_quoted(size: usize, cells: Vec<Option<u64>>) -> Result<Self, MatrixError> {
        let mut filled = Vec::with_capacity(cells.len());
        for (k, cell) in cells.into_iter().enumerate() {
            let (origin, destination) = (k / size, k % size);
            match cell {
                _ if origin == destination => filled.push(0),
                Some(value) => filled.push(value),
                None => return Err(MatrixError::Unpopulated { origin, destination }),
            }
        }
        Ok(Self {
            size,
            cells: filled,
        })
    }

    /// Number of points, depot included.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, origin: usize, destination: usize) -> u64 {
        self.cells[origin * self.size + destination]
    }

    pub fn row(&self, origin: usize) -> &[u64] {
        &self.cells[origin * self.size..(origin + 1) * self.size]
    }
}

/// How provider calls are issued while building a matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildStrategy {
    /// One call at a time, in row-major order.
    #[default]
    Sequential,
    /// Calls spread over the rayon thread pool.
    Parallel,
}

/// A pair whose quote degraded during matrix construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PairWarning {
    pub origin: usize,
    pub destination: usize,
    pub failure: ProviderFailure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBuild {
    pub matrix: CostMatrix,
    pub warnings: Vec<PairWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct CostMatrixBuilder {
    strategy: BuildStrategy,
}

impl CostMatrixBuilder {
    pub fn new(strategy: BuildStrategy) -> Self {
        Self { strategy }
    }

    /// Query `provider` for every ordered off-diagonal pair of `points`.
    ///
    /// Failed queries contribute their degraded duration and a
    /// [`PairWarning`]; they never abort the build.
    pub fn build<P>(&self, points: &[Stop], provider: &P) -> Result<MatrixBuild, MatrixError>
    where
        P: TravelCostProvider + Sync + ?Sized,
    {
        let size = points.len();
        let pairs: Vec<(usize, usize)> = (0..size)
            .flat_map(|i| (0..size).filter(move |&j| j != i).map(move |j| (i, j)))
            .collect();

        debug!(points = size, queries = pairs.len(), strategy = ?self.strategy, "building cost matrix");

        let quote = |&(i, j): &(usize, usize)| -> (usize, usize, Quote) {
            (i, j, provider.quote(points[i].position, points[j].position))
        };
        let quotes: Vec<(usize, usize, Quote)> = match self.strategy {
            BuildStrategy::Sequential => pairs.iter().map(quote).collect(),
            BuildStrategy::Parallel => pairs.par_iter().map(quote).collect(),
        };

        let mut cells = vec![None; size * size];
        let mut warnings = Vec::new();
        for (origin, destination, quote) in quotes {
            cells[origin * size + destination] = Some(quote.route.duration_secs);
            if let Some(failure) = quote.failure {
                warnings.push(PairWarning {
                    origin,
                    destination,
                    failure,
                });
            }
        }

        let matrix = CostMatrix::from_quoted(size, cells)?;
        Ok(MatrixBuild { matrix, warnings })
    }
}
