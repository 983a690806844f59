//----------------------------------------
// covariance mod types
//----------------------------------------
use nalgebra::DMatrix;

use crate::design::StatisticIndex;

/// Square, symmetric `(J*K) x (J*K)` matrix over the flat statistic layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    index: StatisticIndex,
    matrix: DMatrix<f64>,
}

impl CovarianceMatrix {
    pub(crate) fn from_matrix(index: StatisticIndex, matrix: DMatrix<f64>) -> Self {
        debug_assert_eq!(matrix.nrows(), index.len());
        debug_assert_eq!(matrix.ncols(), index.len());
        CovarianceMatrix { index, matrix }
    }

    pub fn index(&self) -> StatisticIndex {
        self.index
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Entry at flat positions `(a, b)`
    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.matrix[(a, b)]
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// The `J x J` block of one arm (zero-based), stages in order
    pub fn arm_block(&self, arm: usize) -> DMatrix<f64> {
        let block = self.index.arm_block(arm);
        self.matrix
            .view((block.start, block.start), (self.index.stages, self.index.stages))
            .into_owned()
    }

    /// Principal submatrix on the given flat positions, in the given order
    pub fn select(&self, positions: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(positions.len(), positions.len(), |i, j| {
            self.matrix[(positions[i], positions[j])]
        })
    }

    /// First off-diagonal pair `(row, col, |diff|)` with `row < col` whose
    /// entries differ by more than `tol`
    pub fn first_asymmetry(&self, tol: f64) -> Option<(usize, usize, f64)> {
        let n = self.dim();
        (0..n)
            .flat_map(|row| (row + 1..n).map(move |col| (row, col)))
            .map(|(row, col)| (row, col, (self.matrix[(row, col)] - self.matrix[(col, row)]).abs()))
            .find(|&(_, _, diff)| diff > tol)
    }
}
