//! Trait implementations for faer dense matrices and plain vectors.
//!
//! `faer::Mat` doubles as the reference "sparse" matrix in tests and small
//! problems: its row iteration skips exact zeros, so it exposes the same
//! pattern a CSR matrix with the same non-zeros would. Inner products use
//! Rayon when the `rayon` feature is enabled.
//!
//! # References
//! - [faer crate documentation](https://docs.rs/faer)
//! - [num-traits crate documentation](https://docs.rs/num-traits)

use crate::core::traits::{InnerProduct, MatVec, RowEntries};
use faer::Mat;
use num_traits::Float;

/// Implements matrix-vector multiplication for `faer::Mat`.
///
/// Computes `y = A * x` where `A` is a dense matrix, `x` and `y` are vectors.
impl<T: Float> MatVec<Vec<T>> for Mat<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(self.nrows(), y.len(), "Output vector y has incorrect length");
        assert_eq!(self.ncols(), x.len(), "Input vector x has incorrect length");
        for i in 0..self.nrows() {
            y[i] = T::zero();
            for j in 0..self.ncols() {
                y[i] = y[i] + self[(i, j)] * x[j];
            }
        }
    }
}

/// Row view of a dense matrix; zero entries are not reported.
impl<T: Float> RowEntries<T> for Mat<T> {
    fn nrows(&self) -> usize {
        self.nrows()
    }
    fn ncols(&self) -> usize {
        self.ncols()
    }
    fn row(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        (0..self.ncols())
            .map(move |j| (j, self[(row, j)]))
            .filter(|&(_, v)| v != T::zero())
    }
}

/// Implements inner product and norm for vectors, with optional Rayon parallelism.
impl<T: Float + From<f64> + Send + Sync> InnerProduct<Vec<T>> for () {
    type Scalar = T;
    /// Computes the dot product of two vectors: `x^T y`.
    fn dot(&self, x: &Vec<T>, y: &Vec<T>) -> T {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.as_slice()
                .par_iter()
                .zip(y.as_slice().par_iter())
                .map(|(xi, yi)| *xi * *yi)
                .reduce(|| T::zero(), |acc, v| acc + v)
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter()
                .zip(y.iter())
                .map(|(xi, yi)| *xi * *yi)
                .fold(T::zero(), |acc, v| acc + v)
        }
    }
    /// Computes the Euclidean norm of a vector: `||x||_2`.
    fn norm(&self, x: &Vec<T>) -> T {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.as_slice()
                .par_iter()
                .map(|xi| *xi * *xi)
                .reduce(|| T::zero(), |acc, v| acc + v)
                .sqrt()
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter()
                .map(|xi| *xi * *xi)
                .fold(T::zero(), |acc, v| acc + v)
                .sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `Mat` has an inherent `row`, so the trait method is called explicitly.
    #[test]
    fn dense_row_skips_zeros() {
        let a = Mat::from_fn(3, 3, |i, j| if i == j { 2.0 } else if j == i + 1 { -1.0 } else { 0.0 });
        let row0: Vec<(usize, f64)> = RowEntries::row(&a, 0).collect();
        assert_eq!(row0, vec![(0, 2.0), (1, -1.0)]);
        let row2: Vec<(usize, f64)> = RowEntries::row(&a, 2).collect();
        assert_eq!(row2, vec![(2, 2.0)]);
    }
}
