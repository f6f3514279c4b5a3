// SparseMatrix trait and the CSR implementation over faer

use crate::core::traits::{MatVec, RowEntries};
use faer::sparse::{
    SparseRowMat,         // owning numeric CSR alias
    SymbolicSparseRowMat, // owning symbolic CSR alias
};
use faer::traits::ComplexField;

/// A read‐only sparse matrix supporting y = A * x.
pub trait SparseMatrix<T> {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Compute y = A * x.  `x.len() == ncols()`, `y.len() == nrows()`.
    fn spmv(&self, x: &[T], y: &mut [T]);
}

pub struct CsrMatrix<T> {
    inner: SparseRowMat<usize, T>,
}

impl<T: ComplexField + Copy + num_traits::Num> CsrMatrix<T> {
    /// Build a CSR from raw row‐ptr, col‐idx, and values.
    ///
    /// # Panics
    /// If the structure is inconsistent (faer's `new_checked`), e.g. a
    /// non-monotone `row_ptr` or a column index `>= ncols`.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        // Build symbolic structure; second argument `None` means “no separate row_nnz”:
        let symbolic = SymbolicSparseRowMat::new_checked(
            nrows,
            ncols,
            row_ptr,
            None, // optional row_nnz: Option<Vec<usize>>
            col_idx,
        );
        // Attach the numerical values:
        let inner = SparseRowMat::new(symbolic, values);
        Self { inner }
    }

    /// Build a CSR from `(row, col, value)` triplets. Duplicates are summed,
    /// columns end up sorted within each row.
    ///
    /// # Panics
    /// If a triplet lies outside `nrows x ncols`.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, T)]) -> Self {
        let mut sorted: Vec<(usize, usize, T)> = triplets.to_vec();
        sorted.sort_by_key(|&(i, j, _)| (i, j));
        let mut row_ptr = vec![0usize; nrows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<T> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;
        for (i, j, v) in sorted {
            assert!(i < nrows && j < ncols, "triplet ({i}, {j}) outside {nrows}x{ncols}");
            if last == Some((i, j)) {
                if let Some(acc) = values.last_mut() {
                    *acc = *acc + v;
                }
                continue;
            }
            col_idx.push(j);
            values.push(v);
            row_ptr[i + 1] += 1;
            last = Some((i, j));
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }
        Self::from_csr(nrows, ncols, row_ptr, col_idx, values)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        let a = self.inner.as_ref();
        (0..a.nrows()).map(|i| a.col_idx_of_row_raw(i).len()).sum()
    }
}

impl<T: ComplexField + Copy> RowEntries<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }
    fn row(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let a = self.inner.as_ref();
        a.col_idx_of_row_raw(row)
            .iter()
            .copied()
            .zip(a.val_of_row(row).iter().copied())
    }
}

impl<T: ComplexField + Copy + num_traits::Num> SparseMatrix<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }
    fn spmv(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), SparseMatrix::ncols(self));
        assert_eq!(y.len(), SparseMatrix::nrows(self));
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = self.row(i).fold(T::zero(), |acc, (j, v)| acc + v * x[j]);
        }
    }
}

impl<T: ComplexField + Copy + num_traits::Num> MatVec<Vec<T>> for CsrMatrix<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        self.spmv(x, y);
    }
}

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "rayon")]
impl<T: ComplexField + Copy + num_traits::Num + Send + Sync> CsrMatrix<T> {
    /// Parallel SpMV using Rayon
    pub fn spmv_parallel(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), SparseMatrix::ncols(self));
        assert_eq!(y.len(), SparseMatrix::nrows(self));
        y.par_iter_mut().enumerate().for_each(|(i, yi)| {
            *yi = self.row(i).fold(T::zero(), |acc, (j, v)| acc + v * x[j]);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_spmv() {
        // 3×3 identity in CSR: row_ptr=[0,1,2,3], col_idx=[0,1,2], vals=[1,1,1]
        let m = CsrMatrix::from_csr(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![1.0, 1.0, 1.0]);
        let x = vec![2.0, 3.0, 5.0];
        let mut y = vec![0.0; 3];
        m.spmv(&x, &mut y);
        assert_eq!(y, x);
    }

    #[test]
    fn simple_pattern() {
        // 2×3 matrix [[1,2,0],[0,3,4]]
        let m = CsrMatrix::from_csr(
            2, 3,
            vec![0, 2, 4],
            vec![0, 1, 1, 2],
            vec![1.0, 2.0, 3.0, 4.0],
        );
        let x = vec![1.0, 1.0, 1.0];
        let mut y = vec![0.0; 2];
        m.spmv(&x, &mut y);
        assert_eq!(y, vec![3.0, 7.0]);
        let row1: Vec<(usize, f64)> = m.row(1).collect();
        assert_eq!(row1, vec![(1, 3.0), (2, 4.0)]);
    }

    #[test]
    fn triplets_sum_duplicates() {
        let m = CsrMatrix::from_triplets(2, 2, &[(1, 1, 1.0), (0, 0, 2.0), (1, 1, 0.5), (0, 1, -1.0)]);
        assert_eq!(m.nnz(), 3);
        let row1: Vec<(usize, f64)> = m.row(1).collect();
        assert_eq!(row1, vec![(1, 1.5)]);
    }
}
