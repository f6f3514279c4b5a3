//! Diagonal-block extraction and inversion.
//!
//! For every block of a [`BlockPartition`] the square sub-matrix formed by
//! its rows and columns is copied into a dense `faer::Mat` and inverted with
//! one of three methods:
//!
//! - Gauss-Jordan: explicit inverse with partial pivoting. A (numerically)
//!   zero pivot is an error; there is no fallback.
//! - Householder: QR factorization (faer), applied by solving in place. A
//!   zero diagonal entry of R is an error, judged like a Gauss-Jordan pivot.
//! - SVD (faer): pseudo-inverse `V Σ⁺ Uᵀ`, where singular values below the
//!   threshold are dropped. This is the robust choice for blocks that may be
//!   singular.
//!
//! Blocks are independent, so with the `rayon` feature the inversions run
//! in parallel.
//!
//! # References
//! - Golub & Van Loan, Matrix Computations, §3.2, §5.2, §5.5

use std::fmt;
use std::str::FromStr;

use faer::linalg::solvers::{Qr, SolveCore, Svd};
use faer::{Conj, Mat, MatMut};
use tracing::{debug, warn};

use crate::core::traits::RowEntries;
use crate::error::KError;
use crate::preconditioner::block_list::BlockPartition;

/// Relative pivot size below which Gauss-Jordan declares a block singular.
const PIVOT_TOLERANCE: f64 = 1.0e-14;

/// Numerical method used to invert the diagonal blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionMethod {
    #[default]
    GaussJordan,
    Householder,
    Svd,
}

impl FromStr for InversionMethod {
    type Err = KError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gauss_jordan" | "gauss-jordan" | "gj" => Ok(Self::GaussJordan),
            "householder" | "qr" => Ok(Self::Householder),
            "svd" => Ok(Self::Svd),
            other => Err(KError::InvalidConfig(format!("unknown inversion method '{other}'"))),
        }
    }
}

impl fmt::Display for InversionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GaussJordan => "gauss_jordan",
            Self::Householder => "householder",
            Self::Svd => "svd",
        };
        f.write_str(name)
    }
}

/// The stored inverse of one diagonal block.
pub enum BlockInverse {
    /// Explicit dense inverse (Gauss-Jordan, and every empty block).
    Dense(Mat<f64>),
    /// Householder QR factorization of the block.
    Householder { qr: Qr<f64>, size: usize },
    /// Truncated SVD: the applied operator is `v · diag(inv_sigma) · uᵀ`.
    Svd {
        u: Mat<f64>,
        inv_sigma: Vec<f64>,
        v: Mat<f64>,
    },
}

impl BlockInverse {
    /// Dimension of the block.
    pub fn size(&self) -> usize {
        match self {
            Self::Dense(inv) => inv.nrows(),
            Self::Householder { size, .. } => *size,
            Self::Svd { inv_sigma, .. } => inv_sigma.len(),
        }
    }

    /// Rank of the applied inverse. Only SVD truncation makes it smaller
    /// than the block size.
    pub fn rank(&self) -> usize {
        match self {
            Self::Svd { inv_sigma, .. } => inv_sigma.iter().filter(|&&s| s != 0.0).count(),
            _ => self.size(),
        }
    }

    /// `dst = B⁻¹ src`.
    pub fn vmult(&self, dst: &mut [f64], src: &[f64]) {
        let n = self.size();
        debug_assert_eq!(dst.len(), n);
        debug_assert_eq!(src.len(), n);
        if n == 0 {
            return;
        }
        match self {
            Self::Dense(inv) => {
                for (i, di) in dst.iter_mut().enumerate() {
                    *di = (0..n).map(|j| inv[(i, j)] * src[j]).sum();
                }
            }
            Self::Householder { qr, .. } => {
                dst.copy_from_slice(src);
                let x_mat = MatMut::from_column_major_slice_mut(dst, n, 1);
                qr.solve_in_place_with_conj(Conj::No, x_mat);
            }
            Self::Svd { u, inv_sigma, v } => {
                let coeff: Vec<f64> = inv_sigma
                    .iter()
                    .enumerate()
                    .map(|(k, &s)| {
                        if s == 0.0 {
                            0.0
                        } else {
                            s * (0..n).map(|i| u[(i, k)] * src[i]).sum::<f64>()
                        }
                    })
                    .collect();
                for (j, dj) in dst.iter_mut().enumerate() {
                    *dj = (0..n).map(|k| v[(j, k)] * coeff[k]).sum();
                }
            }
        }
    }

    /// Materialize the applied inverse as a dense matrix.
    pub fn to_dense(&self) -> Mat<f64> {
        let n = self.size();
        let mut out = Mat::<f64>::zeros(n, n);
        let mut e = vec![0.0; n];
        let mut col = vec![0.0; n];
        for j in 0..n {
            e.iter_mut().for_each(|x| *x = 0.0);
            e[j] = 1.0;
            self.vmult(&mut col, &e);
            for i in 0..n {
                out[(i, j)] = col[i];
            }
        }
        out
    }
}

impl fmt::Debug for BlockInverse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Dense(_) => "Dense",
            Self::Householder { .. } => "Householder",
            Self::Svd { .. } => "Svd",
        };
        write!(f, "BlockInverse::{kind}(size={}, rank={})", self.size(), self.rank())
    }
}

/// Largest entry magnitude; pivots are judged relative to it.
fn max_abs(a: &Mat<f64>) -> f64 {
    (0..a.nrows())
        .flat_map(|i| (0..a.ncols()).map(move |j| (i, j)))
        .fold(0.0_f64, |m, (i, j)| m.max(a[(i, j)].abs()))
}

/// Explicit inverse by Gauss-Jordan elimination with partial pivoting.
///
/// Returns the column of the first pivot that is zero relative to the
/// largest entry of `a`.
pub fn gauss_jordan(a: &Mat<f64>) -> Result<Mat<f64>, usize> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Gauss-Jordan needs a square matrix");
    let mut lhs = a.clone();
    let mut inv = Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 });
    let scale = max_abs(a);

    for k in 0..n {
        let (p, pmax) = (k..n)
            .map(|i| (i, lhs[(i, k)].abs()))
            .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if !(pmax > PIVOT_TOLERANCE * scale) {
            return Err(k);
        }
        if p != k {
            for j in 0..n {
                let t = lhs[(k, j)];
                lhs[(k, j)] = lhs[(p, j)];
                lhs[(p, j)] = t;
                let t = inv[(k, j)];
                inv[(k, j)] = inv[(p, j)];
                inv[(p, j)] = t;
            }
        }
        let d = 1.0 / lhs[(k, k)];
        for j in 0..n {
            lhs[(k, j)] *= d;
            inv[(k, j)] *= d;
        }
        for i in 0..n {
            if i == k {
                continue;
            }
            let f = lhs[(i, k)];
            if f == 0.0 {
                continue;
            }
            for j in 0..n {
                let (lkj, ikj) = (lhs[(k, j)], inv[(k, j)]);
                lhs[(i, j)] -= f * lkj;
                inv[(i, j)] -= f * ikj;
            }
        }
    }
    Ok(inv)
}

/// Copy the diagonal block `b` of `a` into a dense matrix. Entries whose
/// column lies outside the block are ignored.
pub fn extract_diagonal_block<M>(a: &M, partition: &BlockPartition, b: usize) -> Mat<f64>
where
    M: RowEntries<f64>,
{
    let bs = partition.block_size(b);
    let mut cell = Mat::<f64>::zeros(bs, bs);
    for (row_cell, row) in partition.iter(b).enumerate() {
        for (column, value) in a.row(row) {
            if let Some(col_cell) = partition.local_index(b, column) {
                cell[(row_cell, col_cell)] = value;
            }
        }
    }
    cell
}

/// Invert one extracted block.
pub fn invert_block(
    block: usize,
    cell: &Mat<f64>,
    method: InversionMethod,
    threshold: f64,
) -> Result<BlockInverse, KError> {
    let bs = cell.nrows();
    if bs == 0 {
        return Ok(BlockInverse::Dense(Mat::zeros(0, 0)));
    }
    match method {
        InversionMethod::GaussJordan => gauss_jordan(cell)
            .map(BlockInverse::Dense)
            .map_err(|pivot| KError::SingularBlock { block, pivot }),
        InversionMethod::Householder => {
            let qr = Qr::new(cell.as_ref());
            let scale = max_abs(cell);
            let r = qr.R();
            if let Some(pivot) = (0..bs).find(|&k| !(r[(k, k)].abs() > PIVOT_TOLERANCE * scale)) {
                return Err(KError::SingularBlock { block, pivot });
            }
            Ok(BlockInverse::Householder { qr, size: bs })
        }
        InversionMethod::Svd => {
            let svd = Svd::new(cell.as_ref())
                .map_err(|e| KError::FactorError(format!("SVD of block {block}: {e:?}")))?;
            let sigma = svd.S().column_vector();
            let inv_sigma: Vec<f64> = (0..bs)
                .map(|k| {
                    let s = sigma[k];
                    if s > 0.0 && s >= threshold { 1.0 / s } else { 0.0 }
                })
                .collect();
            let dropped = inv_sigma.iter().filter(|&&s| s == 0.0).count();
            if dropped > 0 {
                warn!(block, dropped, threshold, "suppressed small singular values");
            }
            Ok(BlockInverse::Svd {
                u: svd.U().to_owned(),
                inv_sigma,
                v: svd.V().to_owned(),
            })
        }
    }
}

/// Per-block inverses, plus the extracted diagonal blocks if requested.
#[derive(Debug)]
pub struct DiagonalBlockStore {
    method: InversionMethod,
    inverses: Vec<BlockInverse>,
    diagonals: Option<Vec<Mat<f64>>>,
}

impl DiagonalBlockStore {
    pub fn method(&self) -> InversionMethod {
        self.method
    }

    pub fn n_blocks(&self) -> usize {
        self.inverses.len()
    }

    pub fn inverse(&self, b: usize) -> &BlockInverse {
        &self.inverses[b]
    }

    /// The extracted diagonal block `b`, if diagonals were stored.
    pub fn diagonal(&self, b: usize) -> Option<&Mat<f64>> {
        self.diagonals.as_ref().map(|d| &d[b])
    }

    pub fn store_diagonals(&self) -> bool {
        self.diagonals.is_some()
    }

    /// `dst = D_b⁻¹ src` for diagonal block `b`.
    pub fn inverse_vmult(&self, b: usize, dst: &mut [f64], src: &[f64]) {
        self.inverses[b].vmult(dst, src);
    }
}

/// Extract and invert every diagonal block of `a` described by `partition`.
pub fn invert_diagblocks<M>(
    a: &M,
    partition: &BlockPartition,
    method: InversionMethod,
    threshold: f64,
    store_diagonals: bool,
) -> Result<DiagonalBlockStore, KError>
where
    M: RowEntries<f64>,
{
    let cells: Vec<Mat<f64>> = (0..partition.size())
        .map(|b| extract_diagonal_block(a, partition, b))
        .collect();

    #[cfg(feature = "rayon")]
    let inverses: Vec<BlockInverse> = {
        use rayon::prelude::*;
        cells
            .par_iter()
            .enumerate()
            .map(|(b, cell)| invert_block(b, cell, method, threshold))
            .collect::<Result<_, _>>()?
    };
    #[cfg(not(feature = "rayon"))]
    let inverses: Vec<BlockInverse> = cells
        .iter()
        .enumerate()
        .map(|(b, cell)| invert_block(b, cell, method, threshold))
        .collect::<Result<_, _>>()?;

    debug!(n_blocks = inverses.len(), %method, "inverted diagonal blocks");
    Ok(DiagonalBlockStore {
        method,
        inverses,
        diagonals: store_diagonals.then_some(cells),
    })
}
