//! Shared engine of the block relaxation smoothers.
//!
//! [`RelaxationBlock`] borrows the system matrix, inverts its diagonal
//! blocks once in [`RelaxationBlock::initialize`], and then performs sweeps.
//! One sweep visits every block (in natural order, reversed, or following
//! each configured permutation in turn) and applies
//!
//! ```text
//! b      = src|_B - (A prev)|_B
//! dst|_B = prev|_B + ω · D_B⁻¹ b
//! ```
//!
//! Whether `prev` is a frozen copy of the iterate (Jacobi) or the iterate
//! itself, updated as the sweep proceeds (SOR/SSOR), is decided by which of
//! the two sweep entry points is called.

use tracing::{debug, trace};

use crate::core::traits::RowEntries;
use crate::error::KError;
use crate::preconditioner::block_inverse::{invert_diagblocks, DiagonalBlockStore, InversionMethod};
use crate::preconditioner::block_list::BlockPartition;

/// Parameters of a block relaxation method.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionalData {
    /// The blocks whose diagonal sub-matrices are inverted.
    pub block_list: BlockPartition,
    /// Damping factor ω applied to every block correction.
    pub relaxation: f64,
    /// Invert the diagonal blocks during `initialize`. Must be `true`.
    pub invert_diagonal: bool,
    /// Share one inverse between all blocks. Not supported; must be `false`.
    pub same_diagonal: bool,
    pub inversion: InversionMethod,
    /// Singular values below this are dropped by [`InversionMethod::Svd`].
    /// The cutoff is absolute, not relative to the largest singular value.
    pub threshold: f64,
    /// Block orderings for a sweep; each entry is a permutation of the block
    /// indices and the sweep runs once per entry. Empty means one pass in
    /// natural order.
    pub order: Vec<Vec<usize>>,
    /// Keep the extracted diagonal blocks next to their inverses.
    pub store_diagonals: bool,
}

impl Default for AdditionalData {
    fn default() -> Self {
        Self {
            block_list: BlockPartition::default(),
            relaxation: 1.0,
            invert_diagonal: true,
            same_diagonal: false,
            inversion: InversionMethod::GaussJordan,
            threshold: 0.0,
            order: Vec::new(),
            store_diagonals: false,
        }
    }
}

impl AdditionalData {
    pub fn new(block_list: BlockPartition, relaxation: f64) -> Self {
        Self { block_list, relaxation, ..Self::default() }
    }
    pub fn with_inversion(mut self, inversion: InversionMethod) -> Self {
        self.inversion = inversion;
        self
    }
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
    pub fn with_order(mut self, order: Vec<Vec<usize>>) -> Self {
        self.order = order;
        self
    }
    pub fn with_store_diagonals(mut self, flag: bool) -> Self {
        self.store_diagonals = flag;
        self
    }

    /// Checks that do not depend on the matrix.
    fn validate(&self) -> Result<(), KError> {
        if !self.invert_diagonal {
            return Err(KError::Unsupported("relaxation without inverted diagonal blocks"));
        }
        if self.same_diagonal {
            return Err(KError::Unsupported("one shared inverse for all diagonal blocks"));
        }
        if !self.relaxation.is_finite() {
            return Err(KError::InvalidConfig(format!(
                "relaxation factor must be finite, got {}",
                self.relaxation
            )));
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(KError::InvalidConfig(format!(
                "SVD threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Every permutation must list one block index per block.
    fn validate_order(&self) -> Result<(), KError> {
        let n_blocks = self.block_list.size();
        for (permutation, perm) in self.order.iter().enumerate() {
            if perm.len() != n_blocks {
                return Err(KError::InvalidOrder { permutation, expected: n_blocks, found: perm.len() });
            }
            if let Some(&index) = perm.iter().find(|&&b| b >= n_blocks) {
                return Err(KError::OrderIndexOutOfRange { permutation, index, n_blocks });
            }
        }
        Ok(())
    }

    /// Blocks in the order a sweep visits them. A backward sweep consumes
    /// the permutations in reverse as well, so it mirrors the forward one.
    fn sweep_sequence(&self, backward: bool) -> impl Iterator<Item = usize> + '_ {
        let n_blocks = self.block_list.size();
        let n_permutations = self.order.len().max(1);
        (0..n_permutations).flat_map(move |perm| {
            (0..n_blocks).map(move |bi| {
                let raw_block = if backward { n_blocks - bi - 1 } else { bi };
                if self.order.is_empty() {
                    raw_block
                } else if backward {
                    self.order[n_permutations - 1 - perm][raw_block]
                } else {
                    self.order[perm][raw_block]
                }
            })
        })
    }
}

/// State of an initialized relaxation object.
struct Bound<'a, M> {
    matrix: &'a M,
    data: AdditionalData,
    store: DiagonalBlockStore,
}

/// Block relaxation engine; wrapped by the Jacobi, SOR and SSOR smoothers.
///
/// Holds a borrow of the matrix from `initialize` until `clear` or drop.
pub struct RelaxationBlock<'a, M> {
    state: Option<Bound<'a, M>>,
}

impl<M> Default for RelaxationBlock<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, M> RelaxationBlock<'a, M> {
    /// new with empty state; user must call `initialize`.
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Release the matrix and all block inverses.
    pub fn clear(&mut self) {
        self.state = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Number of blocks, zero when uninitialized.
    pub fn n_blocks(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.data.block_list.size())
    }

    /// The block inverses computed by `initialize`.
    pub fn store(&self) -> Option<&DiagonalBlockStore> {
        self.state.as_ref().map(|s| &s.store)
    }

    pub fn additional_data(&self) -> Option<&AdditionalData> {
        self.state.as_ref().map(|s| &s.data)
    }

    fn bound(&self) -> Result<&Bound<'a, M>, KError> {
        self.state.as_ref().ok_or(KError::NotInitialized)
    }
}

impl<'a, M: RowEntries<f64>> RelaxationBlock<'a, M> {
    /// Bind `matrix` and `data`, then extract and invert all diagonal blocks.
    ///
    /// Any previous state is released first; on error the object is left
    /// uninitialized.
    pub fn initialize(&mut self, matrix: &'a M, data: AdditionalData) -> Result<(), KError> {
        self.clear();
        data.validate()?;
        let n = matrix.nrows();
        if matrix.ncols() != n {
            return Err(KError::DimensionMismatch { what: "matrix columns", expected: n, found: matrix.ncols() });
        }
        if data.block_list.dimension() != n {
            return Err(KError::DimensionMismatch {
                what: "block list dimension",
                expected: n,
                found: data.block_list.dimension(),
            });
        }
        let store = invert_diagblocks(
            matrix,
            &data.block_list,
            data.inversion,
            data.threshold,
            data.store_diagonals,
        )?;
        debug!(
            n,
            n_blocks = data.block_list.size(),
            inversion = %data.inversion,
            threshold = data.threshold,
            relaxation = data.relaxation,
            permutations = data.order.len(),
            "block relaxation initialized"
        );
        self.state = Some(Bound { matrix, data, store });
        Ok(())
    }

    /// Sweep with a frozen previous iterate: every block reads `prev`,
    /// results go to `dst`.
    pub fn do_step_snapshot(
        &self,
        dst: &mut [f64],
        prev: &[f64],
        src: &[f64],
        backward: bool,
    ) -> Result<(), KError> {
        let bound = self.bound()?;
        bound.check(dst.len(), src.len())?;
        if prev.len() != dst.len() {
            return Err(KError::DimensionMismatch { what: "previous iterate", expected: dst.len(), found: prev.len() });
        }
        trace!(backward, "snapshot sweep");
        let omega = bound.data.relaxation;
        let mut b_cell = Vec::new();
        let mut x_cell = Vec::new();
        for block in bound.data.sweep_sequence(backward) {
            bound.block_correction(block, prev, src, &mut b_cell, &mut x_cell);
            for (row_cell, row) in bound.data.block_list.iter(block).enumerate() {
                dst[row] = prev[row] + omega * x_cell[row_cell];
            }
        }
        Ok(())
    }

    /// Sweep in place: `dst` is the previous iterate, and blocks later in the
    /// sweep see the updates of earlier ones.
    pub fn do_step_in_place(&self, dst: &mut [f64], src: &[f64], backward: bool) -> Result<(), KError> {
        let bound = self.bound()?;
        bound.check(dst.len(), src.len())?;
        trace!(backward, "in-place sweep");
        let omega = bound.data.relaxation;
        let mut b_cell = Vec::new();
        let mut x_cell = Vec::new();
        for block in bound.data.sweep_sequence(backward) {
            bound.block_correction(block, dst, src, &mut b_cell, &mut x_cell);
            for (row_cell, row) in bound.data.block_list.iter(block).enumerate() {
                dst[row] += omega * x_cell[row_cell];
            }
        }
        Ok(())
    }
}

impl<M: RowEntries<f64>> Bound<'_, M> {
    /// Everything a sweep relies on, checked before `dst` is written.
    fn check(&self, dst_len: usize, src_len: usize) -> Result<(), KError> {
        let n = self.matrix.nrows();
        if dst_len != n {
            return Err(KError::DimensionMismatch { what: "destination vector", expected: n, found: dst_len });
        }
        if src_len != n {
            return Err(KError::DimensionMismatch { what: "source vector", expected: n, found: src_len });
        }
        self.data.validate_order()
    }

    /// `x_cell = D_B⁻¹ (src - A prev)|_B` for block `block`.
    fn block_correction(
        &self,
        block: usize,
        prev: &[f64],
        src: &[f64],
        b_cell: &mut Vec<f64>,
        x_cell: &mut Vec<f64>,
    ) {
        let rows = self.data.block_list.block(block);
        b_cell.clear();
        b_cell.extend(rows.iter().map(|&row| {
            self.matrix
                .row(row)
                .fold(src[row], |acc, (column, value)| acc - value * prev[column])
        }));
        x_cell.clear();
        x_cell.resize(rows.len(), 0.0);
        self.store.inverse_vmult(block, x_cell, b_cell);
    }
}
