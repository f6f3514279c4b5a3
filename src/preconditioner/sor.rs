// Block SOR relaxation

use std::fmt;

use crate::core::traits::RowEntries;
use crate::error::KError;
use crate::preconditioner::relaxation_block::{AdditionalData, RelaxationBlock};
use crate::preconditioner::{apply_steps, Preconditioner, Relaxation};

/// Block successive over-relaxation.
///
/// The sweep updates the iterate in place, so each block sees the fresh
/// values of the blocks before it. `step` sweeps forward, `tstep` backward.
pub struct RelaxationBlockSor<'a, M> {
    base: RelaxationBlock<'a, M>,
    steps: usize,
}

impl<M> Default for RelaxationBlockSor<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, M> RelaxationBlockSor<'a, M> {
    /// new with empty state; user must call `initialize`.
    pub fn new() -> Self {
        Self { base: RelaxationBlock::new(), steps: 1 }
    }
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }
    pub fn steps(&self) -> usize { self.steps }
    pub fn clear(&mut self) {
        self.base.clear();
    }
    pub fn base(&self) -> &RelaxationBlock<'a, M> {
        &self.base
    }
}

impl<'a, M: RowEntries<f64>> RelaxationBlockSor<'a, M> {
    pub fn initialize(&mut self, matrix: &'a M, data: AdditionalData) -> Result<(), KError> {
        self.base.initialize(matrix, data)
    }
}

impl<M> fmt::Display for RelaxationBlockSor<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.base.additional_data() {
            Some(d) => write!(f, "BlockSOR(omega={}, blocks={}, inversion={}, steps={})",
                d.relaxation, d.block_list.size(), d.inversion, self.steps),
            None => write!(f, "BlockSOR(uninitialized, steps={})", self.steps),
        }
    }
}

impl<M: RowEntries<f64>> Relaxation for RelaxationBlockSor<'_, M> {
    fn step(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError> {
        self.base.do_step_in_place(dst, src, false)
    }

    fn tstep(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError> {
        self.base.do_step_in_place(dst, src, true)
    }
}

impl<M: RowEntries<f64>> Preconditioner<M, Vec<f64>> for RelaxationBlockSor<'_, M> {
    fn apply(&self, r: &Vec<f64>, z: &mut Vec<f64>) -> Result<(), KError> {
        apply_steps(self, self.steps, r, z)
    }
}
