// Block-Jacobi relaxation

use crate::core::traits::RowEntries;
use crate::error::KError;
use crate::preconditioner::relaxation_block::{AdditionalData, RelaxationBlock};
use crate::preconditioner::{apply_steps, Preconditioner, Relaxation};

/// Block Jacobi: every block update reads the iterate as it was before the
/// sweep, so the block order does not affect the result.
pub struct RelaxationBlockJacobi<'a, M> {
    base: RelaxationBlock<'a, M>,
    steps: usize,
}

impl<M> Default for RelaxationBlockJacobi<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, M> RelaxationBlockJacobi<'a, M> {
    /// new with empty state; user must call `initialize`.
    pub fn new() -> Self {
        Self { base: RelaxationBlock::new(), steps: 1 }
    }

    /// Number of steps performed by `Preconditioner::apply`.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn clear(&mut self) {
        self.base.clear();
    }

    pub fn base(&self) -> &RelaxationBlock<'a, M> {
        &self.base
    }
}

impl<'a, M: RowEntries<f64>> RelaxationBlockJacobi<'a, M> {
    pub fn initialize(&mut self, matrix: &'a M, data: AdditionalData) -> Result<(), KError> {
        self.base.initialize(matrix, data)
    }
}

impl<M: RowEntries<f64>> Relaxation for RelaxationBlockJacobi<'_, M> {
    fn step(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError> {
        let prev = dst.to_vec();
        self.base.do_step_snapshot(dst, &prev, src, false)
    }

    fn tstep(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError> {
        let prev = dst.to_vec();
        self.base.do_step_snapshot(dst, &prev, src, true)
    }
}

impl<M: RowEntries<f64>> Preconditioner<M, Vec<f64>> for RelaxationBlockJacobi<'_, M> {
    fn apply(&self, r: &Vec<f64>, z: &mut Vec<f64>) -> Result<(), KError> {
        apply_steps(self, self.steps, r, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preconditioner::BlockPartition;
    use approx::assert_abs_diff_eq;
    use faer::Mat;

    #[test]
    fn jacobi_on_block_diagonal_matrix_is_exact() {
        // two uncoupled 2x2 blocks
        let a = Mat::from_fn(4, 4, |i, j| match (i / 2 == j / 2, i == j) {
            (true, true) => 3.0,
            (true, false) => 1.0,
            _ => 0.0,
        });
        let mut jac = RelaxationBlockJacobi::new();
        jac.initialize(&a, AdditionalData::new(BlockPartition::contiguous(4, 2).unwrap(), 1.0)).unwrap();
        let x_true = [1.0, -2.0, 0.5, 4.0];
        let b: Vec<f64> = (0..4).map(|i| (0..4).map(|j| a[(i, j)] * x_true[j]).sum()).collect();
        let mut x = vec![0.0; 4];
        jac.step(&mut x, &b).unwrap();
        for i in 0..4 {
            assert_abs_diff_eq!(x[i], x_true[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn jacobi_step_and_tstep_agree() {
        let a = Mat::from_fn(6, 6, |i, j| {
            if i == j { 4.0 } else if i.abs_diff(j) == 1 { -1.0 } else { 0.0 }
        });
        let mut jac = RelaxationBlockJacobi::new();
        jac.initialize(&a, AdditionalData::new(BlockPartition::contiguous(6, 2).unwrap(), 0.8)).unwrap();
        let b = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut x1 = vec![0.5; 6];
        let mut x2 = vec![0.5; 6];
        jac.step(&mut x1, &b).unwrap();
        jac.tstep(&mut x2, &b).unwrap();
        for i in 0..6 {
            assert_abs_diff_eq!(x1[i], x2[i], epsilon = 1e-14);
        }
    }
}
