use crate::core::traits::RowEntries;
use crate::error::KError;
use crate::preconditioner::relaxation_block::{AdditionalData, RelaxationBlock};
use crate::preconditioner::{apply_steps, Preconditioner, Relaxation};

/// Symmetric block SOR: a forward sweep followed by a backward sweep.
///
/// For a symmetric matrix the resulting operator is symmetric, so the
/// smoother can precondition CG. `tstep` runs the two sweeps in the
/// opposite order.
pub struct RelaxationBlockSsor<'a, M> {
    base: RelaxationBlock<'a, M>,
    steps: usize,
}

impl<M> Default for RelaxationBlockSsor<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, M> RelaxationBlockSsor<'a, M> {
    pub fn new() -> Self {
        Self { base: RelaxationBlock::new(), steps: 1 }
    }
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

impl<'a, M: RowEntries<f64>> RelaxationBlockSsor<'a, M> {
    pub fn initialize(&mut self, matrix: &'a M, data: AdditionalData) -> Result<(), KError> {
        self.base.initialize(matrix, data)
    }
}

impl<M: RowEntries<f64>> Relaxation for RelaxationBlockSsor<'_, M> {
    fn step(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError> {
        self.base.do_step_in_place(dst, src, false)?;
        self.base.do_step_in_place(dst, src, true)
    }

    fn tstep(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError> {
        self.base.do_step_in_place(dst, src, true)?;
        self.base.do_step_in_place(dst, src, false)
    }
}

impl<M: RowEntries<f64>> Preconditioner<M, Vec<f64>> for RelaxationBlockSsor<'_, M> {
    fn apply(&self, r: &Vec<f64>, z: &mut Vec<f64>) -> Result<(), KError> {
        apply_steps(self, self.steps, r, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preconditioner::{BlockPartition, RelaxationBlockSor};
    use approx::assert_abs_diff_eq;
    use faer::Mat;

    fn tridiag(n: usize) -> Mat<f64> {
        Mat::from_fn(n, n, |i, j| {
            if i == j { 4.0 } else if i.abs_diff(j) == 1 { -1.0 } else { 0.0 }
        })
    }

    #[test]
    fn ssor_step_is_sor_step_then_tstep() {
        let n = 6;
        let a = tridiag(n);
        let data = AdditionalData::new(BlockPartition::contiguous(n, 2).unwrap(), 1.2);
        let mut ssor = RelaxationBlockSsor::new();
        ssor.initialize(&a, data.clone()).unwrap();
        let mut sor = RelaxationBlockSor::new();
        sor.initialize(&a, data).unwrap();
        let b: Vec<f64> = (0..n).map(|i| i as f64 - 2.0).collect();
        let mut x1 = vec![0.25; n];
        let mut x2 = x1.clone();
        ssor.step(&mut x1, &b).unwrap();
        sor.step(&mut x2, &b).unwrap();
        sor.tstep(&mut x2, &b).unwrap();
        for i in 0..n {
            assert_abs_diff_eq!(x1[i], x2[i], epsilon = 1e-14);
        }
    }

    /// z = M⁻¹ r from a zero guess; for symmetric A, M⁻¹ must be symmetric.
    #[test]
    fn ssor_preconditioner_is_symmetric() {
        let n = 6;
        let a = tridiag(n);
        let mut ssor = RelaxationBlockSsor::new();
        ssor.initialize(&a, AdditionalData::new(BlockPartition::contiguous(n, 2).unwrap(), 1.0)).unwrap();
        let mut m_inv = vec![vec![0.0; n]; n];
        for j in 0..n {
            let mut e = vec![0.0; n];
            e[j] = 1.0;
            let mut z = vec![0.0; n];
            ssor.apply(&e, &mut z).unwrap();
            for i in 0..n {
                m_inv[i][j] = z[i];
            }
        }
        for i in 0..n {
            for j in 0..n {
                assert_abs_diff_eq!(m_inv[i][j], m_inv[j][i], epsilon = 1e-13);
            }
        }
    }
}
