//! Preconditioned Conjugate Gradient (PCG) per Saad §9.2
//!
//! Requires a symmetric positive definite matrix and a symmetric positive
//! definite preconditioner; block SSOR on an SPD matrix qualifies, block SOR
//! does not.

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::KError;
use crate::preconditioner::Preconditioner;
use crate::solver::LinearSolver;
use crate::utils::convergence::{Convergence, SolveStats};
use tracing::{debug, trace};

/// Which residual norm drives the stopping test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgNormType {
    /// ‖M⁻¹ r‖
    Preconditioned,
    /// ‖r‖
    Unpreconditioned,
    /// √(rᵀ M⁻¹ r)
    Natural,
}

pub struct PcgSolver<T> {
    pub conv: Convergence<T>,
    pub norm_type: CgNormType,
    pub monitor: Option<Box<dyn FnMut(usize, T)>>,
    pub residual_history: Vec<T>,
}

impl<T: Copy + num_traits::Float> PcgSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self {
            conv: Convergence { tol, max_iters },
            norm_type: CgNormType::Unpreconditioned,
            monitor: None,
            residual_history: Vec::new(),
        }
    }
    pub fn with_norm(mut self, norm_type: CgNormType) -> Self {
        self.norm_type = norm_type;
        self
    }
    pub fn with_monitor<F>(mut self, f: F) -> Self
    where F: FnMut(usize, T) + 'static {
        self.monitor = Some(Box::new(f));
        self
    }

    fn record(&mut self, i: usize, res: T) {
        if let Some(ref mut monitor) = self.monitor {
            monitor(i, res);
        }
        self.residual_history.push(res);
    }
}

impl<M, V, T> LinearSolver<M, V> for PcgSolver<T>
where
    M: MatVec<V>,
    (): InnerProduct<V, Scalar = T>,
    V: AsMut<[T]> + AsRef<[T]> + From<Vec<T>> + Clone,
    T: num_traits::Float + From<f64>,
{
    type Error = KError;
    type Scalar = T;

    fn solve(&mut self, a: &M, pc: Option<&dyn Preconditioner<M, V>>, b: &V, x: &mut V) -> Result<SolveStats<T>, KError> {
        let n = b.as_ref().len();
        if x.as_ref().len() != n {
            return Err(KError::DimensionMismatch { what: "initial guess", expected: n, found: x.as_ref().len() });
        }
        let ip = ();
        let precondition = |r: &V, z: &mut V| -> Result<(), KError> {
            match pc {
                Some(pc) => pc.apply(r, z),
                None => {
                    z.as_mut().copy_from_slice(r.as_ref());
                    Ok(())
                }
            }
        };
        let norm_type = self.norm_type;
        let norm_of = |r: &V, z: &V, rz: T| -> T {
            match norm_type {
                CgNormType::Preconditioned => ip.norm(z),
                CgNormType::Unpreconditioned => ip.norm(r),
                CgNormType::Natural => rz.abs().sqrt(),
            }
        };

        // r = b - A x
        let mut r = V::from(vec![T::zero(); n]);
        a.matvec(x, &mut r);
        for (ri, &bi) in r.as_mut().iter_mut().zip(b.as_ref()) {
            *ri = bi - *ri;
        }
        let mut z = V::from(vec![T::zero(); n]);
        precondition(&r, &mut z)?;
        let mut p = z.clone();
        let mut rz = ip.dot(&r, &z);
        let res0 = norm_of(&r, &z, rz);
        self.residual_history.clear();
        self.record(0, res0);
        let (stop, mut stats) = self.conv.check(res0, res0, 0);
        if stop {
            return Ok(stats);
        }

        let mut ap = V::from(vec![T::zero(); n]);
        for i in 1..=self.conv.max_iters {
            a.matvec(&p, &mut ap);
            let p_dot_ap = ip.dot(&p, &ap);
            if p_dot_ap <= T::zero() {
                return Err(KError::IndefiniteMatrix);
            }
            let alpha = rz / p_dot_ap;
            for (xj, &pj) in x.as_mut().iter_mut().zip(p.as_ref()) {
                *xj = *xj + alpha * pj;
            }
            for (rj, &apj) in r.as_mut().iter_mut().zip(ap.as_ref()) {
                *rj = *rj - alpha * apj;
            }
            precondition(&r, &mut z)?;
            let rz_new = ip.dot(&r, &z);
            let res_norm = norm_of(&r, &z, rz_new);
            self.record(i, res_norm);
            trace!(iteration = i, "pcg step");
            let (stop, s) = self.conv.check(res_norm, res0, i);
            stats = s;
            if stop {
                break;
            }
            let beta = rz_new / rz;
            if beta < T::zero() {
                return Err(KError::IndefinitePreconditioner);
            }
            for (pj, &zj) in p.as_mut().iter_mut().zip(z.as_ref()) {
                *pj = zj + beta * *pj;
            }
            rz = rz_new;
        }
        debug!(iterations = stats.iterations, converged = stats.converged, "pcg finished");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preconditioner::{AdditionalData, BlockPartition, RelaxationBlockSsor};
    use faer::Mat;

    fn laplace_1d(n: usize) -> Mat<f64> {
        Mat::from_fn(n, n, |i, j| {
            if i == j { 2.0 } else if i.abs_diff(j) == 1 { -1.0 } else { 0.0 }
        })
    }

    #[test]
    fn cg_solves_small_spd() {
        // SPD system: [[4,1],[1,3]] x = [1,2]
        let a = Mat::from_fn(2, 2, |i, j| [[4.0, 1.0], [1.0, 3.0]][i][j]);
        let b: Vec<f64> = vec![1.0, 2.0];
        let mut x: Vec<f64> = vec![0.0, 0.0];
        let mut solver = PcgSolver::new(1e-10, 20);
        let stats = solver.solve(&a, None, &b, &mut x).unwrap();
        assert!(stats.converged);
        let expected: [f64; 2] = [0.09090909090909091, 0.6363636363636364];
        for (xi, ei) in x.iter().zip(expected.iter()) {
            assert!((xi - ei).abs() < 1e-8, "xi = {}, expected = {}", xi, ei);
        }
    }

    #[test]
    fn block_ssor_preconditioned_cg_matches_plain_cg() {
        let n = 40;
        let a = laplace_1d(n);
        let b = vec![1.0; n];

        let mut plain = PcgSolver::new(1e-12, 200);
        let mut x_plain = vec![0.0; n];
        let stats_plain = plain.solve(&a, None, &b, &mut x_plain).unwrap();

        let mut ssor = RelaxationBlockSsor::new();
        ssor.initialize(&a, AdditionalData::new(BlockPartition::contiguous(n, 4).unwrap(), 1.0)).unwrap();
        let mut pcg = PcgSolver::new(1e-12, 200);
        let mut x = vec![0.0; n];
        let stats = pcg.solve(&a, Some(&ssor), &b, &mut x).unwrap();

        assert!(stats_plain.converged && stats.converged);
        assert_eq!(pcg.residual_history.len(), stats.iterations + 1);
        for (xi, yi) in x.iter().zip(x_plain.iter()) {
            assert!((xi - yi).abs() < 1e-6);
        }
    }
}
