//! Stationary relaxation iteration: x ← step(x, b) until ‖b - A x‖ is small.
//!
//! This is the simplest driver of a smoother and the way a multigrid level
//! or a plain iterative solve uses one.

use tracing::{debug, trace, warn};

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::KError;
use crate::preconditioner::Relaxation;
use crate::utils::convergence::{Convergence, SolveStats};

pub struct RelaxationSolver {
    pub conv: Convergence<f64>,
    /// Use `tstep` instead of `step`.
    pub transpose: bool,
    pub residual_history: Vec<f64>,
}

impl RelaxationSolver {
    pub fn new(tol: f64, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters }, transpose: false, residual_history: Vec::new() }
    }

    pub fn with_transpose(mut self, flag: bool) -> Self {
        self.transpose = flag;
        self
    }

    /// Iterate on `x` (initial guess on input) until the relative residual
    /// drops below the tolerance or the iteration limit is reached.
    pub fn solve<M, R>(&mut self, a: &M, smoother: &R, b: &Vec<f64>, x: &mut Vec<f64>) -> Result<SolveStats<f64>, KError>
    where
        M: MatVec<Vec<f64>>,
        R: Relaxation,
    {
        let n = b.len();
        if x.len() != n {
            return Err(KError::DimensionMismatch { what: "initial guess", expected: n, found: x.len() });
        }
        let ip = ();
        let mut ax = vec![0.0; n];
        let residual = |x: &Vec<f64>, ax: &mut Vec<f64>| -> f64 {
            a.matvec(x, ax);
            let r: Vec<f64> = b.iter().zip(ax.iter()).map(|(bi, axi)| bi - axi).collect();
            ip.norm(&r)
        };
        self.residual_history.clear();
        let res0 = residual(&*x, &mut ax);
        self.residual_history.push(res0);
        let (stop, mut stats) = self.conv.check(res0, res0, 0);
        if stop {
            return Ok(stats);
        }
        for i in 1..=self.conv.max_iters {
            if self.transpose {
                smoother.tstep(x, b)?;
            } else {
                smoother.step(x, b)?;
            }
            let res = residual(&*x, &mut ax);
            trace!(iteration = i, residual = res, "relaxation step");
            self.residual_history.push(res);
            let (stop, s) = self.conv.check(res, res0, i);
            stats = s;
            if stop {
                break;
            }
        }
        if stats.converged {
            debug!(iterations = stats.iterations, residual = stats.final_residual, "relaxation converged");
        } else {
            warn!(iterations = stats.iterations, residual = stats.final_residual, "relaxation did not converge");
        }
        Ok(stats)
    }
}
