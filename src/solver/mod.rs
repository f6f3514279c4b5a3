//! Iterative drivers that consume the relaxation smoothers.
//!
//! - [`RelaxationSolver`]: stationary iteration, calls `Relaxation::step`
//!   until the residual is small enough.
//! - [`PcgSolver`]: preconditioned conjugate gradients; block SSOR (or any
//!   other `Preconditioner`) can be plugged in.

use crate::preconditioner::Preconditioner;
use crate::utils::convergence::SolveStats;

/// Common interface for any direct or iterative solver.
pub trait LinearSolver<M, V> {
    type Error;
    type Scalar: Copy + PartialOrd + From<f64>;
    /// Solve A·x = b, writing result into `x`.
    /// Returns iteration stats (including convergence info).
    fn solve(
        &mut self,
        a: &M,
        pc: Option<&dyn Preconditioner<M, V>>,
        b: &V,
        x: &mut V,
    ) -> Result<SolveStats<Self::Scalar>, Self::Error>;
}

pub mod pcg;
pub use pcg::PcgSolver;

pub mod relaxation;
pub use relaxation::RelaxationSolver;
