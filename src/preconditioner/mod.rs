//! Preconditioners and relaxation smoothers.
//!
//! This module defines the `Preconditioner` and `Relaxation` traits and the
//! block relaxation family built on a shared engine: block Jacobi, block SOR
//! and block SSOR, each with its transpose step.

use crate::error::KError;

/// A preconditioner M ≈ A⁻¹.
pub trait Preconditioner<M, V> {
    /// Apply M⁻¹ to r, writing z = M⁻¹ r
    fn apply(&self, r: &V, z: &mut V) -> Result<(), KError>;
    /// Optionally: setup/factorize from A
    fn setup(&mut self, _a: &M) -> Result<(), KError> { Ok(()) }
}

/// A relaxation method used as a smoother: one call to `step` improves the
/// iterate `dst` of `A x = src` in place.
///
/// The update is affine in `dst`, not a linear map of `src`.
pub trait Relaxation {
    /// One relaxation step.
    fn step(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError>;
    /// One step of the transposed method.
    fn tstep(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError>;
}

pub mod block_inverse;
pub mod block_jacobi;
pub mod block_list;
pub mod relaxation_block;
pub mod sor;
pub mod ssor;

// Re-exports for convenience
pub use block_inverse::{BlockInverse, DiagonalBlockStore, InversionMethod};
pub use block_jacobi::RelaxationBlockJacobi;
pub use block_list::BlockPartition;
pub use relaxation_block::{AdditionalData, RelaxationBlock};
pub use sor::RelaxationBlockSor;
pub use ssor::RelaxationBlockSsor;

/// Preconditioner action of a smoother: `steps` relaxation steps from a zero
/// initial guess.
pub(crate) fn apply_steps<R: Relaxation>(
    smoother: &R,
    steps: usize,
    r: &[f64],
    z: &mut [f64],
) -> Result<(), KError> {
    z.fill(0.0);
    for _ in 0..steps {
        smoother.step(z, r)?;
    }
    Ok(())
}
