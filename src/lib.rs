//! blockrelax: block relaxation smoothers over Faer
//!
//! Block Jacobi, block SOR and block SSOR for a matrix whose index set is
//! partitioned into (possibly non-contiguous) blocks. The diagonal blocks are
//! inverted once with Gauss-Jordan, Householder QR or a thresholded SVD, and
//! the smoothers then perform relaxation steps (and transposed steps) on an
//! iterate. They can be driven by a stationary iteration or used as
//! preconditioners for conjugate gradients.

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod matrix;
pub mod preconditioner;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use config::*;
pub use context::*;
pub use core::*;
pub use error::*;
pub use matrix::*;
pub use preconditioner::*;
pub use solver::*;
pub use utils::*;

// Re-export SolveStats at the crate root for convenience
pub use utils::convergence::SolveStats;
