//! Context module for blockrelax.
//!
//! This module provides context/factory types for configuring and managing
//! relaxation smoothers. A context selects the smoother type from options and
//! dispatches `step`/`tstep` and preconditioner application to it.
//!
//! Modules:
//! - [`pc_context`]: the `RelaxationType` selector and the `Smoother` dispatch enum.
//!
//! # Example
//! ```rust,ignore
//! use blockrelax::context::pc_context::{RelaxationType, Smoother};
//! let mut smoother = Smoother::new(RelaxationType::Ssor);
//! smoother.initialize(&a, data)?;
//! smoother.step(&mut x, &b)?;
//! ```
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems. SIAM.

pub mod pc_context;
pub use pc_context::{RelaxationType, Smoother};
