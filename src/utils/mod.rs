//! Utilities: convergence checks and graph coloring.

pub mod coloring;
pub mod convergence;
