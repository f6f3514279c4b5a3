//! Matrix module: sparse matrix types and traits.

pub mod sparse;
pub use sparse::{CsrMatrix, SparseMatrix};
