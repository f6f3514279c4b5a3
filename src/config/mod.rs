//! Configuration front-ends.

pub mod options;
pub use options::RelaxationOptions;
