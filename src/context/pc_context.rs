//! Smoother context: selection and dispatch of the block relaxation methods.
//!
//! The `RelaxationType` enum names the supported smoothers, and `Smoother`
//! holds one of them behind a single interface, so drivers can be written
//! against one type and configured at run time.
//!
//! # Supported smoothers
//!
//! - Jacobi: block Jacobi, every block reads the pre-sweep iterate.
//! - Sor: block SOR, in-place forward sweep (`tstep`: backward).
//! - Ssor: block SSOR, forward then backward sweep.

use std::str::FromStr;

use crate::config::options::RelaxationOptions;
use crate::core::traits::RowEntries;
use crate::error::KError;
use crate::preconditioner::{
    AdditionalData, BlockPartition, Preconditioner, Relaxation, RelaxationBlock,
    RelaxationBlockJacobi, RelaxationBlockSor, RelaxationBlockSsor,
};

/// The block relaxation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationType {
    Jacobi,
    Sor,
    Ssor,
}

impl FromStr for RelaxationType {
    type Err = KError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jacobi" | "block_jacobi" => Ok(Self::Jacobi),
            "sor" | "block_sor" => Ok(Self::Sor),
            "ssor" | "block_ssor" => Ok(Self::Ssor),
            other => Err(KError::InvalidConfig(format!("unknown relaxation type '{other}'"))),
        }
    }
}

/// One of the block relaxation smoothers, chosen at run time.
pub enum Smoother<'a, M> {
    Jacobi(RelaxationBlockJacobi<'a, M>),
    Sor(RelaxationBlockSor<'a, M>),
    Ssor(RelaxationBlockSsor<'a, M>),
}

impl<'a, M> Smoother<'a, M> {
    /// Uninitialized smoother of the given type.
    pub fn new(kind: RelaxationType) -> Self {
        Self::with_steps(kind, 1)
    }

    fn with_steps(kind: RelaxationType, steps: usize) -> Self {
        match kind {
            RelaxationType::Jacobi => Self::Jacobi(RelaxationBlockJacobi::new().with_steps(steps)),
            RelaxationType::Sor => Self::Sor(RelaxationBlockSor::new().with_steps(steps)),
            RelaxationType::Ssor => Self::Ssor(RelaxationBlockSsor::new().with_steps(steps)),
        }
    }

    pub fn kind(&self) -> RelaxationType {
        match self {
            Self::Jacobi(_) => RelaxationType::Jacobi,
            Self::Sor(_) => RelaxationType::Sor,
            Self::Ssor(_) => RelaxationType::Ssor,
        }
    }

    pub fn base(&self) -> &RelaxationBlock<'a, M> {
        match self {
            Self::Jacobi(s) => s.base(),
            Self::Sor(s) => s.base(),
            Self::Ssor(s) => s.base(),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::Jacobi(s) => s.clear(),
            Self::Sor(s) => s.clear(),
            Self::Ssor(s) => s.clear(),
        }
    }
}

impl<'a, M: RowEntries<f64>> Smoother<'a, M> {
    pub fn initialize(&mut self, matrix: &'a M, data: AdditionalData) -> Result<(), KError> {
        match self {
            Self::Jacobi(s) => s.initialize(matrix, data),
            Self::Sor(s) => s.initialize(matrix, data),
            Self::Ssor(s) => s.initialize(matrix, data),
        }
    }

    /// Build and initialize a smoother from loosely typed options.
    pub fn from_options(
        matrix: &'a M,
        block_list: BlockPartition,
        opts: &RelaxationOptions,
    ) -> Result<Self, KError> {
        let mut smoother = Self::with_steps(opts.relaxation_type()?, opts.steps);
        smoother.initialize(matrix, opts.into_additional_data(block_list)?)?;
        Ok(smoother)
    }
}

impl<M: RowEntries<f64>> Relaxation for Smoother<'_, M> {
    fn step(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError> {
        match self {
            Self::Jacobi(s) => s.step(dst, src),
            Self::Sor(s) => s.step(dst, src),
            Self::Ssor(s) => s.step(dst, src),
        }
    }

    fn tstep(&self, dst: &mut [f64], src: &[f64]) -> Result<(), KError> {
        match self {
            Self::Jacobi(s) => s.tstep(dst, src),
            Self::Sor(s) => s.tstep(dst, src),
            Self::Ssor(s) => s.tstep(dst, src),
        }
    }
}

impl<M: RowEntries<f64>> Preconditioner<M, Vec<f64>> for Smoother<'_, M> {
    fn apply(&self, r: &Vec<f64>, z: &mut Vec<f64>) -> Result<(), KError> {
        match self {
            Self::Jacobi(s) => s.apply(r, z),
            Self::Sor(s) => s.apply(r, z),
            Self::Ssor(s) => s.apply(r, z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    #[test]
    fn from_options_builds_the_requested_smoother() {
        let a = Mat::from_fn(4, 4, |i, j| if i == j { 2.0 } else { 0.0 });
        let opts = RelaxationOptions { pc_type: "jacobi".into(), ..Default::default() };
        let s = Smoother::from_options(&a, BlockPartition::contiguous(4, 2).unwrap(), &opts).unwrap();
        assert_eq!(s.kind(), RelaxationType::Jacobi);
        assert!(s.base().is_initialized());
        let mut x = vec![0.0; 4];
        s.step(&mut x, &[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(x, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn clear_propagates_to_the_wrapped_smoother() {
        let a = Mat::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let mut s = Smoother::new(RelaxationType::Sor);
        s.initialize(&a, AdditionalData::new(BlockPartition::contiguous(2, 1).unwrap(), 1.0)).unwrap();
        s.clear();
        let mut x = vec![0.0; 2];
        assert!(matches!(s.step(&mut x, &[1.0, 1.0]), Err(KError::NotInitialized)));
    }
}
