//! Command-line or API options for relaxation smoothers.
//!
//! This module provides the `RelaxationOptions` struct, a loosely typed set of
//! options (as they would arrive from a command line or a parameter file)
//! that is validated and turned into an `AdditionalData` plus the smoother
//! type. The available smoothers are block Jacobi, block SOR and block SSOR;
//! the diagonal blocks can be inverted by Gauss-Jordan, Householder QR or a
//! truncated SVD.

use crate::context::pc_context::RelaxationType;
use crate::error::KError;
use crate::preconditioner::{AdditionalData, BlockPartition, InversionMethod};

/// Smoother types & parameters.
#[derive(Debug, Clone)]
pub struct RelaxationOptions {
    /// Type of smoother (jacobi, sor, ssor)
    pub pc_type: String,

    /// Relaxation factor ω
    pub omega: f64,

    /// Block inversion (gauss_jordan, householder, svd)
    pub inversion: String,

    /// Singular value cutoff for svd inversion
    pub threshold: f64,

    /// Relaxation steps per preconditioner application
    pub steps: usize,
}

impl Default for RelaxationOptions {
    fn default() -> Self {
        Self {
            pc_type: "ssor".into(),
            omega: 1.0,
            inversion: "gauss_jordan".into(),
            threshold: 0.0,
            steps: 1,
        }
    }
}

impl RelaxationOptions {
    pub fn relaxation_type(&self) -> Result<RelaxationType, KError> {
        self.pc_type.parse()
    }

    pub fn inversion_method(&self) -> Result<InversionMethod, KError> {
        self.inversion.parse()
    }

    /// Typed parameters for the given blocks.
    pub fn into_additional_data(&self, block_list: BlockPartition) -> Result<AdditionalData, KError> {
        if self.steps == 0 {
            return Err(KError::InvalidConfig("steps must be at least 1".into()));
        }
        Ok(AdditionalData::new(block_list, self.omega)
            .with_inversion(self.inversion_method()?)
            .with_threshold(self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_map_to_additional_data() {
        let opts = RelaxationOptions {
            pc_type: "SOR".into(),
            omega: 1.3,
            inversion: "svd".into(),
            threshold: 1e-10,
            steps: 2,
        };
        assert_eq!(opts.relaxation_type().unwrap(), RelaxationType::Sor);
        let data = opts.into_additional_data(BlockPartition::contiguous(4, 2).unwrap()).unwrap();
        assert_eq!(data.relaxation, 1.3);
        assert_eq!(data.inversion, InversionMethod::Svd);
        assert_eq!(data.threshold, 1e-10);
        assert_eq!(data.block_list.size(), 2);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let opts = RelaxationOptions { pc_type: "ilu".into(), ..Default::default() };
        assert!(opts.relaxation_type().is_err());
        let opts = RelaxationOptions { inversion: "cholesky".into(), ..Default::default() };
        assert!(opts.into_additional_data(BlockPartition::default()).is_err());
    }
}
