use thiserror::Error;

// Unified error type for blockrelax

#[derive(Error, Debug)]
pub enum KError {
    #[error("relaxation object used before initialize() or after clear()")]
    NotInitialized,
    #[error("unsupported configuration: {0}")]
    Unsupported(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid block partition: {0}")]
    InvalidPartition(String),
    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("permutation {permutation} has {found} entries, expected one per block ({expected})")]
    InvalidOrder {
        permutation: usize,
        expected: usize,
        found: usize,
    },
    #[error("permutation {permutation} names block {index}, but there are only {n_blocks} blocks")]
    OrderIndexOutOfRange {
        permutation: usize,
        index: usize,
        n_blocks: usize,
    },
    #[error("diagonal block {block} is singular (zero pivot in column {pivot})")]
    SingularBlock { block: usize, pivot: usize },
    #[error("factorization error: {0}")]
    FactorError(String),
    #[error("indefinite matrix detected (p^T A p <= 0)")]
    IndefiniteMatrix,
    #[error("indefinite preconditioner detected (beta < 0)")]
    IndefinitePreconditioner,
}
