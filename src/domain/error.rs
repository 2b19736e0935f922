//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree's structural rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("original text must not be empty")]
    EmptyText,

    #[error("depth {depth} exceeds the maximum of {max}")]
    DepthTooLarge { depth: usize, max: usize },

    #[error("leaf position {index} out of range (tree has {leaves} leaves)")]
    LeafOutOfRange { index: usize, leaves: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
