//! Domain layer: the mutation tree and its structural rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod node;

pub use error::{DomainError, DomainResult};
pub use node::{Node, MAX_DEPTH};
