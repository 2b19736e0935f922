//! Application services
//!
//! Services orchestrate domain logic and use I/O boundary traits.

pub mod chain;
pub mod retry;
pub mod tree;

pub use chain::MutationChain;
pub use retry::{MutationOutcome, RetryPolicy, RetryingMutator};
pub use tree::{Expansion, TreeBuilder};
