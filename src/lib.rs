//! Telephone-game mutation trees.
//!
//! Starting from one sentence, every level of a perfect binary tree applies a chain
//! of small mutations twice, independently, so that each node gets two drifted
//! children. Because every root-to-leaf path carries the same number of mutation
//! steps, leaf-to-leaf distances form an ultrametric.
//!
//! Layers:
//! - [`domain`]: the immutable tree
//! - [`application`]: retry/backoff/fallback, mutation chains, tree building, printing
//! - [`infrastructure`]: mutator backends (external command, word dictionary), DI
//! - [`cli`]: argument parsing and dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
