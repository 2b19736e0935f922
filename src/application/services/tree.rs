//! Telephone tree construction
//!
//! Grows a perfect binary tree top-down. Each internal node spawns two children
//! from two independent mutation chains over its own text, so every root-to-leaf
//! path carries the same number of mutation steps.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::chain::MutationChain;
use crate::application::ApplicationResult;
use crate::domain::{DomainError, Node, MAX_DEPTH};

/// How sibling branches are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Expansion {
    /// Left chain, right chain, then the whole left subtree before the right one.
    #[default]
    Sequential,
    /// Sibling chains and sibling subtrees run on the rayon pool.
    Parallel,
}

pub struct TreeBuilder {
    chain: Arc<MutationChain>,
    depth: usize,
    expansion: Expansion,
}

impl TreeBuilder {
    pub fn new(chain: Arc<MutationChain>, depth: usize) -> Self {
        Self {
            chain,
            depth,
            expansion: Expansion::Sequential,
        }
    }

    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Build the full tree rooted at `root_text`.
    ///
    /// The root keeps `root_text` as given, except that line breaks become spaces
    /// so that every node prints as one line.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, root_text: &str) -> ApplicationResult<Node> {
        let root_text = single_line(root_text);
        if root_text.trim().is_empty() {
            return Err(DomainError::EmptyText.into());
        }
        if self.depth > MAX_DEPTH {
            return Err(DomainError::DepthTooLarge {
                depth: self.depth,
                max: MAX_DEPTH,
            }
            .into());
        }
        info!(
            "building tree: depth={}, steps_per_branch={}, expansion={:?}",
            self.depth,
            self.chain.steps(),
            self.expansion
        );
        Ok(self.expand(root_text, 0, "root"))
    }

    fn expand(&self, text: String, depth: usize, path: &str) -> Node {
        if depth >= self.depth {
            return Node::leaf(text, depth);
        }
        debug!("expand: path={}, depth={}", path, depth);
        let left_path = child_path(path, 'L');
        let right_path = child_path(path, 'R');

        let (left, right) = match self.expansion {
            Expansion::Sequential => {
                let left_text = self.chain.run(&text);
                let right_text = self.chain.run(&text);
                info!("node {} mutated into two branches", path);
                let left = self.expand(left_text, depth + 1, &left_path);
                let right = self.expand(right_text, depth + 1, &right_path);
                (left, right)
            }
            Expansion::Parallel => {
                let (left_text, right_text) =
                    rayon::join(|| self.chain.run(&text), || self.chain.run(&text));
                info!("node {} mutated into two branches", path);
                rayon::join(
                    || self.expand(left_text, depth + 1, &left_path),
                    || self.expand(right_text, depth + 1, &right_path),
                )
            }
        };
        Node::internal(text, depth, left, right)
    }
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(&['\n', '\r'][..], " ")
}

fn child_path(path: &str, side: char) -> String {
    if path == "root" {
        side.to_string()
    } else {
        format!("{}{}", path, side)
    }
}
