//! Mutation tree node.
//!
//! A node owns its two children outright: there is no sharing between subtrees and
//! no back-pointers, so plain boxes are enough.

use crate::domain::error::{DomainError, DomainResult};

/// Largest accepted tree depth. A depth-`D` tree holds `2^(D+1) - 1` sentences.
pub const MAX_DEPTH: usize = 24;

/// One sentence in the telephone tree.
///
/// Either a leaf (no children) or an internal node with exactly two children.
/// The text is fixed at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    text: String,
    depth: usize,
    children: Option<[Box<Node>; 2]>,
}

impl Node {
    /// Creates a leaf node.
    pub fn leaf(text: impl Into<String>, depth: usize) -> Self {
        Self {
            text: text.into(),
            depth,
            children: None,
        }
    }

    /// Creates an internal node owning `left` and `right`.
    pub fn internal(text: impl Into<String>, depth: usize, left: Node, right: Node) -> Self {
        Self {
            text: text.into(),
            depth,
            children: Some([Box::new(left), Box::new(right)]),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of edges between this node and the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn left(&self) -> Option<&Node> {
        self.children.as_ref().map(|[left, _]| left.as_ref())
    }

    pub fn right(&self) -> Option<&Node> {
        self.children.as_ref().map(|[_, right]| right.as_ref())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Longest path (in edges) from this node down to a leaf.
    pub fn height(&self) -> usize {
        match &self.children {
            Some([left, right]) => 1 + left.height().max(right.height()),
            None => 0,
        }
    }

    pub fn node_count(&self) -> usize {
        match &self.children {
            Some([left, right]) => 1 + left.node_count() + right.node_count(),
            None => 1,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match &self.children {
            Some([left, right]) => left.leaf_count() + right.leaf_count(),
            None => 1,
        }
    }

    /// True when every leaf sits at the same distance from this node and every
    /// child's depth is exactly one more than its parent's.
    pub fn is_perfect(&self) -> bool {
        fn check(node: &Node, leaf_depth: usize) -> bool {
            match &node.children {
                Some([left, right]) => {
                    left.depth == node.depth + 1
                        && right.depth == node.depth + 1
                        && check(left, leaf_depth)
                        && check(right, leaf_depth)
                }
                None => node.depth == leaf_depth,
            }
        }
        check(self, self.depth + self.height())
    }

    /// Leaf texts, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.leaf_count());
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.children {
            Some([left, right]) => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
            None => out.push(&self.text),
        }
    }

    /// Edge count between two leaves, identified by their left-to-right position.
    ///
    /// Only meaningful on a perfect tree: leaf `i`'s position bits spell its path from
    /// the root (0 = left), so the lowest common ancestor sits where the paths diverge
    /// and the distance is twice the number of edges below it.
    pub fn leaf_distance(&self, i: usize, j: usize) -> DomainResult<usize> {
        let leaves = self.leaf_count();
        for index in [i, j] {
            if index >= leaves {
                return Err(DomainError::LeafOutOfRange { index, leaves });
            }
        }
        let diverging = (i ^ j) as u64;
        let below_lca = (u64::BITS - diverging.leading_zeros()) as usize;
        Ok(2 * below_lca)
    }
}
