//! Tree rendering
//!
//! The primary rendering is an inorder listing (left subtree, node, right subtree)
//! with each line indented by one unit per level below the root. Reading the lines
//! top to bottom, siblings bracket their parent.

use std::io::Write;

use termtree::Tree;

use crate::application::error_ext::IoResultExt;
use crate::application::ApplicationResult;
use crate::domain::Node;

/// Inorder, depth-indented printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePrinter {
    indent: String,
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new(" ")
    }
}

impl TreePrinter {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }

    /// Output lines in inorder sequence.
    pub fn lines(&self, root: &Node) -> Vec<String> {
        let mut lines = Vec::with_capacity(root.node_count());
        self.collect(root, &mut lines);
        lines
    }

    fn collect(&self, node: &Node, lines: &mut Vec<String>) {
        if let Some(left) = node.left() {
            self.collect(left, lines);
        }
        lines.push(format!("{}{}", self.indent.repeat(node.depth()), node.text()));
        if let Some(right) = node.right() {
            self.collect(right, lines);
        }
    }

    /// Write one line per node to `out`.
    pub fn write<W: Write>(&self, root: &Node, out: &mut W) -> ApplicationResult<()> {
        for line in self.lines(root) {
            writeln!(out, "{}", line).with_action_context("write tree")?;
        }
        out.flush().with_action_context("flush tree output")
    }
}

/// Conversion into a box-drawing `termtree` (preorder, root on top).
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for Node {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = [self.left(), self.right()]
            .into_iter()
            .flatten()
            .map(|child| child.to_tree_string())
            .collect();
        Tree::new(self.text().to_string()).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::internal("b", 0, Node::leaf("a", 1), Node::leaf("c", 1))
    }

    #[test]
    fn test_lines_inorder() {
        assert_eq!(TreePrinter::default().lines(&sample()), vec![" a", "b", " c"]);
    }

    #[test]
    fn test_custom_indent_unit() {
        assert_eq!(
            TreePrinter::new("..").lines(&sample()),
            vec!["..a", "b", "..c"]
        );
    }

    #[test]
    fn test_box_tree_has_root_first() {
        let rendered = sample().to_tree_string().to_string();
        let first = rendered.lines().next().unwrap();
        assert_eq!(first, "b");
        assert!(rendered.contains("a"));
        assert!(rendered.contains("c"));
    }
}
