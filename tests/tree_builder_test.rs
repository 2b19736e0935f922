//! Tests for TreeBuilder: structure, ordering and determinism of the grown tree

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;

use telephone_tree::application::prompt::source_sentence;
use telephone_tree::application::services::{
    Expansion, MutationChain, RetryPolicy, RetryingMutator, TreeBuilder,
};
use telephone_tree::application::{ApplicationError, TreePrinter};
use telephone_tree::domain::{DomainError, Node, MAX_DEPTH};
use telephone_tree::infrastructure::traits::Mutator;
use telephone_tree::infrastructure::MutatorError;
use telephone_tree::util::testing::{
    init_test_setup, AlwaysFailingMutator, RecordingSleeper, SuffixMutator, UppercaseMutator,
};

fn builder(mutator: Arc<dyn Mutator>, depth: usize, steps: usize) -> TreeBuilder {
    let retrying = Arc::new(RetryingMutator::new(
        mutator,
        Arc::new(RecordingSleeper::default()),
        RetryPolicy::new(3, Duration::ZERO),
    ));
    TreeBuilder::new(Arc::new(MutationChain::new(retrying, steps)), depth)
}

/// Appends the global call number, exposing the order of mutation calls.
#[derive(Default)]
struct CountingMutator {
    calls: AtomicUsize,
}

impl Mutator for CountingMutator {
    fn invoke(&self, prompt: &str, _options: &[String]) -> Result<String, MutatorError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{}.{}", source_sentence(prompt).unwrap_or_default(), n))
    }
}

fn leaf_depths(node: &Node, out: &mut Vec<usize>) {
    match (node.left(), node.right()) {
        (Some(left), Some(right)) => {
            leaf_depths(left, out);
            leaf_depths(right, out);
        }
        _ => out.push(node.depth()),
    }
}

// ============================================================
// Structure
// ============================================================

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
fn given_depth_when_build_then_tree_is_perfect(#[case] depth: usize) {
    init_test_setup();
    // Arrange
    let builder = builder(Arc::new(UppercaseMutator::default()), depth, 1);

    // Act
    let root = builder.build("Hello world").unwrap();

    // Assert
    assert_eq!(root.leaf_count(), 1 << depth);
    assert_eq!(root.node_count(), (1 << (depth + 1)) - 1);
    assert_eq!(root.height(), depth);
    assert!(root.is_perfect());
    let mut depths = Vec::new();
    leaf_depths(&root, &mut depths);
    assert!(depths.iter().all(|d| *d == depth));
}

#[test]
fn given_depth_zero_when_build_then_single_unmutated_root() {
    // Arrange
    let upper = Arc::new(UppercaseMutator::default());
    let builder = builder(upper.clone(), 0, 10);

    // Act
    let root = builder.build("Hello world").unwrap();

    // Assert
    assert!(root.is_leaf());
    assert_eq!(root.text(), "Hello world");
    assert_eq!(root.depth(), 0);
    assert_eq!(upper.calls(), 0);
    assert_eq!(TreePrinter::default().lines(&root), vec!["Hello world"]);
}

#[test]
fn given_hello_world_scenario_when_build_then_children_are_uppercased() {
    // Arrange
    let builder = builder(Arc::new(UppercaseMutator::default()), 1, 1);

    // Act
    let root = builder.build("Hello world").unwrap();

    // Assert
    assert_eq!(root.text(), "Hello world");
    assert_eq!(root.left().unwrap().text(), "HELLO WORLD");
    assert_eq!(root.left().unwrap().depth(), 1);
    assert_eq!(root.right().unwrap().text(), "HELLO WORLD");
    assert_eq!(root.right().unwrap().depth(), 1);
    assert_eq!(
        TreePrinter::default().lines(&root),
        vec![" HELLO WORLD", "Hello world", " HELLO WORLD"]
    );
}

#[rstest]
#[case(1, 1)]
#[case(2, 3)]
#[case(3, 2)]
fn given_steps_when_build_then_two_chains_per_internal_node(
    #[case] depth: usize,
    #[case] steps: usize,
) {
    // Arrange
    let upper = Arc::new(UppercaseMutator::default());
    let builder = builder(upper.clone(), depth, steps);

    // Act
    builder.build("Hello world").unwrap();

    // Assert
    let internal_nodes = (1 << depth) - 1;
    assert_eq!(upper.calls(), 2 * steps * internal_nodes);
}

#[test]
fn given_steps_when_build_then_every_leaf_carries_depth_times_steps_mutations() {
    // Arrange
    let suffix = Arc::new(SuffixMutator {
        suffix: "'".to_string(),
    });
    let builder = builder(suffix, 3, 2);

    // Act
    let root = builder.build("x").unwrap();

    // Assert
    assert!(root.leaves().iter().all(|leaf| *leaf == "x''''''"));
}

// ============================================================
// Ordering
// ============================================================

#[test]
fn given_sequential_expansion_when_build_then_left_subtree_completes_before_right() {
    // Arrange
    let builder = builder(Arc::new(CountingMutator::default()), 2, 1);

    // Act
    let root = builder.build("s").unwrap();

    // Assert: both children of a node first, then the whole left subtree
    assert_eq!(
        TreePrinter::default().lines(&root),
        vec!["  s.1.3", " s.1", "  s.1.4", "s", "  s.2.5", " s.2", "  s.2.6"]
    );
}

#[test]
fn given_right_branch_when_build_then_derived_from_parent_not_left_sibling() {
    // Arrange
    let builder = builder(Arc::new(CountingMutator::default()), 1, 2);

    // Act
    let root = builder.build("s").unwrap();

    // Assert
    assert_eq!(root.left().unwrap().text(), "s.1.2");
    assert_eq!(root.right().unwrap().text(), "s.3.4");
}

// ============================================================
// Determinism and parallel expansion
// ============================================================

#[test]
fn given_deterministic_mutator_when_built_twice_then_trees_are_identical() {
    // Arrange
    let first = builder(Arc::new(UppercaseMutator::default()), 3, 2);
    let second = builder(Arc::new(UppercaseMutator::default()), 3, 2);

    // Act
    let a = first.build("The books that the world calls immoral").unwrap();
    let b = second.build("The books that the world calls immoral").unwrap();

    // Assert
    assert_eq!(a, b);
}

#[test]
fn given_parallel_expansion_when_build_then_same_tree_as_sequential() {
    // Arrange
    let suffix = || {
        Arc::new(SuffixMutator {
            suffix: "~".to_string(),
        })
    };
    let sequential = builder(suffix(), 4, 2);
    let parallel = builder(suffix(), 4, 2).with_expansion(Expansion::Parallel);

    // Act
    let a = sequential.build("drift").unwrap();
    let b = parallel.build("drift").unwrap();

    // Assert
    assert_eq!(a, b);
    assert!(b.is_perfect());
}

// ============================================================
// Failure handling and validation
// ============================================================

#[test]
fn given_failing_mutator_when_build_then_branches_copy_parent_text() {
    // Arrange
    let failing = Arc::new(AlwaysFailingMutator::new(MutatorError::CallFailed(
        "boom".into(),
    )));
    let builder = builder(failing.clone(), 2, 2);

    // Act
    let root = builder.build("unchanged").unwrap();

    // Assert
    assert_eq!(root.node_count(), 7);
    assert!(root.leaves().iter().all(|leaf| *leaf == "unchanged"));
    assert_eq!(failing.calls(), 3 * 2 * 2 * 3);
}

#[test]
fn given_blank_text_when_build_then_empty_text_error() {
    let builder = builder(Arc::new(UppercaseMutator::default()), 1, 1);

    let result = builder.build("  \n ");

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::EmptyText))
    ));
}

#[test]
fn given_depth_above_max_when_build_then_depth_error() {
    let builder = builder(Arc::new(UppercaseMutator::default()), MAX_DEPTH + 1, 1);

    let result = builder.build("Hello world");

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::DepthTooLarge { .. }))
    ));
}

#[test]
fn given_multiline_text_when_build_then_only_line_breaks_are_replaced() {
    let builder = builder(Arc::new(UppercaseMutator::default()), 0, 1);

    let root = builder.build("Hello\n  world ").unwrap();

    assert_eq!(root.text(), "Hello   world ");
    assert_eq!(TreePrinter::default().lines(&root).len(), 1);
}

#[rstest]
#[case("Hello  world")]
#[case("  Hello world")]
#[case("Hello world\t ")]
fn given_depth_zero_when_build_then_root_text_is_verbatim(#[case] text: &str) {
    // Arrange
    let builder = builder(Arc::new(UppercaseMutator::default()), 0, 10);

    // Act
    let root = builder.build(text).unwrap();

    // Assert
    assert_eq!(root.text(), text);
    assert_eq!(TreePrinter::default().lines(&root), vec![text.to_string()]);
}

// ============================================================
// Ultrametric distances
// ============================================================

#[test]
fn given_built_tree_when_measuring_leaf_distances_then_strong_triangle_inequality_holds() {
    // Arrange
    let depth = 3;
    let root = builder(Arc::new(UppercaseMutator::default()), depth, 1)
        .build("Hello world")
        .unwrap();
    let leaves = root.leaf_count();

    // Act / Assert
    assert_eq!(root.leaf_distance(0, leaves - 1).unwrap(), 2 * depth);
    for i in 0..leaves {
        assert_eq!(root.leaf_distance(i, i).unwrap(), 0);
        for j in 0..leaves {
            let d_ij = root.leaf_distance(i, j).unwrap();
            assert_eq!(d_ij, root.leaf_distance(j, i).unwrap());
            for k in 0..leaves {
                let d_ik = root.leaf_distance(i, k).unwrap();
                let d_jk = root.leaf_distance(j, k).unwrap();
                assert!(d_ik <= d_ij.max(d_jk));
            }
        }
    }
}
