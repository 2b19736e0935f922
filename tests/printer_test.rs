//! Tests for TreePrinter and the box-tree rendering

use rstest::rstest;

use telephone_tree::application::{TreeNodeConvert, TreePrinter};
use telephone_tree::domain::Node;

/// Perfect tree whose node texts are their depths.
fn perfect(depth: usize, level: usize) -> Node {
    let text = format!("level{}", level);
    if level == depth {
        Node::leaf(text, level)
    } else {
        Node::internal(
            text,
            level,
            perfect(depth, level + 1),
            perfect(depth, level + 1),
        )
    }
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(4)]
fn given_perfect_tree_when_print_then_line_count_and_indent_match_depth(#[case] depth: usize) {
    // Arrange
    let root = perfect(depth, 0);

    // Act
    let lines = TreePrinter::default().lines(&root);

    // Assert
    assert_eq!(lines.len(), (1 << (depth + 1)) - 1);
    for line in &lines {
        let text = line.trim_start_matches(' ');
        let indent = line.len() - text.len();
        assert_eq!(text, format!("level{}", indent));
    }
    // Root sits in the middle of an inorder listing
    assert_eq!(lines[lines.len() / 2], "level0");
}

#[test]
fn given_tree_when_write_then_lines_go_to_stream() {
    // Arrange
    let root = Node::internal(
        "Hello world",
        0,
        Node::leaf("HELLO WORLD", 1),
        Node::leaf("HELLO WORLD", 1),
    );
    let mut out: Vec<u8> = Vec::new();

    // Act
    TreePrinter::default().write(&root, &mut out).unwrap();

    // Assert
    assert_eq!(
        String::from_utf8(out).unwrap(),
        " HELLO WORLD\nHello world\n HELLO WORLD\n"
    );
}

#[test]
fn given_tab_indent_when_print_then_one_unit_per_level() {
    let root = perfect(2, 0);

    let lines = TreePrinter::new("\t").lines(&root);

    assert_eq!(lines[0], "\t\tlevel2");
    assert_eq!(lines[1], "\tlevel1");
    assert_eq!(lines[3], "level0");
}

#[test]
fn given_tree_when_box_rendering_then_preorder_with_all_nodes() {
    // Arrange
    let root = perfect(2, 0);

    // Act
    let rendered = root.to_tree_string().to_string();

    // Assert
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "level0");
    assert!(lines[1].ends_with("level1"));
    assert!(lines[2].ends_with("level2"));
}
