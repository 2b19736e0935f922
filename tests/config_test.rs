//! Integration tests for Settings config loading.
//!
//! Precedence: defaults → config file → TELEPHONE_TREE_* env vars → CLI flags.
//!
//! Note: These tests use explicit config files in temp directories, so any
//! global config of the machine running them is not consulted.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use telephone_tree::application::ApplicationError;
use telephone_tree::config::{MutatorKind, Settings};

// ============================================================
// Settings::load() with an explicit file
// ============================================================

#[test]
fn given_config_file_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("telephone-tree.toml");
    let content = r#"
command = "my-llm"
llm_args = ["--model", "gpt-4o-mini"]
depth = 3
intensity = "1-3"
backoff_ms = 250
"#;
    fs::write(&path, content).unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.command, "my-llm");
    assert_eq!(settings.llm_args, vec!["--model", "gpt-4o-mini"]);
    assert_eq!(settings.depth, 3);
    assert_eq!(settings.intensity.as_deref(), Some("1-3"));
    assert_eq!(settings.backoff_ms, 250);
    // Unspecified fields keep their defaults
    assert_eq!(settings.steps_per_branch, 10);
    assert_eq!(settings.max_retries, 3);
    assert_eq!(settings.mutator, MutatorKind::Command);
}

#[test]
fn given_dictionary_config_when_load_then_mutator_kind_and_path_parsed() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
mutator = "dictionary"
dictionary = "/usr/share/dict/words"
max_edits_per_word = 1
seed = 42
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).unwrap();

    // Assert
    assert_eq!(settings.mutator, MutatorKind::Dictionary);
    assert_eq!(
        settings.dictionary,
        Some(PathBuf::from("/usr/share/dict/words"))
    );
    assert_eq!(settings.max_edits_per_word, 1);
    assert_eq!(settings.seed, Some(42));
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(&dir.path().join("nope.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error_names_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "depth = \"three\"\n").unwrap();

    // Act
    let result = Settings::load(Some(&path));

    // Assert
    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("broken.toml")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn given_settings_when_to_toml_then_round_trips_through_load() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("effective.toml");
    let mut settings = Settings::default();
    settings.depth = 2;
    settings.indent = "..".into();

    // Act
    fs::write(&path, settings.to_toml().unwrap()).unwrap();
    let loaded = Settings::load(Some(&path)).unwrap();

    // Assert
    assert_eq!(loaded.depth, 2);
    assert_eq!(loaded.indent, "..");
}
