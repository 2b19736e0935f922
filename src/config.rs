//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <file>`, else `$XDG_CONFIG_HOME/telephone-tree/telephone-tree.toml`
//! 3. Environment variables: `TELEPHONE_TREE_*` prefix
//! 4. Command-line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Which mutation backend grows the tree.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MutatorKind {
    /// External program (`llm`-compatible: `<command> [args...] <prompt>`)
    #[default]
    Command,
    /// Offline word-list drift
    Dictionary,
}

/// Unified configuration for telephone-tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Mutation program (default: "llm")
    pub command: String,
    /// Extra arguments passed to the mutation program before the prompt
    pub llm_args: Vec<String>,
    /// Levels below the root
    pub depth: usize,
    /// One-step mutations per branch
    pub steps_per_branch: usize,
    /// Free-form edits-per-step hint, e.g. "1-3"
    pub intensity: Option<String>,
    /// Attempts per mutation call
    pub max_retries: u32,
    /// Backoff base in milliseconds
    pub backoff_ms: u64,
    /// Indentation unit per tree level
    pub indent: String,
    pub mutator: MutatorKind,
    /// Word list for the dictionary mutator
    pub dictionary: Option<PathBuf>,
    /// Largest letter edit distance of a single word substitution
    pub max_edits_per_word: usize,
    /// RNG seed for the dictionary mutator
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            command: "llm".into(),
            llm_args: vec![],
            depth: 5,
            steps_per_branch: 10,
            intensity: None,
            max_retries: 3,
            backoff_ms: 1000,
            indent: " ".into(),
            mutator: MutatorKind::Command,
            dictionary: None,
            max_edits_per_word: 2,
            seed: None,
        }
    }
}

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub command: Option<String>,
    pub llm_args: Option<Vec<String>>,
    pub depth: Option<usize>,
    pub steps_per_branch: Option<usize>,
    pub intensity: Option<String>,
    pub max_retries: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub indent: Option<String>,
    pub mutator: Option<MutatorKind>,
    pub dictionary: Option<PathBuf>,
    pub max_edits_per_word: Option<usize>,
    pub seed: Option<u64>,
}

/// Get the XDG config directory for telephone-tree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "telephone-tree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("telephone-tree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unexpandable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.command = expand_env_vars(&self.command);
        if let Some(dictionary) = &self.dictionary {
            let expanded = expand_env_vars(dictionary.to_string_lossy().as_ref());
            self.dictionary = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base). Overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            command: overlay.command.clone().unwrap_or_else(|| self.command.clone()),
            llm_args: overlay
                .llm_args
                .clone()
                .unwrap_or_else(|| self.llm_args.clone()),
            depth: overlay.depth.unwrap_or(self.depth),
            steps_per_branch: overlay.steps_per_branch.unwrap_or(self.steps_per_branch),
            intensity: overlay.intensity.clone().or_else(|| self.intensity.clone()),
            max_retries: overlay.max_retries.unwrap_or(self.max_retries),
            backoff_ms: overlay.backoff_ms.unwrap_or(self.backoff_ms),
            indent: overlay.indent.clone().unwrap_or_else(|| self.indent.clone()),
            mutator: overlay.mutator.unwrap_or(self.mutator),
            dictionary: overlay
                .dictionary
                .clone()
                .or_else(|| self.dictionary.clone()),
            max_edits_per_word: overlay.max_edits_per_word.unwrap_or(self.max_edits_per_word),
            seed: overlay.seed.or(self.seed),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist. Without it the global
    ///   XDG file is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        current = current.merge_with(&load_raw_settings(&global_path)?);
                    }
                }
            }
        }

        // 3. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply TELEPHONE_TREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TELEPHONE_TREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("llm_args"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("command") {
            settings.command = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("llm_args") {
            settings.llm_args = val;
        }
        if let Ok(val) = config.get::<usize>("depth") {
            settings.depth = val;
        }
        if let Ok(val) = config.get::<usize>("steps_per_branch") {
            settings.steps_per_branch = val;
        }
        if let Ok(val) = config.get_string("intensity") {
            settings.intensity = Some(val);
        }
        if let Ok(val) = config.get::<u32>("max_retries") {
            settings.max_retries = val;
        }
        if let Ok(val) = config.get::<u64>("backoff_ms") {
            settings.backoff_ms = val;
        }
        if let Ok(val) = config.get_string("indent") {
            settings.indent = val;
        }
        if let Ok(val) = config.get::<MutatorKind>("mutator") {
            settings.mutator = val;
        }
        if let Ok(val) = config.get_string("dictionary") {
            settings.dictionary = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<usize>("max_edits_per_word") {
            settings.max_edits_per_word = val;
        }
        if let Ok(val) = config.get::<u64>("seed") {
            settings.seed = Some(val);
        }

        Ok(settings)
    }

    /// Serialize the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
