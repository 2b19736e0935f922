//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};

use crate::config::MutatorKind;

/// Grow an ultrametric binary tree of telephone-game sentence mutations
///
/// Everything after `--` is passed to the mutation command, e.g.
/// `telephone-tree "Some sentence" -- --model gpt-4o-mini`.
#[derive(Parser, Debug)]
#[command(name = "telephone-tree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The original sentence to mutate
    #[arg(required_unless_present_any = ["completions", "show_config"])]
    pub text: Option<String>,

    /// Mutation rounds below the root (2^depth leaves) [default: 5]
    #[arg(long)]
    pub depth: Option<usize>,

    /// One-step mutations per branch [default: 10]
    #[arg(short, long)]
    pub steps_per_branch: Option<usize>,

    /// Edits per mutation step, free-form hint (e.g. "1-3")
    #[arg(short, long)]
    pub intensity: Option<String>,

    /// Attempts per mutation call, at least 1 [default: 3]
    #[arg(short = 'r', long)]
    pub max_retries: Option<u32>,

    /// Backoff base between attempts, in milliseconds [default: 1000]
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Indentation unit per tree level [default: " "]
    #[arg(long, allow_hyphen_values = true)]
    pub indent: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Indent)]
    pub format: OutputFormat,

    /// Mutation backend [default: command]
    #[arg(short, long, value_enum)]
    pub mutator: Option<MutatorKind>,

    /// Mutation command [default: llm]
    #[arg(long, value_hint = ValueHint::CommandName)]
    pub command: Option<String>,

    /// Word list for the dictionary mutator
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub dictionary: Option<PathBuf>,

    /// Largest letter edit distance per word substitution (dictionary mutator) [default: 2]
    #[arg(long)]
    pub max_edits_per_word: Option<usize>,

    /// RNG seed (dictionary mutator)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Compute sibling branches concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Config file (default: $XDG_CONFIG_HOME/telephone-tree/telephone-tree.toml)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    pub show_config: bool,

    /// Debug level (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub completions: Option<clap_complete::Shell>,

    /// Arguments passed through to the mutation command
    #[arg(last = true)]
    pub passthrough: Vec<String>,
}

/// Tree rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Inorder lines indented by depth
    #[default]
    Indent,
    /// Box-drawing tree, root first
    Tree,
}
