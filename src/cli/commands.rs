//! Command dispatch: settings resolution, tree growth and rendering

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Generator};
use tracing::{debug, instrument};

use crate::application::services::Expansion;
use crate::application::{IoResultExt, TreeNodeConvert};
use crate::cli::args::{Cli, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{MutatorKind, Settings};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        print_completions(shell, &mut cmd);
        return Ok(());
    }

    let settings = resolve_settings(cli)?;
    if cli.show_config {
        output::info(&settings.to_toml()?);
        return Ok(());
    }

    let text = cli
        .text
        .as_deref()
        .ok_or_else(|| CliError::Usage("missing original text".into()))?;

    if settings.mutator == MutatorKind::Dictionary && !settings.llm_args.is_empty() {
        output::warning("pass-through arguments are ignored by the dictionary mutator");
    }

    let container = ServiceContainer::new(settings)?;
    let expansion = if cli.parallel {
        Expansion::Parallel
    } else {
        Expansion::Sequential
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    grow_and_print(&container, text, cli.format, expansion, &mut out)
}

fn print_completions<G: Generator>(gen: G, cmd: &mut clap::Command) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, &mut io::stdout());
}

/// Load layered settings and apply command-line flags on top.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    apply_cli_overrides(settings, cli)
}

/// Command-line flags are the highest-precedence layer.
pub fn apply_cli_overrides(mut settings: Settings, cli: &Cli) -> CliResult<Settings> {
    if let Some(depth) = cli.depth {
        settings.depth = depth;
    }
    if let Some(steps) = cli.steps_per_branch {
        settings.steps_per_branch = steps;
    }
    if let Some(intensity) = &cli.intensity {
        settings.intensity = Some(intensity.clone());
    }
    if let Some(max_retries) = cli.max_retries {
        settings.max_retries = max_retries;
    }
    if let Some(backoff_ms) = cli.backoff_ms {
        settings.backoff_ms = backoff_ms;
    }
    if let Some(indent) = &cli.indent {
        settings.indent = indent.clone();
    }
    if let Some(mutator) = cli.mutator {
        settings.mutator = mutator;
    }
    if let Some(command) = &cli.command {
        settings.command = command.clone();
    }
    if let Some(dictionary) = &cli.dictionary {
        settings.dictionary = Some(dictionary.clone());
    }
    if let Some(max_edits) = cli.max_edits_per_word {
        settings.max_edits_per_word = max_edits;
    }
    if let Some(seed) = cli.seed {
        settings.seed = Some(seed);
    }
    if !cli.passthrough.is_empty() {
        settings.llm_args = cli.passthrough.clone();
    }

    if settings.max_retries == 0 {
        return Err(CliError::InvalidArgs("max-retries must be at least 1".into()));
    }
    if settings.mutator == MutatorKind::Dictionary && settings.dictionary.is_none() {
        return Err(CliError::InvalidArgs(
            "--mutator dictionary requires --dictionary <FILE>".into(),
        ));
    }
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

/// Build the tree for `text` and write it to `out` in the requested format.
#[instrument(level = "debug", skip(container, out))]
pub fn grow_and_print<W: Write>(
    container: &ServiceContainer,
    text: &str,
    format: OutputFormat,
    expansion: Expansion,
    out: &mut W,
) -> CliResult<()> {
    let root = container.tree_builder(expansion).build(text)?;
    debug!(
        "tree complete: {} nodes, {} leaves",
        root.node_count(),
        root.leaf_count()
    );
    match format {
        OutputFormat::Indent => container.printer().write(&root, out)?,
        OutputFormat::Tree => {
            write!(out, "{}", root.to_tree_string()).with_action_context("write tree")?;
            out.flush().with_action_context("flush tree output")?;
        }
    }
    Ok(())
}
