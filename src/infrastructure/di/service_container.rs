//! Service container for dependency injection
//!
//! Wires the configured mutator through the retry decorator, the mutation chain
//! and the tree builder.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{
    Expansion, MutationChain, RetryPolicy, RetryingMutator, TreeBuilder,
};
use crate::application::{ApplicationError, TreePrinter};
use crate::config::{MutatorKind, Settings};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::mutators::{CommandMutator, DictionaryMutator};
use crate::infrastructure::traits::{
    CommandRunner, Mutator, RealCommandRunner, Sleeper, ThreadSleeper,
};

/// Container holding the wired services for one run.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Raw single-call mutator
    pub mutator: Arc<dyn Mutator>,

    /// Backoff wait implementation
    pub sleeper: Arc<dyn Sleeper>,
}

impl ServiceContainer {
    /// Create a container with the mutator selected by `settings`.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let mutator = Self::mutator_from_settings(&settings, Arc::new(RealCommandRunner))?;
        Ok(Self::with_deps(settings, mutator, Arc::new(ThreadSleeper)))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        mutator: Arc<dyn Mutator>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            mutator,
            sleeper,
        }
    }

    fn mutator_from_settings(
        settings: &Settings,
        cmd: Arc<dyn CommandRunner>,
    ) -> InfraResult<Arc<dyn Mutator>> {
        match settings.mutator {
            MutatorKind::Command => {
                debug!("mutator: command `{}`", settings.command);
                Ok(Arc::new(CommandMutator::new(cmd, settings.command.clone())))
            }
            MutatorKind::Dictionary => {
                let path = settings.dictionary.as_ref().ok_or_else(|| {
                    InfraError::from(ApplicationError::Config {
                        message: "dictionary mutator requires a dictionary file".into(),
                    })
                })?;
                debug!("mutator: dictionary {}", path.display());
                Ok(Arc::new(DictionaryMutator::from_file(
                    path,
                    settings.max_edits_per_word,
                    settings.seed,
                )?))
            }
        }
    }

    pub fn retrying_mutator(&self) -> Arc<RetryingMutator> {
        Arc::new(RetryingMutator::new(
            self.mutator.clone(),
            self.sleeper.clone(),
            RetryPolicy::new(self.settings.max_retries, self.settings.backoff()),
        ))
    }

    pub fn mutation_chain(&self) -> Arc<MutationChain> {
        Arc::new(
            MutationChain::new(self.retrying_mutator(), self.settings.steps_per_branch)
                .with_intensity(self.settings.intensity.clone())
                .with_options(self.settings.llm_args.clone()),
        )
    }

    pub fn tree_builder(&self, expansion: Expansion) -> TreeBuilder {
        TreeBuilder::new(self.mutation_chain(), self.settings.depth).with_expansion(expansion)
    }

    pub fn printer(&self) -> TreePrinter {
        TreePrinter::new(self.settings.indent.clone())
    }
}
