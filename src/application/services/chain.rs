//! Sequential mutation chain: one branch of the tree

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::prompt::build_prompt;
use crate::application::services::retry::RetryingMutator;

/// Applies `steps` one-step mutations, each feeding the next.
pub struct MutationChain {
    mutator: Arc<RetryingMutator>,
    steps: usize,
    intensity: Option<String>,
    options: Vec<String>,
}

impl MutationChain {
    pub fn new(mutator: Arc<RetryingMutator>, steps: usize) -> Self {
        Self {
            mutator,
            steps,
            intensity: None,
            options: Vec::new(),
        }
    }

    /// Free-form edit-count hint embedded in every prompt.
    pub fn with_intensity(mut self, intensity: Option<String>) -> Self {
        self.intensity = intensity;
        self
    }

    /// Pass-through options forwarded on every call.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Run the chain from `sentence`. A step that yields nothing keeps the previous
    /// sentence, so a non-empty input never turns into an empty output.
    pub fn run(&self, sentence: &str) -> String {
        let mut current = sentence.to_string();
        for step in 1..=self.steps {
            let prompt = build_prompt(&current, self.intensity.as_deref());
            let mutated = self.mutator.mutate(&prompt, &self.options);
            if !mutated.is_empty() {
                current = mutated;
            }
            debug!("run: step {}/{}: {}", step, self.steps, current);
        }
        if self.steps > 0 {
            info!("branch done after {} steps: {}", self.steps, current);
        }
        current
    }
}
