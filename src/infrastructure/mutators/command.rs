//! Mutator backed by an external program (`llm` by default).
//!
//! The program is invoked as `<program> [options...] <prompt>` and the mutated
//! sentence is read from stdout.

use std::sync::Arc;

use tracing::debug;

use crate::infrastructure::error::MutatorError;
use crate::infrastructure::traits::{CommandRunner, Mutator};

/// Runs an external program once per mutation.
pub struct CommandMutator {
    cmd: Arc<dyn CommandRunner>,
    program: String,
}

impl CommandMutator {
    pub fn new(cmd: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            cmd,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Mutator for CommandMutator {
    fn invoke(&self, prompt: &str, options: &[String]) -> Result<String, MutatorError> {
        let mut args: Vec<&str> = options.iter().map(String::as_str).collect();
        args.push(prompt);
        debug!("invoke: program={}, options={:?}", self.program, options);

        // Spawn failures mean the program is missing or not executable.
        let output = self.cmd.run(&self.program, &args).map_err(|e| {
            MutatorError::Unavailable(format!("unable to run `{}`: {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                match output.status.code() {
                    Some(code) => format!("{} exited with code {}", self.program, code),
                    None => format!("{} terminated by signal", self.program),
                }
            } else {
                stderr
            };
            return Err(MutatorError::CallFailed(message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
