//! Retry, backoff and fallback around a single mutation call
//!
//! `RetryingMutator` decorates any [`Mutator`] so that a mutation never fails:
//! retryable failures are retried with exponential backoff, an unavailable tool
//! stops the loop at once, and when nothing worked the sentence embedded in the
//! prompt is handed back unchanged.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::application::prompt::{normalize_whitespace, source_sentence};
use crate::infrastructure::traits::{Mutator, Sleeper};
use crate::infrastructure::MutatorError;

/// Attempt bound and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// `max_retries` below 1 is raised to 1: there is always one attempt.
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            backoff,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Wait after the failed attempt `attempt` (0-based): `backoff * 2^attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.backoff.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Sum of all waits when every attempt fails (none after the last one).
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries - 1)
            .map(|attempt| self.delay(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Wraps a [`Mutator`] so that a mutation call never fails.
pub struct RetryingMutator {
    inner: Arc<dyn Mutator>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl RetryingMutator {
    pub fn new(inner: Arc<dyn Mutator>, sleeper: Arc<dyn Sleeper>, policy: RetryPolicy) -> Self {
        Self {
            inner,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Mutate with retries; falls back to the prompt's last non-blank line.
    ///
    /// A result counts only if it is non-empty after whitespace normalization,
    /// and it is returned normalized.
    pub fn mutate(&self, prompt: &str, options: &[String]) -> String {
        self.attempt(prompt, options).text
    }

    /// Like [`mutate`](Self::mutate), also reporting how the result was reached.
    pub fn attempt(&self, prompt: &str, options: &[String]) -> MutationOutcome {
        let attempts = self.policy.max_retries;
        let mut last_err = MutatorError::EmptyOutput;
        let mut made = 0;

        for attempt in 0..attempts {
            made = attempt + 1;
            match self.inner.invoke(prompt, options) {
                Ok(output) => {
                    let normalized = normalize_whitespace(&output);
                    if !normalized.is_empty() {
                        debug!("mutate: attempt {} succeeded", made);
                        return MutationOutcome {
                            text: normalized,
                            attempts: made,
                            failure: None,
                        };
                    }
                    last_err = MutatorError::EmptyOutput;
                }
                Err(e) => {
                    debug!("mutate: attempt {} failed: {}", made, e);
                    let retryable = e.is_retryable();
                    last_err = e;
                    if !retryable {
                        break;
                    }
                }
            }
            if made < attempts {
                self.sleeper.sleep(self.policy.delay(attempt));
            }
        }

        warn!("mutation failed after {} attempts: {}", made, last_err);
        MutationOutcome {
            text: source_sentence(prompt).unwrap_or_default().to_string(),
            attempts: made,
            failure: Some(last_err),
        }
    }
}

/// Text produced by [`RetryingMutator::attempt`] and the attempts spent on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub text: String,
    pub attempts: u32,
    /// Last error when every attempt failed and `text` is the fallback.
    pub failure: Option<MutatorError>,
}

impl MutationOutcome {
    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}
