//! Infrastructure-level errors (wraps application errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dictionary {}: {message}", path.display())]
    Dictionary { path: PathBuf, message: String },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;

/// Failure of a single mutation call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutatorError {
    /// The mutation tool cannot be located or started. Retrying will not help.
    #[error("mutation tool unavailable: {0}")]
    Unavailable(String),

    /// The tool ran but reported failure.
    #[error("{0}")]
    CallFailed(String),

    /// The tool succeeded but printed nothing usable.
    #[error("mutation returned empty output")]
    EmptyOutput,
}

impl MutatorError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, MutatorError::Unavailable(_))
    }
}
