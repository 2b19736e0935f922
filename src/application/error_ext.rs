//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add a description of the failed action to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// writeln!(out, "{}", line).with_action_context("write tree")?;
    /// ```
    fn with_action_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_action_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: action.to_string(),
            source: Box::new(e),
        })
    }
}
