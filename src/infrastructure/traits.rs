//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::process::Output;
use std::time::Duration;

use crate::infrastructure::error::MutatorError;

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments, capturing stdout and stderr.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;
}

/// Single-step sentence mutation.
///
/// Implementations turn a prompt (whose last non-blank line is the sentence) into a
/// slightly different sentence. `options` are opaque pass-through arguments for the
/// underlying tool.
pub trait Mutator: Send + Sync {
    fn invoke(&self, prompt: &str, options: &[String]) -> Result<String, MutatorError>;
}

/// Blocking wait used between retry attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        std::process::Command::new(cmd)
            .args(args)
            .stdin(std::process::Stdio::null())
            .output()
    }
}

/// Sleeps on the calling thread.
#[derive(Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
