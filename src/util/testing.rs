//! Test setup and test doubles shared by unit and integration tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use tracing::{debug, info, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    prelude::*,
    EnvFilter,
};

use crate::application::prompt::source_sentence;
use crate::infrastructure::traits::{Mutator, Sleeper};
use crate::infrastructure::MutatorError;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Upper-cases the sentence at the end of the prompt. Deterministic.
#[derive(Debug, Default)]
pub struct UppercaseMutator {
    calls: AtomicUsize,
}

impl UppercaseMutator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Mutator for UppercaseMutator {
    fn invoke(&self, prompt: &str, _options: &[String]) -> Result<String, MutatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(source_sentence(prompt).unwrap_or_default().to_uppercase())
    }
}

/// Appends a marker to the sentence so every step leaves a trace.
#[derive(Debug)]
pub struct SuffixMutator {
    pub suffix: String,
}

impl Mutator for SuffixMutator {
    fn invoke(&self, prompt: &str, _options: &[String]) -> Result<String, MutatorError> {
        Ok(format!("{}{}", source_sentence(prompt).unwrap_or_default(), self.suffix))
    }
}

/// Replays a fixed list of results, then keeps failing.
#[derive(Debug)]
pub struct ScriptedMutator {
    script: Mutex<Vec<Result<String, MutatorError>>>,
    calls: AtomicUsize,
    seen_options: Mutex<Vec<Vec<String>>>,
}

impl ScriptedMutator {
    pub fn new(script: Vec<Result<String, MutatorError>>) -> Self {
        let mut script = script;
        script.reverse();
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            seen_options: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_options(&self) -> Vec<Vec<String>> {
        self.seen_options
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl Mutator for ScriptedMutator {
    fn invoke(&self, _prompt: &str, options: &[String]) -> Result<String, MutatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen_options.lock() {
            seen.push(options.to_vec());
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop())
            .unwrap_or_else(|| Err(MutatorError::CallFailed("script exhausted".into())))
    }
}

/// Fails every call with the same error.
#[derive(Debug)]
pub struct AlwaysFailingMutator {
    error: MutatorError,
    calls: AtomicUsize,
}

impl AlwaysFailingMutator {
    pub fn new(error: MutatorError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Mutator for AlwaysFailingMutator {
    fn invoke(&self, _prompt: &str, _options: &[String]) -> Result<String, MutatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// Records requested waits instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.waits().into_iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut waits) = self.waits.lock() {
            waits.push(duration);
        }
    }
}

/// Collects formatted log output of the current thread.
///
/// ```ignore
/// let logs = LogCapture::default();
/// logs.capture(|| service.mutate(&prompt, &[]));
/// assert!(logs.contents().contains("WARN"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Run `f` with a thread-local subscriber writing WARN and above into the buffer.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = fmt::Subscriber::builder()
            .with_writer(self.clone())
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if let Ok(mut buf) = self.buf.lock() {
            buf.extend_from_slice(data);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
