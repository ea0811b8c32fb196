//! Per-parse execution state and log sinks.
//!
//! A `ParseContext` lives for exactly one top-level parse. Parser nodes are
//! immutable and shareable; everything that changes while parsing lives here.

use std::sync::{Arc, Mutex};

// ============================================================================
// PARSE CONTEXT
// ============================================================================

/// Mutable state for one top-level parse.
///
/// Holds the input text, the current logging depth (incremented only through
/// logged scopes), and whether failures should accumulate trace frames.
pub struct ParseContext {
    input: Arc<str>,
    log_depth: usize,
    trace: bool,
}

impl ParseContext {
    pub fn new(input: Arc<str>, trace: bool) -> Self {
        Self {
            input,
            log_depth: 0,
            trace,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Shared handle to the input, cloned into failures so they can render
    /// themselves without the caller re-supplying the text.
    pub(crate) fn input_arc(&self) -> Arc<str> {
        Arc::clone(&self.input)
    }

    pub fn trace(&self) -> bool {
        self.trace
    }

    pub fn log_depth(&self) -> usize {
        self.log_depth
    }

    pub(crate) fn enter_log(&mut self) {
        self.log_depth += 1;
    }

    pub(crate) fn exit_log(&mut self) {
        self.log_depth -= 1;
    }
}

// ============================================================================
// LOG SINKS - injected writers for the logged combinator
// ============================================================================

/// Destination for the lines emitted by logged parsers.
///
/// The engine only formats and emits; where the lines go is the caller's
/// concern.
pub trait LogSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes log lines to stderr.
pub struct StderrSink;

impl LogSink for StderrSink {
    fn emit(&self, line: &str) {
        eprintln!("{line}");
    }
}

/// Collects log lines into memory, for tests or programmatic capture.
#[derive(Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log buffer poisoned").clone()
    }
}

impl LogSink for BufferSink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .expect("log buffer poisoned")
            .push(line.to_string());
    }
}
