//! Failure rendering and reportable diagnostics.
//!
//! The engine's one failure channel is the `Failure` record; this module is
//! where it becomes human-readable. Three renderings are provided: the
//! filtered `stack()` of narrative frames, the one-line `trace()`, and the
//! per-frame `verbose_trace()`. For applications that want rich terminal
//! output, [`ParseError`] adapts a failure into a `miette` diagnostic with
//! a labeled span over the named source.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use thiserror::Error;

use crate::result::{Failure, Frame, FrameKind};

// ============================================================================
// STRING LITERALIZATION
// ============================================================================

/// Escapes `s` into a printable double-quoted form: `\n`, `\t`, `\"`, `\\`,
/// and `\u{XXXX}` for other non-printables.
pub fn literalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\u{{{:04x}}}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Up to `max_chars` characters of `input` starting at byte offset `start`,
/// clamped to character boundaries. Out-of-range offsets yield "".
fn snippet(input: &str, start: usize, max_chars: usize) -> &str {
    let Some(rest) = input.get(start..) else {
        return "";
    };
    match rest.char_indices().nth(max_chars) {
        Some((end, _)) => &rest[..end],
        None => rest,
    }
}

// ============================================================================
// FAILURE RENDERING
// ============================================================================

impl Failure {
    /// The narrative stack: full frames filtered down to named rules and
    /// committed sequences, with a final synthetic frame for the node that
    /// actually failed.
    ///
    /// Named rules say where in the grammar the parse was; committed
    /// sequences say what it had already promised not to revisit.
    pub fn stack(&self) -> Vec<Frame> {
        let mut stack: Vec<Frame> = self
            .frames
            .iter()
            .filter(|f| matches!(f.kind, FrameKind::Rule | FrameKind::CutSequence))
            .cloned()
            .collect();
        stack.push(Frame {
            index: self.index,
            parser: self.parser.clone(),
            kind: FrameKind::Plain,
        });
        stack
    }

    /// One-line rendering: `rule:index` pairs joined by " / ", then a
    /// literalized peek at the input past the failure point.
    pub fn trace(&self) -> String {
        let path = self
            .stack()
            .iter()
            .map(|f| format!("{}:{}", f.parser, f.index))
            .collect::<Vec<_>>()
            .join(" / ");
        format!(
            "{path} ...{}",
            literalize(snippet(&self.input, self.index, 10))
        )
    }

    /// Multi-line rendering: one line per narrative frame with the input
    /// snippet at that frame's position.
    pub fn verbose_trace(&self) -> String {
        self.stack()
            .iter()
            .map(|f| {
                format!(
                    "{}\t...{}\t{}",
                    f.index,
                    literalize(snippet(&self.input, f.index, 5)),
                    f.parser
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serializable summary for tooling.
    pub fn report(&self) -> FailureReport {
        FailureReport {
            index: self.index,
            expected: self.parser.to_string(),
            cut: self.cut,
            frames: self
                .stack()
                .iter()
                .map(|f| FrameReport {
                    index: f.index,
                    parser: f.parser.to_string(),
                })
                .collect(),
        }
    }
}

/// Flat, serializable view of a failure.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub index: usize,
    pub expected: String,
    pub cut: bool,
    pub frames: Vec<FrameReport>,
}

/// One rendered frame of a [`FailureReport`].
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub index: usize,
    pub parser: String,
}

// ============================================================================
// REPORTABLE ERROR
// ============================================================================

/// A parse failure adapted for reporting: names the source, labels the
/// failure offset, and carries the rule trace as help text.
#[derive(Debug, Error, Diagnostic)]
#[error("expected {expected} at offset {offset}")]
#[diagnostic(code(weft::parse::failure))]
pub struct ParseError {
    #[source_code]
    src: NamedSource<String>,
    #[label("the parse could not get past this point")]
    span: SourceSpan,
    pub offset: usize,
    pub expected: String,
    #[help]
    help: Option<String>,
}

impl ParseError {
    pub fn from_failure(failure: &Failure, source_name: &str) -> Self {
        Self {
            src: NamedSource::new(source_name, failure.input.to_string()),
            span: SourceSpan::from(failure.index..failure.index),
            offset: failure.index,
            expected: failure.parser.to_string(),
            help: Some(failure.trace()),
        }
    }
}
