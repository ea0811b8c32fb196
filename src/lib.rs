//! weft — recursive-descent parser combinators.
//!
//! Grammars are immutable trees of parser nodes, built bottom-up from
//! atomic parsers and composed with combinators: sequencing (with optional
//! commit points), ordered choice, repetition, optionals, lookahead,
//! capture, and lazily-bound named rules for recursion. Running a parser
//! yields either a typed value with the index it consumed up to, or a
//! structured failure that knows the deepest point reached and, with
//! tracing on, the named rules it was inside.
//!
//! ```
//! use weft::prelude::*;
//!
//! let word = chars_while_min("letter", |c| c.is_ascii_alphabetic(), 1).capture();
//! let greeting = lit("hello ").ignore_then(word).then_ignore(end());
//!
//! match greeting.parse("hello world") {
//!     ParseResult::Success(s) => {
//!         assert_eq!(s.value, "world");
//!         assert_eq!(s.index, 11);
//!     }
//!     ParseResult::Failure(f) => panic!("{}", f.trace()),
//! }
//! ```
//!
//! Backtracking is the default: ordered choice tries alternatives until one
//! succeeds. A commit point (`then_cut` and friends, the `~!` of the
//! combinator algebra) makes failures past it final, so errors surface
//! where the grammar author expected the input to be well-formed instead of
//! at the outermost choice.

pub mod aggregate;
pub mod atoms;
pub mod charset;
pub mod combinators;
pub mod context;
pub mod diagnostics;
pub mod parser;
pub mod result;
pub mod trie;
pub mod walker;

pub use crate::context::{BufferSink, LogSink, ParseContext, StderrSink};
pub use crate::diagnostics::{literalize, FailureReport, ParseError};
pub use crate::parser::{ParseNode, Parser, ParserHandle};
pub use crate::result::{Failure, Frame, FrameKind, ParseResult, Success};
pub use crate::walker::ScopedWalker;

/// The common surface for writing grammars: atom constructors, the parser
/// type, results, and the rule helper.
pub mod prelude {
    pub use crate::atoms::{
        any_char, ch, char_in, char_pred, chars_while, chars_while_min, end, fail, lit, pass,
        start, string_in,
    };
    pub use crate::combinators::{not, peek, rule};
    pub use crate::parser::Parser;
    pub use crate::result::{Failure, ParseResult, Success};
}
