//! Single-child combinators: capture, map, optional, lookahead, negation,
//! and logging.

use std::fmt;
use std::sync::Arc;

use crate::aggregate::Optioner;
use crate::context::{LogSink, ParseContext};
use crate::parser::{ParseNode, Parser, ParserHandle};
use crate::result::{Failure, ParseResult};
use crate::walker::ScopedWalker;

// ============================================================================
// CAPTURE
// ============================================================================

/// Replaces the child's value with the slice of input it consumed.
pub struct Capturing<T> {
    inner: Parser<T>,
}

impl<T> Capturing<T> {
    pub(crate) fn new(inner: Parser<T>) -> Self {
        Self { inner }
    }
}

impl<T: 'static> ParseNode<String> for Capturing<T> {
    fn parse_rec(
        &self,
        _handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<String> {
        match self.inner.parse_rec(ctx, index) {
            ParseResult::Success(s) => {
                let text = ctx.input()[index..s.index].to_string();
                ParseResult::success(text, s.index, s.cut)
            }
            ParseResult::Failure(f) => ParseResult::Failure(f),
        }
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<String> {
        Parser::from_node(Capturing::new(walker.walk(&self.inner)))
    }
}

impl<T> fmt::Display for Capturing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.!", self.inner)
    }
}

// ============================================================================
// MAP
// ============================================================================

/// Transforms the child's value through a pure function. Failures pass
/// through untouched.
pub struct Mapper<A, T> {
    inner: Parser<A>,
    f: Arc<dyn Fn(A) -> T + Send + Sync>,
}

impl<A, T> Mapper<A, T> {
    pub(crate) fn new(inner: Parser<A>, f: impl Fn(A) -> T + Send + Sync + 'static) -> Self {
        Self {
            inner,
            f: Arc::new(f),
        }
    }
}

impl<A: 'static, T: 'static> ParseNode<T> for Mapper<A, T> {
    fn parse_rec(
        &self,
        _handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<T> {
        self.inner.parse_rec(ctx, index).map_value(|v| (self.f)(v))
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<T> {
        Parser::from_node(Mapper {
            inner: walker.walk(&self.inner),
            f: Arc::clone(&self.f),
        })
    }
}

impl<A, T> fmt::Display for Mapper<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

// ============================================================================
// OPTIONAL
// ============================================================================

/// Succeeds whether or not the child does, except when the child's failure
/// is committed: a cut failure must surface.
pub struct Optional<T, O> {
    inner: Parser<T>,
    optioner: O,
}

impl<T, O> Optional<T, O> {
    pub(crate) fn new(inner: Parser<T>, optioner: O) -> Self {
        Self { inner, optioner }
    }
}

impl<T, O> ParseNode<O::Output> for Optional<T, O>
where
    T: 'static,
    O: Optioner<T> + 'static,
    O::Output: 'static,
{
    fn parse_rec(
        &self,
        _handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<O::Output> {
        match self.inner.parse_rec(ctx, index) {
            ParseResult::Success(s) => {
                ParseResult::success(self.optioner.some(s.value), s.index, s.cut)
            }
            ParseResult::Failure(f) if f.cut => ParseResult::Failure(f),
            ParseResult::Failure(_) => ParseResult::success(self.optioner.none(), index, false),
        }
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<O::Output> {
        Parser::from_node(Optional::new(walker.walk(&self.inner), self.optioner.clone()))
    }
}

impl<T, O> fmt::Display for Optional<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.?", self.inner)
    }
}

// ============================================================================
// LOOKAHEAD / NEGATION
// ============================================================================

/// Zero-width assertion that the child succeeds here. Keeps the child's
/// value, consumes nothing, never commits.
pub struct Lookahead<T> {
    inner: Parser<T>,
}

impl<T: 'static> ParseNode<T> for Lookahead<T> {
    fn parse_rec(
        &self,
        _handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<T> {
        match self.inner.parse_rec(ctx, index) {
            ParseResult::Success(s) => ParseResult::success(s.value, index, false),
            ParseResult::Failure(f) => ParseResult::Failure(f),
        }
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<T> {
        Parser::from_node(Lookahead {
            inner: walker.walk(&self.inner),
        })
    }
}

impl<T> fmt::Display for Lookahead<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{}", self.inner)
    }
}

/// Zero-width assertion that the child fails here. Never propagates the
/// child's cut in either direction.
pub struct Negation<T> {
    inner: Parser<T>,
}

impl<T: 'static> ParseNode<()> for Negation<T> {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        match self.inner.parse_rec(ctx, index) {
            ParseResult::Success(s) => ParseResult::Failure(Failure::at(
                ctx.input_arc(),
                s.index,
                Arc::clone(handle),
                false,
            )),
            ParseResult::Failure(_) => ParseResult::success((), index, false),
        }
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<()> {
        Parser::from_node(Negation {
            inner: walker.walk(&self.inner),
        })
    }
}

impl<T> fmt::Display for Negation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.inner)
    }
}

/// Positive lookahead: asserts `parser` would succeed at the current
/// position, consuming nothing.
pub fn peek<T: 'static>(parser: Parser<T>) -> Parser<T> {
    Parser::from_node(Lookahead { inner: parser })
}

/// Negative lookahead: asserts `parser` would fail at the current position,
/// consuming nothing.
pub fn not<T: 'static>(parser: Parser<T>) -> Parser<()> {
    Parser::from_node(Negation { inner: parser })
}

// ============================================================================
// LOGGED
// ============================================================================

/// Emits an entry line before and an exit line after the child, indented by
/// the current logging depth. Semantics of the child are untouched.
pub struct Logged<T> {
    inner: Parser<T>,
    msg: String,
    sink: Arc<dyn LogSink>,
}

impl<T> Logged<T> {
    pub(crate) fn new(inner: Parser<T>, msg: String, sink: Arc<dyn LogSink>) -> Self {
        Self { inner, msg, sink }
    }
}

impl<T: 'static> ParseNode<T> for Logged<T> {
    fn parse_rec(
        &self,
        _handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<T> {
        let indent = "  ".repeat(ctx.log_depth());
        self.sink.emit(&format!("{indent}+{}:{index}", self.msg));
        ctx.enter_log();
        let result = self.inner.parse_rec(ctx, index);
        ctx.exit_log();
        self.sink
            .emit(&format!("{indent}-{}:{index}:{}", self.msg, result.summary()));
        result
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<T> {
        Parser::from_node(Logged::new(
            walker.walk(&self.inner),
            self.msg.clone(),
            Arc::clone(&self.sink),
        ))
    }
}

impl<T> fmt::Display for Logged<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
