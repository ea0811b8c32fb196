//! Core parser handle and the node execution contract.
//!
//! A `Parser<T>` is an immutable, shareable handle to one node of a grammar
//! tree. Nodes implement [`ParseNode`], whose `parse_rec` method is the
//! single execution protocol: given the per-parse context and a start index,
//! return a typed success or a structured failure. Combinator construction
//! lives here as methods on `Parser<T>`, so grammars read left to right the
//! way they execute.

use std::fmt;
use std::sync::Arc;

use crate::aggregate::{IntoOption, IntoVec, KeepLeft, KeepRight, Optioner, Repeater, Sequencer, Tupled};
use crate::combinators::choice::Either;
use crate::combinators::repeat::Repeat;
use crate::combinators::seq::{ChainLink, ErasedParser, FlatSequence, FlatView};
use crate::combinators::unary::{Capturing, Logged, Mapper, Optional};
use crate::context::{LogSink, ParseContext};
use crate::diagnostics::ParseError;
use crate::result::ParseResult;
use crate::walker::ScopedWalker;

// ============================================================================
// NODE CONTRACT
// ============================================================================

/// Display-only view of a node, cheap to clone into failures and frames.
///
/// Blanket-implemented: anything a node can be, a handle can describe.
pub trait Describe: fmt::Display + Send + Sync {}

impl<T: fmt::Display + Send + Sync + ?Sized> Describe for T {}

/// Type-erased reference to a parser node, used wherever the engine needs to
/// name a node without knowing its output type: failure blame, trace frames.
pub type ParserHandle = Arc<dyn Describe>;

/// One node of a grammar tree.
///
/// Implementations are immutable and carry no execution state; everything
/// mutable lives in the [`ParseContext`]. `handle` is the node's own erased
/// reference, passed in so failures can name their origin without a
/// self-referential allocation.
pub trait ParseNode<T>: fmt::Display + Send + Sync {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<T>;

    /// Rebuilds this node with every child passed through `walker`,
    /// preserving the node kind and its non-child attributes.
    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<T>;

    /// Flat-sequence parts, when this node is one. Lets sequence
    /// construction extend an existing left spine instead of nesting.
    fn flat_view(&self) -> Option<FlatView> {
        None
    }

    /// Ordered-choice alternatives, when this node is a choice. Lets choice
    /// construction merge nested alternatives into one flat list.
    fn alt_view(&self) -> Option<Vec<Parser<T>>>
    where
        T: Sized,
    {
        None
    }
}

// ============================================================================
// PARSER HANDLE
// ============================================================================

/// An immutable, clonable handle to a grammar node.
///
/// Cloning is cheap (two reference bumps); parsers are reusable across
/// parses, and across threads for independent parses each owning their own
/// context.
pub struct Parser<T> {
    node: Arc<dyn ParseNode<T>>,
    handle: ParserHandle,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<T> fmt::Display for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.node, f)
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parser({})", self.node)
    }
}

impl<T: 'static> Parser<T> {
    /// Wraps a node, keeping a typed view for execution and an erased view
    /// for naming. Both share one allocation.
    pub(crate) fn from_node<N: ParseNode<T> + 'static>(node: N) -> Self {
        let node: Arc<N> = Arc::new(node);
        Self {
            handle: node.clone() as ParserHandle,
            node,
        }
    }

    /// The erased, display-only reference to this node.
    pub fn handle(&self) -> ParserHandle {
        Arc::clone(&self.handle)
    }

    /// Runs this node at `index`. Callers consume the returned result before
    /// issuing another child call; results are moved, never shared.
    pub(crate) fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> ParseResult<T> {
        self.node.parse_rec(&self.handle, ctx, index)
    }

    /// Rebuilds this subtree through `walker`.
    pub fn map_children(&self, walker: &mut ScopedWalker) -> Parser<T> {
        self.node.map_children(walker)
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Parses `input` from offset 0 with tracing on.
    pub fn parse(&self, input: impl Into<Arc<str>>) -> ParseResult<T> {
        self.parse_from(input, 0, true)
    }

    /// Parses `input` from `index`. With `trace` off, failures skip frame
    /// accumulation and carry only the deepest position and node.
    pub fn parse_from(
        &self,
        input: impl Into<Arc<str>>,
        index: usize,
        trace: bool,
    ) -> ParseResult<T> {
        let mut ctx = ParseContext::new(input.into(), trace);
        self.parse_rec(&mut ctx, index)
    }

    /// Parses `input` and converts a failure into a reportable diagnostic
    /// naming the source. The convenient entry for applications that want
    /// rendered errors rather than the raw protocol result.
    pub fn parse_or_report(&self, input: &str, source_name: &str) -> Result<T, ParseError> {
        match self.parse(input) {
            ParseResult::Success(s) => Ok(s.value),
            ParseResult::Failure(f) => Err(ParseError::from_failure(&f, source_name)),
        }
    }

    // ------------------------------------------------------------------------
    // Sequencing
    // ------------------------------------------------------------------------

    /// Core sequencing: runs `self` then `next`, combining values through
    /// `seq`. With `cut` set, successfully crossing the junction commits the
    /// parse; later failures in the same sequence cannot be backtracked past
    /// by an enclosing choice or repetition.
    ///
    /// A left spine of sequences is flattened at construction into one node
    /// with a head and a vector of links, so execution is a single loop.
    pub fn seq<U, S>(self, cut: bool, next: Parser<U>, seq: S) -> Parser<S::Output>
    where
        U: 'static,
        S: Sequencer<T, U> + 'static,
        S::Output: 'static,
    {
        let combine = ChainLink::combiner::<T, U, S>(seq);
        let link = ChainLink::new(ErasedParser::of(next), cut, combine);
        let spine = self.node.flat_view();
        let (head, mut links) = match spine {
            Some(view) => view.into_parts(),
            None => (ErasedParser::of(self), Vec::new()),
        };
        links.push(link);
        Parser::from_node(FlatSequence::new(head, links))
    }

    /// `self` then `next`, keeping both values as a pair.
    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<(T, U)> {
        self.seq(false, next, Tupled)
    }

    /// `self` then `next`, keeping only `self`'s value.
    pub fn then_ignore<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        self.seq(false, next, KeepLeft)
    }

    /// `self` then `next`, keeping only `next`'s value.
    pub fn ignore_then<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        self.seq(false, next, KeepRight)
    }

    /// Committing variant of [`then`](Self::then): once `self` succeeds, a
    /// failure of `next` is final.
    pub fn then_cut<U: 'static>(self, next: Parser<U>) -> Parser<(T, U)> {
        self.seq(true, next, Tupled)
    }

    /// Committing variant of [`then_ignore`](Self::then_ignore).
    pub fn then_ignore_cut<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        self.seq(true, next, KeepLeft)
    }

    /// Committing variant of [`ignore_then`](Self::ignore_then).
    pub fn ignore_then_cut<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        self.seq(true, next, KeepRight)
    }

    // ------------------------------------------------------------------------
    // Choice
    // ------------------------------------------------------------------------

    /// Ordered choice: tries `self`, then `other`. First success wins; a cut
    /// failure aborts the whole choice. Nested choices are merged into one
    /// flat alternative list at construction, preserving order.
    pub fn or(self, other: Parser<T>) -> Parser<T> {
        let left = self.node.alt_view();
        let mut alts = match left {
            Some(alts) => alts,
            None => vec![self],
        };
        let right = other.node.alt_view();
        match right {
            Some(mut more) => alts.append(&mut more),
            None => alts.push(other),
        }
        Parser::from_node(Either::new(alts))
    }

    // ------------------------------------------------------------------------
    // Repetition
    // ------------------------------------------------------------------------

    /// Zero or more repetitions (at least `min`), collected into a `Vec`.
    pub fn rep(self, min: usize) -> Parser<Vec<T>> {
        self.rep_with(min, None, IntoVec)
    }

    /// Like [`rep`](Self::rep), with `delim` between consecutive items.
    pub fn rep_sep(self, min: usize, delim: Parser<()>) -> Parser<Vec<T>> {
        self.rep_with(min, Some(delim), IntoVec)
    }

    /// Core repetition with a pluggable accumulator.
    pub fn rep_with<R>(self, min: usize, delim: Option<Parser<()>>, repeater: R) -> Parser<R::Output>
    where
        R: Repeater<T> + 'static,
        R::Output: 'static,
    {
        Parser::from_node(Repeat::new(self, min, delim, repeater))
    }

    // ------------------------------------------------------------------------
    // Wrapping
    // ------------------------------------------------------------------------

    /// Optional: succeeds with `Some` if `self` does, with `None` at the
    /// original index if `self` fails without cut. A cut failure propagates.
    pub fn opt(self) -> Parser<Option<T>> {
        self.opt_with(IntoOption)
    }

    /// Optional with a pluggable wrapping of the present/absent cases.
    pub fn opt_with<O>(self, optioner: O) -> Parser<O::Output>
    where
        O: Optioner<T> + 'static,
        O::Output: 'static,
    {
        Parser::from_node(Optional::new(self, optioner))
    }

    /// Replaces the value with the consumed slice of input.
    pub fn capture(self) -> Parser<String> {
        Parser::from_node(Capturing::new(self))
    }

    /// Transforms the value on success through a pure function.
    pub fn map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Parser::from_node(Mapper::new(self, f))
    }

    /// Discards the value, for use as a delimiter or scaffolding.
    pub fn discard(self) -> Parser<()> {
        self.map(|_| ())
    }

    /// Emits entry and exit lines around `self` through `sink`, indented by
    /// the current logging depth. Does not alter parse semantics.
    pub fn log(self, msg: impl Into<String>, sink: Arc<dyn LogSink>) -> Parser<T> {
        Parser::from_node(Logged::new(self, msg.into(), sink))
    }
}

// ============================================================================
// OPERATOR SUGAR
// ============================================================================

/// `a | b` is ordered choice.
impl<T: 'static> std::ops::BitOr for Parser<T> {
    type Output = Parser<T>;

    fn bitor(self, rhs: Parser<T>) -> Parser<T> {
        self.or(rhs)
    }
}

/// `!p` is negative lookahead.
impl<T: 'static> std::ops::Not for Parser<T> {
    type Output = Parser<()>;

    fn not(self) -> Parser<()> {
        crate::combinators::unary::not(self)
    }
}
