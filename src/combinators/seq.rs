//! Flattened sequencing with type-erased chaining.
//!
//! The surface constructor is binary (`p.seq(cut, q, sequencer)`), but a
//! left spine of sequences is rewritten at construction into one flat node:
//! a head parser plus an ordered vector of chain links. Each link erases its
//! child's value type behind `Any`; the typed builders in `Parser::seq` are
//! the only way to append a link, so every downcast inside the execution
//! loop is justified by construction.
//!
//! Cut semantics: a link's cut flag is a promise. Once a committed link has
//! been crossed successfully, any later failure inside the same sequence
//! carries `cut = true`, which suppresses backtracking in enclosing choices
//! and repetitions.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::aggregate::Sequencer;
use crate::context::ParseContext;
use crate::parser::{ParseNode, Parser, ParserHandle};
use crate::result::{FrameKind, ParseResult};
use crate::walker::ScopedWalker;

// ============================================================================
// TYPE ERASURE
// ============================================================================

/// A parsed value with its static type erased.
pub(crate) type AnyValue = Box<dyn Any>;

/// Combines two erased values into one; built from a typed [`Sequencer`].
pub(crate) type Combine = Arc<dyn Fn(AnyValue, AnyValue) -> AnyValue + Send + Sync>;

/// Execution view of a child parser with its value type erased.
trait ErasedNode: fmt::Display + Send + Sync {
    fn parse_any(&self, ctx: &mut ParseContext, index: usize) -> ParseResult<AnyValue>;
    fn map_children_any(&self, walker: &mut ScopedWalker) -> ErasedParser;
}

/// Shareable handle to an erased child.
#[derive(Clone)]
pub struct ErasedParser {
    node: Arc<dyn ErasedNode>,
}

impl ErasedParser {
    pub(crate) fn of<U: 'static>(parser: Parser<U>) -> Self {
        Self {
            node: Arc::new(Erase(parser)),
        }
    }

    fn parse_any(&self, ctx: &mut ParseContext, index: usize) -> ParseResult<AnyValue> {
        self.node.parse_any(ctx, index)
    }

    fn map_children_any(&self, walker: &mut ScopedWalker) -> ErasedParser {
        self.node.map_children_any(walker)
    }
}

impl fmt::Display for ErasedParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.node, f)
    }
}

struct Erase<U>(Parser<U>);

impl<U: 'static> ErasedNode for Erase<U> {
    fn parse_any(&self, ctx: &mut ParseContext, index: usize) -> ParseResult<AnyValue> {
        self.0
            .parse_rec(ctx, index)
            .map_value(|v| Box::new(v) as AnyValue)
    }

    fn map_children_any(&self, walker: &mut ScopedWalker) -> ErasedParser {
        ErasedParser::of(walker.walk(&self.0))
    }
}

impl<U> fmt::Display for Erase<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ============================================================================
// CHAIN LINKS
// ============================================================================

/// One step of a flattened sequence: the child to run, whether crossing this
/// junction commits the parse, and how to fold the child's value into the
/// accumulated one.
#[derive(Clone)]
pub struct ChainLink {
    parser: ErasedParser,
    cut: bool,
    combine: Combine,
}

impl ChainLink {
    pub(crate) fn new(parser: ErasedParser, cut: bool, combine: Combine) -> Self {
        Self {
            parser,
            cut,
            combine,
        }
    }

    /// Erases a typed sequencer into a combine function. The two downcasts
    /// are the construction-time type safety boundary of the whole chain.
    pub(crate) fn combiner<A, B, S>(seq: S) -> Combine
    where
        A: 'static,
        B: 'static,
        S: Sequencer<A, B> + 'static,
        S::Output: 'static,
    {
        Arc::new(move |left, right| {
            // The typed builders only ever pair this combine with children
            // producing exactly A and B.
            let left = left.downcast::<A>().unwrap();
            let right = right.downcast::<B>().unwrap();
            Box::new(seq.combine(*left, *right))
        })
    }
}

/// The parts of a flat sequence, exposed so construction can extend an
/// existing left spine instead of nesting a new node around it.
pub struct FlatView {
    head: ErasedParser,
    links: Vec<ChainLink>,
}

impl FlatView {
    pub(crate) fn into_parts(self) -> (ErasedParser, Vec<ChainLink>) {
        (self.head, self.links)
    }
}

// ============================================================================
// FLAT SEQUENCE NODE
// ============================================================================

/// A flattened left spine of sequences: run the head, then each link in
/// order, folding values as they arrive. Iterative; stack depth does not
/// grow with sequence length.
pub struct FlatSequence<T> {
    head: ErasedParser,
    links: Vec<ChainLink>,
    out: PhantomData<fn() -> T>,
}

impl<T> FlatSequence<T> {
    pub(crate) fn new(head: ErasedParser, links: Vec<ChainLink>) -> Self {
        Self {
            head,
            links,
            out: PhantomData,
        }
    }
}

impl<T: 'static> ParseNode<T> for FlatSequence<T> {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<T> {
        let entry = index;
        let (mut acc, mut idx, mut cut_acc) = match self.head.parse_any(ctx, index) {
            ParseResult::Success(s) => (s.value, s.index, s.cut),
            ParseResult::Failure(f) => return ParseResult::Failure(f),
        };
        // Tracks this sequence's own commit points, as opposed to cuts that
        // bubbled up from inside a child.
        let mut committed = false;

        for link in &self.links {
            match link.parser.parse_any(ctx, idx) {
                ParseResult::Success(s) => {
                    acc = (link.combine)(acc, s.value);
                    idx = s.index;
                    cut_acc = cut_acc || s.cut || link.cut;
                    committed = committed || link.cut;
                }
                ParseResult::Failure(mut f) => {
                    f.cut = f.cut || link.cut || cut_acc;
                    if (committed || link.cut) && ctx.trace() {
                        f.prepend_frame(entry, Arc::clone(handle), FrameKind::CutSequence);
                    }
                    return ParseResult::Failure(f);
                }
            }
        }

        // The last link's combine produced exactly T; see `combiner`.
        let value = *acc.downcast::<T>().unwrap();
        ParseResult::success(value, idx, cut_acc)
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<T> {
        let head = self.head.map_children_any(walker);
        let links = self
            .links
            .iter()
            .map(|link| ChainLink {
                parser: link.parser.map_children_any(walker),
                cut: link.cut,
                combine: Arc::clone(&link.combine),
            })
            .collect();
        Parser::from_node(FlatSequence::new(head, links))
    }

    fn flat_view(&self) -> Option<FlatView> {
        Some(FlatView {
            head: self.head.clone(),
            links: self.links.clone(),
        })
    }
}

impl<T> fmt::Display for FlatSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.head)?;
        for link in &self.links {
            let op = if link.cut { "~!" } else { "~" };
            write!(f, " {op} {}", link.parser)?;
        }
        write!(f, ")")
    }
}
