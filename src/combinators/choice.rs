//! Ordered choice.
//!
//! Alternatives are tried strictly left to right; the first success wins.
//! There is no longest-match arbitration here (that is what `string_in` is
//! for). A failure carrying the cut flag aborts the whole choice: the
//! grammar committed somewhere inside that alternative, so trying the next
//! one would accept inputs the author ruled out.

use std::fmt;
use std::sync::Arc;

use crate::context::ParseContext;
use crate::parser::{ParseNode, Parser, ParserHandle};
use crate::result::{Failure, FrameKind, ParseResult};
use crate::walker::ScopedWalker;

/// Flat ordered-choice node. Nested choices are merged into one alternative
/// list at construction, preserving order.
pub struct Either<T> {
    alts: Vec<Parser<T>>,
}

impl<T> Either<T> {
    pub(crate) fn new(alts: Vec<Parser<T>>) -> Self {
        Self { alts }
    }
}

impl<T: 'static> ParseNode<T> for Either<T> {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<T> {
        for alt in &self.alts {
            match alt.parse_rec(ctx, index) {
                ParseResult::Success(s) => return ParseResult::Success(s),
                ParseResult::Failure(mut f) => {
                    if f.cut {
                        if ctx.trace() {
                            f.prepend_frame(index, Arc::clone(handle), FrameKind::Plain);
                        }
                        return ParseResult::Failure(f);
                    }
                }
            }
        }
        // Every alternative failed without committing: the choice as a whole
        // failed at its entry index, not at the deepest attempt.
        ParseResult::Failure(Failure::at(ctx.input_arc(), index, Arc::clone(handle), false))
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<T> {
        let alts = self.alts.iter().map(|alt| walker.walk(alt)).collect();
        Parser::from_node(Either::new(alts))
    }

    fn alt_view(&self) -> Option<Vec<Parser<T>>> {
        Some(self.alts.clone())
    }
}

impl<T> fmt::Display for Either<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, alt) in self.alts.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{alt}")?;
        }
        write!(f, ")")
    }
}
