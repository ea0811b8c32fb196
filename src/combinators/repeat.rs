//! Repetition with a minimum count and an optional delimiter.
//!
//! The loop follows normal PEG repetition: when it stops on an ordinary
//! failure after reaching the minimum count, the result index is the
//! position before the failing delimiter or element attempt. A failure
//! carrying the cut flag, from the delimiter or from the element after a
//! committed delimiter, ends the whole repetition as a failure regardless
//! of the count.

use std::fmt;
use std::sync::Arc;

use crate::aggregate::Repeater;
use crate::context::ParseContext;
use crate::parser::{ParseNode, Parser, ParserHandle};
use crate::result::{Failure, FrameKind, ParseResult};
use crate::walker::ScopedWalker;

/// Repetition node: `item` at least `min` times, separated by `delimiter`
/// when one is given. The accumulator comes fresh from the repeater on
/// every invocation.
pub struct Repeat<T, R> {
    item: Parser<T>,
    min: usize,
    delimiter: Option<Parser<()>>,
    repeater: R,
}

impl<T, R> Repeat<T, R> {
    pub(crate) fn new(item: Parser<T>, min: usize, delimiter: Option<Parser<()>>, repeater: R) -> Self {
        Self {
            item,
            min,
            delimiter,
            repeater,
        }
    }
}

impl<T, R> ParseNode<R::Output> for Repeat<T, R>
where
    T: 'static,
    R: Repeater<T> + 'static,
    R::Output: 'static,
{
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<R::Output> {
        let mut acc = self.repeater.initial();
        let mut idx = index;
        let mut cut_acc = false;
        let mut count = 0usize;
        let mut first = true;

        loop {
            // Delimiter step. The first iteration has no delimiter; it
            // behaves as a zero-width success.
            let (after_delim, delim_cut) = if first {
                (idx, false)
            } else {
                match &self.delimiter {
                    None => (idx, false),
                    Some(delim) => match delim.parse_rec(ctx, idx) {
                        ParseResult::Success(s) => (s.index, s.cut),
                        ParseResult::Failure(mut f) => {
                            if f.cut {
                                if ctx.trace() {
                                    f.prepend_frame(index, Arc::clone(handle), FrameKind::Plain);
                                }
                                return ParseResult::Failure(f);
                            }
                            if count >= self.min {
                                let value = self.repeater.result(acc);
                                return ParseResult::success(value, idx, cut_acc);
                            }
                            f.cut = cut_acc;
                            return ParseResult::Failure(f);
                        }
                    },
                }
            };

            // Element step.
            match self.item.parse_rec(ctx, after_delim) {
                ParseResult::Failure(mut f) => {
                    if f.cut || delim_cut {
                        f.cut = true;
                        if ctx.trace() {
                            f.prepend_frame(index, Arc::clone(handle), FrameKind::Plain);
                        }
                        return ParseResult::Failure(f);
                    }
                    if count >= self.min {
                        // Stop before the failed delimiter attempt.
                        let value = self.repeater.result(acc);
                        return ParseResult::success(value, idx, cut_acc || delim_cut);
                    }
                    f.cut = cut_acc || delim_cut;
                    return ParseResult::Failure(f);
                }
                ParseResult::Success(s) => {
                    self.repeater.accumulate(s.value, &mut acc);
                    count += 1;
                    let progressed = s.index > idx;
                    cut_acc = cut_acc || delim_cut || s.cut;
                    idx = s.index;
                    first = false;

                    if !progressed {
                        // A zero-width iteration would repeat forever; stop
                        // after its first accumulation.
                        if count >= self.min {
                            let value = self.repeater.result(acc);
                            return ParseResult::success(value, idx, cut_acc);
                        }
                        return ParseResult::Failure(Failure::at(
                            ctx.input_arc(),
                            idx,
                            Arc::clone(handle),
                            cut_acc,
                        ));
                    }
                }
            }
        }
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<R::Output> {
        let item = walker.walk(&self.item);
        let delimiter = self.delimiter.as_ref().map(|d| walker.walk(d));
        Parser::from_node(Repeat::new(item, self.min, delimiter, self.repeater.clone()))
    }
}

impl<T, R> fmt::Display for Repeat<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.delimiter {
            Some(delim) => write!(f, "{}.rep({}, {})", self.item, self.min, delim),
            None => write!(f, "{}.rep({})", self.item, self.min),
        }
    }
}
