//! Named, lazily-bound rules.
//!
//! A rule holds a thunk producing its body, evaluated on first use and
//! memoized. Grammars are written as functions returning parsers; recursion
//! works because constructing a rule never forces its body, so a rule can
//! mention itself (or a sibling) without infinite regress at build time.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::context::ParseContext;
use crate::parser::{ParseNode, Parser, ParserHandle};
use crate::result::{FrameKind, ParseResult};
use crate::walker::ScopedWalker;

/// A named rule: transparent to results, except that with tracing on it
/// contributes one frame to the failure stack per entry on the failure path.
pub struct Rule<T> {
    name: String,
    thunk: Box<dyn Fn() -> Parser<T> + Send + Sync>,
    body: OnceCell<Parser<T>>,
}

impl<T: 'static> Rule<T> {
    fn body(&self) -> &Parser<T> {
        self.body.get_or_init(|| (self.thunk)())
    }
}

/// Defines a named rule over a lazily-built body.
///
/// ```
/// use weft::prelude::*;
///
/// fn digits() -> Parser<String> {
///     chars_while_min("digit", |c| c.is_ascii_digit(), 1).capture()
/// }
///
/// fn expr() -> Parser<String> {
///     rule("expr", || {
///         digits()
///             .then(lit("+").ignore_then_cut(expr()).opt())
///             .map(|(head, rest)| match rest {
///                 Some(tail) => format!("{head}+{tail}"),
///                 None => head,
///             })
///     })
/// }
///
/// assert!(expr().parse("1+2+3").is_success());
/// ```
pub fn rule<T: 'static>(
    name: impl Into<String>,
    body: impl Fn() -> Parser<T> + Send + Sync + 'static,
) -> Parser<T> {
    Parser::from_node(Rule {
        name: name.into(),
        thunk: Box::new(body),
        body: OnceCell::new(),
    })
}

impl<T: 'static> ParseNode<T> for Rule<T> {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<T> {
        match self.body().parse_rec(ctx, index) {
            ParseResult::Success(s) => ParseResult::Success(s),
            ParseResult::Failure(mut f) => {
                if ctx.trace() {
                    f.prepend_frame(index, Arc::clone(handle), FrameKind::Rule);
                }
                ParseResult::Failure(f)
            }
        }
    }

    fn map_children(&self, walker: &mut ScopedWalker) -> Parser<T> {
        walker.enter_rule(&self.name);
        let body = walker.walk(self.body());
        walker.exit_rule();
        Parser::from_node(Rule {
            name: self.name.clone(),
            thunk: Box::new(move || body.clone()),
            body: OnceCell::new(),
        })
    }
}

impl<T> fmt::Display for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
