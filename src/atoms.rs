//! Atomic parsers: the leaves of every grammar.
//!
//! Atoms consume directly from the input and never have children. They all
//! produce `()`; wrap them in `.capture()` to keep the matched text. Offsets
//! are byte offsets into UTF-8 input, and single-character atoms advance by
//! the matched character's encoded width.

use std::fmt;
use std::sync::Arc;

use crate::charset::CharClass;
use crate::context::ParseContext;
use crate::diagnostics::literalize;
use crate::parser::{ParseNode, Parser, ParserHandle};
use crate::result::{Failure, ParseResult};
use crate::trie::Trie;
use crate::walker::ScopedWalker;

fn char_at(input: &str, index: usize) -> Option<char> {
    input.get(index..)?.chars().next()
}

fn fail_at(ctx: &ParseContext, index: usize, handle: &ParserHandle) -> ParseResult<()> {
    ParseResult::Failure(Failure::at(ctx.input_arc(), index, Arc::clone(handle), false))
}

// ============================================================================
// ZERO-WIDTH ATOMS
// ============================================================================

/// Succeeds at any index, consuming nothing.
pub fn pass() -> Parser<()> {
    Parser::from_node(Pass)
}

/// Fails at any index.
pub fn fail() -> Parser<()> {
    Parser::from_node(Fail)
}

/// Succeeds only at the start of input.
pub fn start() -> Parser<()> {
    Parser::from_node(Start)
}

/// Succeeds only at the end of input.
pub fn end() -> Parser<()> {
    Parser::from_node(End)
}

struct Pass;

impl ParseNode<()> for Pass {
    fn parse_rec(&self, _: &ParserHandle, _: &mut ParseContext, index: usize) -> ParseResult<()> {
        ParseResult::success((), index, false)
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        pass()
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pass")
    }
}

struct Fail;

impl ParseNode<()> for Fail {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        fail_at(ctx, index, handle)
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        fail()
    }
}

impl fmt::Display for Fail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fail")
    }
}

struct Start;

impl ParseNode<()> for Start {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        if index == 0 {
            ParseResult::success((), index, false)
        } else {
            fail_at(ctx, index, handle)
        }
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        start()
    }
}

impl fmt::Display for Start {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("start")
    }
}

struct End;

impl ParseNode<()> for End {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        if index == ctx.input().len() {
            ParseResult::success((), index, false)
        } else {
            fail_at(ctx, index, handle)
        }
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        end()
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("end")
    }
}

// ============================================================================
// CHARACTER AND LITERAL ATOMS
// ============================================================================

/// Consumes any single character; fails only at end of input.
pub fn any_char() -> Parser<()> {
    Parser::from_node(AnyChar)
}

/// Consumes exactly the character `c`.
pub fn ch(c: char) -> Parser<()> {
    Parser::from_node(CharLiteral { c })
}

/// Consumes exactly the string `text`.
pub fn lit(text: impl Into<String>) -> Parser<()> {
    Parser::from_node(Literal { text: text.into() })
}

struct AnyChar;

impl ParseNode<()> for AnyChar {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        match char_at(ctx.input(), index) {
            Some(c) => ParseResult::success((), index + c.len_utf8(), false),
            None => fail_at(ctx, index, handle),
        }
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        any_char()
    }
}

impl fmt::Display for AnyChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any-char")
    }
}

struct CharLiteral {
    c: char,
}

impl ParseNode<()> for CharLiteral {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        match char_at(ctx.input(), index) {
            Some(c) if c == self.c => ParseResult::success((), index + c.len_utf8(), false),
            _ => fail_at(ctx, index, handle),
        }
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        ch(self.c)
    }
}

impl fmt::Display for CharLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.c)
    }
}

struct Literal {
    text: String,
}

impl ParseNode<()> for Literal {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        let matched = ctx
            .input()
            .get(index..)
            .is_some_and(|rest| rest.starts_with(&self.text));
        if matched {
            ParseResult::success((), index + self.text.len(), false)
        } else {
            fail_at(ctx, index, handle)
        }
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        lit(self.text.clone())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&literalize(&self.text))
    }
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

/// Consumes one character drawn from the explicit set `set`.
pub fn char_in(set: &str) -> Parser<()> {
    let label = format!("char-in({})", literalize(set));
    Parser::from_node(CharMatch {
        class: CharClass::from_chars(set.chars()),
        label,
    })
}

/// Consumes one character satisfying `pred`. `label` names the class in
/// descriptions and traces ("digit", "ident-start", ...).
pub fn char_pred(
    label: impl Into<String>,
    pred: impl Fn(char) -> bool + Send + Sync + 'static,
) -> Parser<()> {
    Parser::from_node(CharMatch {
        class: CharClass::from_pred(pred),
        label: label.into(),
    })
}

/// Greedily consumes characters satisfying `pred`; always succeeds, never
/// commits.
pub fn chars_while(
    label: impl Into<String>,
    pred: impl Fn(char) -> bool + Send + Sync + 'static,
) -> Parser<()> {
    chars_while_min(label, pred, 0)
}

/// Greedily consumes characters satisfying `pred`, requiring at least `min`
/// of them.
pub fn chars_while_min(
    label: impl Into<String>,
    pred: impl Fn(char) -> bool + Send + Sync + 'static,
    min: usize,
) -> Parser<()> {
    Parser::from_node(CharsWhile {
        class: CharClass::from_pred(pred),
        label: label.into(),
        min,
    })
}

struct CharMatch {
    class: CharClass,
    label: String,
}

impl ParseNode<()> for CharMatch {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        match char_at(ctx.input(), index) {
            Some(c) if self.class.contains(c) => {
                ParseResult::success((), index + c.len_utf8(), false)
            }
            _ => fail_at(ctx, index, handle),
        }
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        Parser::from_node(CharMatch {
            class: self.class.clone(),
            label: self.label.clone(),
        })
    }
}

impl fmt::Display for CharMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

struct CharsWhile {
    class: CharClass,
    label: String,
    min: usize,
}

impl ParseNode<()> for CharsWhile {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        let mut count = 0;
        let mut idx = index;
        if let Some(rest) = ctx.input().get(index..) {
            for c in rest.chars() {
                if !self.class.contains(c) {
                    break;
                }
                count += 1;
                idx += c.len_utf8();
            }
        }
        if count >= self.min {
            ParseResult::success((), idx, false)
        } else {
            fail_at(ctx, idx, handle)
        }
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        Parser::from_node(CharsWhile {
            class: self.class.clone(),
            label: self.label.clone(),
            min: self.min,
        })
    }
}

impl fmt::Display for CharsWhile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chars-while({})", self.label)
    }
}

// ============================================================================
// STRING ALTERNATION
// ============================================================================

/// Consumes the longest of `words` that the input starts with at the
/// current index. Deliberately longest-match, unlike ordered choice.
pub fn string_in<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Parser<()> {
    let words: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
    let label = format!(
        "string-in({})",
        words
            .iter()
            .map(|w| literalize(w))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Parser::from_node(StringIn {
        trie: Arc::new(Trie::new(&words)),
        label,
    })
}

struct StringIn {
    trie: Arc<Trie>,
    label: String,
}

impl ParseNode<()> for StringIn {
    fn parse_rec(
        &self,
        handle: &ParserHandle,
        ctx: &mut ParseContext,
        index: usize,
    ) -> ParseResult<()> {
        match self.trie.longest_match(ctx.input(), index) {
            Some(len) => ParseResult::success((), index + len, false),
            None => fail_at(ctx, index, handle),
        }
    }

    fn map_children(&self, _: &mut ScopedWalker) -> Parser<()> {
        Parser::from_node(StringIn {
            trie: Arc::clone(&self.trie),
            label: self.label.clone(),
        })
    }
}

impl fmt::Display for StringIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
