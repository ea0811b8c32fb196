// tests/grammar_tests.rs
//
// End-to-end grammars: recursive arithmetic chains and a small s-expression
// reader, exercising rules, cut, repetition, and the tree walker together.

use weft::prelude::*;
use weft::ScopedWalker;

fn num() -> Parser<String> {
    chars_while_min("digit", |c| c.is_ascii_digit(), 1).capture()
}

fn expr() -> Parser<String> {
    rule("expr", || {
        num()
            .then(lit("+").ignore_then_cut(expr()).opt())
            .map(|(head, rest)| match rest {
                Some(tail) => format!("{head}+{tail}"),
                None => head,
            })
    })
}

#[test]
fn test_expr_parses_chain() {
    let s = expr().parse("1+2+3").ok().expect("full chain");
    assert_eq!(s.value, "1+2+3");
    assert_eq!(s.index, 5);
}

#[test]
fn test_expr_single_number() {
    let s = expr().parse("42").ok().expect("bare number");
    assert_eq!(s.value, "42");
    assert_eq!(s.index, 2);
}

#[test]
fn test_expr_dangling_plus_fails_inside_reentry() {
    let f = expr().parse("1+").failure().expect("dangling plus");
    assert_eq!(f.index, 2);
    assert!(f.cut);
}

// ---
// S-expression reader
// ---

#[derive(Debug, Clone, PartialEq)]
enum Sexpr {
    Atom(String),
    List(Vec<Sexpr>),
}

fn spaces() -> Parser<()> {
    chars_while("space", |c| c == ' ')
}

fn atom() -> Parser<Sexpr> {
    chars_while_min("atom-char", |c| c.is_ascii_alphanumeric(), 1)
        .capture()
        .map(Sexpr::Atom)
}

fn sexpr() -> Parser<Sexpr> {
    rule("sexpr", || {
        let list = lit("(")
            .ignore_then_cut(sexpr().rep_sep(0, spaces()))
            .then_ignore(lit(")"))
            .map(Sexpr::List);
        atom() | list
    })
}

#[test]
fn test_sexpr_nested_lists() {
    let s = sexpr().parse("(a (b c) d)").ok().expect("nested list");
    assert_eq!(
        s.value,
        Sexpr::List(vec![
            Sexpr::Atom("a".into()),
            Sexpr::List(vec![Sexpr::Atom("b".into()), Sexpr::Atom("c".into())]),
            Sexpr::Atom("d".into()),
        ])
    );
    assert_eq!(s.index, 11);
}

#[test]
fn test_sexpr_empty_list() {
    let s = sexpr().parse("()").ok().expect("empty list");
    assert_eq!(s.value, Sexpr::List(vec![]));
}

#[test]
fn test_sexpr_unclosed_list_is_committed_failure() {
    // An opening paren commits to a closing one; the choice cannot fall
    // back once inside.
    let f = sexpr().parse("(a (b").failure().expect("unclosed list");
    assert!(f.cut);
    assert_eq!(f.index, 5);
}

#[test]
fn test_sexpr_rule_frames_name_the_nesting() {
    let f = sexpr().parse("(a (b").failure().expect("unclosed list");
    let rule_count = f
        .frames
        .iter()
        .filter(|fr| fr.parser.to_string() == "sexpr")
        .count();
    assert!(rule_count >= 2, "outer and inner list rules on the path");
}

// ---
// Structural walking
// ---

#[test]
fn test_walker_rebuild_preserves_semantics() {
    let mut walker = ScopedWalker::new();
    let rebuilt = walker.walk(&sexpr());
    assert!(walker.scope().is_empty(), "walk unwinds its scope");

    let cases = vec!["(a b)", "x", "(a (b c))", "(a (b"];
    for input in cases {
        let original = sexpr().parse(input);
        let copy = rebuilt.parse(input);
        assert_eq!(original.is_success(), copy.is_success(), "agree on {input:?}");
        assert_eq!(original.index(), copy.index(), "same index on {input:?}");
    }
}

#[test]
fn test_walker_rebuild_preserves_description() {
    let grammar = lit("a").then_ignore(lit("b")) | lit("c");
    let rebuilt = ScopedWalker::new().walk(&grammar);
    assert_eq!(grammar.to_string(), rebuilt.to_string());
}
