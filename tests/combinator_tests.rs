// tests/combinator_tests.rs

use weft::prelude::*;

fn digits() -> Parser<String> {
    chars_while_min("digit", |c| c.is_ascii_digit(), 1).capture()
}

// ---
// Sequencing
// ---

#[test]
fn test_sequence_threads_values() {
    let p = digits().then_ignore(lit("!"));
    let s = p.parse("42!").ok().expect("digits then bang");
    assert_eq!(s.value, "42");
    assert_eq!(s.index, 3);

    let p = lit("#").ignore_then(digits());
    let s = p.parse("#7").ok().expect("hash then digits");
    assert_eq!(s.value, "7");

    let p = digits().then(lit("x").capture());
    let s = p.parse("3x").ok().expect("pair of values");
    assert_eq!(s.value, ("3".to_string(), "x".to_string()));
}

#[test]
fn test_sequence_failure_propagates_deepest() {
    let p = lit("foo").ignore_then(lit("bar"));
    let f = p.parse("fooqux").failure().expect("second leg fails");
    assert_eq!(f.index, 3);
    assert!(!f.cut);
}

#[test]
fn test_left_spine_flattens_into_one_node() {
    let p = lit("a").then_ignore(lit("b")).then_ignore(lit("c"));
    // One flat node, not nested pairs.
    assert_eq!(p.to_string(), r#"("a" ~ "b" ~ "c")"#);
}

#[test]
fn test_flattened_and_nested_agree() {
    let flat = lit("a").then_ignore(lit("b")).then_ignore(lit("c"));
    let nested = lit("a").then_ignore(lit("b").then_ignore(lit("c")));
    let cases = vec!["abc", "ab", "abx", "x", ""];
    for input in cases {
        let a = flat.parse(input);
        let b = nested.parse(input);
        assert_eq!(a.is_success(), b.is_success(), "agree on {input:?}");
        assert_eq!(a.index(), b.index(), "same index on {input:?}");
    }
}

// ---
// Ordered choice and cut
// ---

#[test]
fn test_choice_backtracks_without_cut() {
    let p = lit("foo").ignore_then(lit("bar")) | lit("baz");
    let s = p.parse("baz").ok().expect("second alternative");
    assert_eq!(s.index, 3);
}

#[test]
fn test_cut_blocks_backtracking() {
    // Once "foo" is consumed past the commit point, "baz" must not be tried.
    let p = lit("foo").ignore_then_cut(lit("bar")) | lit("baz");
    let f = p.parse("foobaX").failure().expect("committed failure");
    assert_eq!(f.index, 3);
    assert!(f.cut);
}

#[test]
fn test_choice_is_first_match_not_longest() {
    let p = lit("ab").discard() | lit("abc").discard();
    let s = p.parse("abc").ok().expect("first alternative wins");
    assert_eq!(s.index, 2);
}

#[test]
fn test_choice_all_fail_reports_choice_at_entry() {
    let p = lit("aa") | lit("bb");
    let f = p.parse_from("xaabb", 0, true).failure().expect("no match");
    assert_eq!(f.index, 0, "choice fails at its entry index");
    assert!(f.parser.to_string().contains('|'));
}

#[test]
fn test_nested_choice_flattens() {
    let p = (lit("a") | lit("b")) | (lit("c") | lit("d"));
    assert_eq!(p.to_string(), r#"("a" | "b" | "c" | "d")"#);
    assert!(p.parse("d").is_success());
}

// ---
// Optional
// ---

#[test]
fn test_optional_absence_is_zero_width() {
    let p = digits().opt();
    let s = p.parse("abc").ok().expect("optional never fails plainly");
    assert_eq!(s.value, None);
    assert_eq!(s.index, 0);
    assert!(!s.cut);

    let s = p.parse("12x").ok().expect("present");
    assert_eq!(s.value, Some("12".to_string()));
    assert_eq!(s.index, 2);
}

#[test]
fn test_optional_propagates_cut_failure() {
    let p = lit("a").ignore_then_cut(lit("b")).opt();
    let f = p.parse("ax").failure().expect("committed inside optional");
    assert!(f.cut);
}

// ---
// Lookahead and negation
// ---

#[test]
fn test_lookahead_consumes_nothing() {
    let s = peek(lit("ab")).parse("abc").ok().expect("would match");
    assert_eq!(s.index, 0);
    assert!(!s.cut);

    assert!(!peek(lit("ab")).parse("xy").is_success());
}

#[test]
fn test_negation_flips_outcome() {
    let s = not(lit("ab")).parse("cd").ok().expect("inner fails, not succeeds");
    assert_eq!(s.index, 0);

    // When the inner parser matches, the failure sits at its end.
    let f = not(lit("ab")).parse("abc").failure().expect("inner matched");
    assert_eq!(f.index, 2);
    assert!(!f.cut);
}

#[test]
fn test_negation_operator_sugar() {
    let p = !lit("ab");
    assert!(p.parse("cd").is_success());
    assert!(!p.parse("ab").is_success());
}

#[test]
fn test_negation_swallows_cut() {
    let committed = lit("a").ignore_then_cut(lit("b"));
    let s = not(committed).parse("ax").ok().expect("inner cut failure still flips");
    assert!(!s.cut);
}

// ---
// Map and capture
// ---

#[test]
fn test_map_identity_law() {
    let mapped = digits().map(|s| s);
    let cases = vec!["12ab", "x", ""];
    for input in cases {
        let a = digits().parse(input);
        let b = mapped.parse(input);
        assert_eq!(a.is_success(), b.is_success(), "agree on {input:?}");
        assert_eq!(a.index(), b.index(), "same index on {input:?}");
    }
}

#[test]
fn test_map_transforms_value() {
    let p = digits().map(|s| s.parse::<i64>().unwrap_or(0));
    let s = p.parse("128:").ok().expect("number");
    assert_eq!(s.value, 128);
}

#[test]
fn test_capture_yields_consumed_substring() {
    let p = any_char().then_ignore(any_char()).capture();
    let s = p.parse("héllo").ok().expect("two chars");
    assert_eq!(s.value, "hé");
    assert_eq!(s.index, 3);
}

#[test]
fn test_success_index_bounds() {
    // Success index never moves backward and never passes the input length.
    let parsers: Vec<Parser<()>> = vec![
        pass(),
        any_char(),
        lit("ab"),
        digits().discard(),
        digits().opt().discard(),
        char_in("hx").rep(0).discard(),
    ];
    let inputs = vec!["", "h", "hé12", "ab12"];
    for p in &parsers {
        for input in &inputs {
            for index in 0..=input.len() {
                if let Some(s) = p.parse_from(*input, index, true).ok() {
                    assert!(s.index >= index, "{p} on {input:?} at {index}");
                    assert!(s.index <= input.len(), "{p} on {input:?} at {index}");
                }
            }
        }
    }
}
