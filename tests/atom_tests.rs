// tests/atom_tests.rs

use weft::prelude::*;

fn digits() -> Parser<String> {
    chars_while_min("digit", |c| c.is_ascii_digit(), 1).capture()
}

#[test]
fn test_pass_consumes_nothing() {
    let result = pass().parse("abc");
    let s = result.ok().expect("pass always succeeds");
    assert_eq!(s.index, 0);
    assert!(!s.cut);
}

#[test]
fn test_fail_never_commits() {
    let f = fail().parse("abc").failure().expect("fail always fails");
    assert_eq!(f.index, 0);
    assert!(!f.cut);
}

#[test]
fn test_any_char_advances_one_char() {
    let cases = vec![("abc", 1), ("é", 2), ("中文", 3)];
    for (input, expected_index) in cases {
        let s = any_char().parse(input).ok().expect("non-empty input");
        assert_eq!(s.index, expected_index, "any_char on {input:?}");
    }
    assert!(!any_char().parse("").is_success());
    assert!(!any_char().parse_from("ab", 2, true).is_success());
}

#[test]
fn test_start_and_end_are_zero_width() {
    assert!(start().parse_from("ab", 0, true).is_success());
    assert!(!start().parse_from("ab", 1, true).is_success());

    let s = end().parse_from("ab", 2, true).ok().expect("at end");
    assert_eq!(s.index, 2);
    assert!(!end().parse_from("ab", 1, true).is_success());
}

#[test]
fn test_char_literal() {
    let s = ch('a').parse("abc").ok().expect("should match");
    assert_eq!(s.index, 1);
    assert!(!ch('b').parse("abc").is_success());

    // Multi-byte literals advance by their encoded width.
    let s = ch('é').parse("éx").ok().expect("should match");
    assert_eq!(s.index, 2);
}

#[test]
fn test_literal_matches_prefix() {
    let s = lit("foo").parse("foobar").ok().expect("prefix matches");
    assert_eq!(s.index, 3);

    let f = lit("foo").parse("fo").failure().expect("too short");
    assert_eq!(f.index, 0);
    let f = lit("foo").parse("fXo").failure().expect("mismatch");
    assert_eq!(f.index, 0);
}

#[test]
fn test_char_in_set() {
    assert!(char_in("ab").parse("a").is_success());
    assert!(char_in("ab").parse("b").is_success());
    assert!(!char_in("ab").parse("c").is_success());
    assert!(char_in("éü").parse("ü").is_success());
}

#[test]
fn test_char_pred() {
    let hex = char_pred("hex-digit", |c| c.is_ascii_hexdigit());
    assert!(hex.parse("f").is_success());
    assert!(!hex.parse("g").is_success());
}

#[test]
fn test_chars_while_greedy_with_min() {
    // "123abc" from 0: the maximal digit prefix is three chars long.
    let s = digits().parse("123abc").ok().expect("three digits");
    assert_eq!(s.index, 3);
    assert_eq!(s.value, "123");

    assert!(!digits().parse("abc").is_success());

    let zero_min = chars_while("digit", |c| c.is_ascii_digit());
    let s = zero_min.parse("abc").ok().expect("min 0 always succeeds");
    assert_eq!(s.index, 0);
}

#[test]
fn test_chars_while_consumes_maximal_prefix() {
    let s = digits().parse("1234").ok().expect("all digits");
    assert_eq!(s.index, 4);
}

#[test]
fn test_string_in_longest_match() {
    let keywords = string_in(["if", "ifdef", "else"]);
    let cases = vec![("ifdefx", Some(5)), ("if", Some(2)), ("ifde", Some(2)), ("elz", None)];
    for (input, expected) in cases {
        match (keywords.parse(input).ok(), expected) {
            (Some(s), Some(index)) => assert_eq!(s.index, index, "string_in on {input:?}"),
            (None, None) => {}
            (got, want) => panic!("string_in on {input:?}: got {got:?}, want index {want:?}"),
        }
    }
}

#[test]
fn test_string_in_at_offset() {
    let s = string_in(["ab", "abc"])
        .parse_from("xabcy", 1, true)
        .ok()
        .expect("longest match at offset 1");
    assert_eq!(s.index, 4);
}

#[test]
fn test_capture_of_literal_roundtrips() {
    let s = lit("foo").capture().parse("foo").ok().expect("exact match");
    assert_eq!(s.value, "foo");
}
