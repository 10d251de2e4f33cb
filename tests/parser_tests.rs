// tests/parser_tests.rs

use aip_filter::ast::{Arg, ComparisonOp, Field, Filter, OrderBy, Simple};
use aip_filter::lexer::Lexer;
use aip_filter::parse_filter;
use aip_filter::parser::{MAX_DEPTH, OrderByParser, ParseError, Parser};
use aip_filter::value::Value;

fn parse(input: &str) -> Filter {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer).unwrap();
    parser.parse().unwrap()
}

fn parse_err(input: &str) -> ParseError {
    let lexer = Lexer::new(input);
    match Parser::new(lexer) {
        Ok(mut parser) => parser.parse().unwrap_err(),
        Err(e) => e,
    }
}

fn parse_order(input: &str) -> Result<OrderBy, ParseError> {
    OrderByParser::new(Lexer::order_by(input))?.parse()
}

// ============================================================================
// Canonical Rendering
// ============================================================================

#[test]
fn test_logical_round_trip() {
    let test_cases = vec![
        ("foo", "foo"),
        ("foo AND bar", "foo AND bar"),
        ("foo OR bar", "foo OR bar"),
        ("foo AND bar OR baz", "foo AND bar OR baz"),
        ("foo AND (bar OR baz)", "foo AND (bar OR baz)"),
        ("foo AND bar OR baz AND qux", "foo AND bar OR baz AND qux"),
        ("foo AND (bar OR baz) AND qux", "foo AND (bar OR baz) AND qux"),
        ("foo AND (bar OR baz) OR qux", "foo AND (bar OR baz) OR qux"),
        (
            "foo AND (bar OR baz) OR qux AND (quux OR corge) OR grault",
            "foo AND (bar OR baz) OR qux AND (quux OR corge) OR grault",
        ),
        ("(foo)", "(foo)"),
        ("((foo))", "((foo))"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse(input).to_string(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_comparison_round_trip() {
    let test_cases = vec![
        ("foo=1", "foo=1"),
        ("foo = 1", "foo=1"),
        ("foo>1", "foo>1"),
        ("foo>=1", "foo>=1"),
        ("foo<1", "foo<1"),
        ("foo<=1", "foo<=1"),
        ("foo!=1", "foo!=1"),
        ("foo=1 AND bar=2 OR baz=3", "foo=1 AND bar=2 OR baz=3"),
        ("foo=1 AND (bar=2 OR baz>3)", "foo=1 AND (bar=2 OR baz>3)"),
        ("foo:bar", "foo:bar"),
        ("foo:bar AND baz:qux", "foo:bar AND baz:qux"),
        ("foo:\"bar baz\"", "foo:\"bar baz\""),
        ("foo:'bar baz'", "foo:\"bar baz\""),
        ("foo:'say \"hi\"'", "foo:'say \"hi\"'"),
        ("pets:(name='cat' OR name='dog')", "pets:(name=\"cat\" OR name=\"dog\")"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse(input).to_string(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_negation_round_trip() {
    let test_cases = vec![
        ("-foo", "-foo"),
        ("NOT foo", "-foo"),
        ("NOT foo AND NOT bar", "-foo AND -bar"),
        ("NOT foo OR NOT bar", "-foo OR -bar"),
        ("NOT foo AND bar", "-foo AND bar"),
        ("NOT foo AND NOT bar OR NOT baz", "-foo AND -bar OR -baz"),
        ("-(a OR b)", "-(a OR b)"),
        ("-1", "-1"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse(input).to_string(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_traversal_and_call_round_trip() {
    let test_cases = vec![
        ("foo.bar=1", "foo.bar=1"),
        ("foo.bar.baz=1", "foo.bar.baz=1"),
        ("foo.bar.baz.qux.corge.grault.garply=1", "foo.bar.baz.qux.corge.grault.garply=1"),
        ("foo.AND=1", "foo.AND=1"),
        ("foo.bar(1)=1", "foo.bar(1)=1"),
        ("foo.bar(1,2)=1", "foo.bar(1, 2)=1"),
        ("foo.bar(1, 2, 3)=1", "foo.bar(1, 2, 3)=1"),
        ("foo() AND bar()", "foo() AND bar()"),
        ("foo(1) AND bar(2)", "foo(1) AND bar(2)"),
        ("foo((a OR b))", "foo((a OR b))"),
        ("a . 1 = 2", "a. 1=2"),
        ("a.b . 1.5 . c", "a.b. 1.5.c"),
        ("1 . 2", "1. 2"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse(input).to_string(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_literal_round_trip() {
    let test_cases = vec![
        ("1.1", "1.1"),
        ("1.0", "1.0"),
        ("1", "1"),
        ("'test'", "\"test\""),
        ("*", "*"),
        ("true", "true"),
        ("false", "false"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse(input).to_string(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_rendering_reparses_to_same_tree() {
    let inputs = vec![
        "foo AND (bar OR -baz) OR qux.x(1, 'y')>=2.5",
        "NOT a:\"b\" AND c != true",
        "pets:(name = 'cat' OR age < 3) AND active",
        "a . 1 = 2",
        "1 . 2 . x",
    ];

    for input in inputs {
        let first = parse(input);
        let second = parse(&first.to_string());
        assert_eq!(first, second, "Failed for input: {}", input);
    }
}

// ============================================================================
// Tree Shape
// ============================================================================

#[test]
fn test_or_binds_tighter_than_and() {
    let filter = parse("a AND b OR c");
    let sequences = &filter.expression.sequences;
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0].terms.len(), 1);
    assert_eq!(sequences[1].terms.len(), 2);
}

#[test]
fn test_restriction_structure() {
    let filter = parse("-age >= 21");
    let term = &filter.expression.sequences[0].terms[0];
    assert!(term.negated);

    let Simple::Restriction(restriction) = &term.simple else {
        panic!("expected restriction");
    };
    assert_eq!(restriction.comparable.value, Value::Ident("age".into()));
    let Some((op, Arg::Comparable(arg))) = &restriction.comparison else {
        panic!("expected comparison");
    };
    assert_eq!(*op, ComparisonOp::Ge);
    assert_eq!(arg.value, Value::Int(21));
}

#[test]
fn test_literal_types() {
    let test_cases = vec![
        ("a = 1", Value::Int(1)),
        ("a = +7", Value::Int(7)),
        ("a = 2.5", Value::Float(2.5)),
        ("a = .5", Value::Float(0.5)),
        ("a = 'x'", Value::Str("x".into())),
        ("a = \"x\"", Value::Str("x".into())),
        ("a = true", Value::Boolean(true)),
        ("a = false", Value::Boolean(false)),
        ("a = *", Value::Wildcard),
        ("a = b", Value::Ident("b".into())),
    ];

    for (input, expected) in test_cases {
        let filter = parse(input);
        let Simple::Restriction(restriction) = &filter.expression.sequences[0].terms[0].simple
        else {
            panic!("expected restriction for {}", input);
        };
        let Some((_, Arg::Comparable(arg))) = &restriction.comparison else {
            panic!("expected comparison for {}", input);
        };
        assert_eq!(arg.value, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_keyword_fields() {
    let filter = parse("a.NOT.OR = 1");
    let Simple::Restriction(restriction) = &filter.expression.sequences[0].terms[0].simple else {
        panic!("expected restriction");
    };
    assert_eq!(
        restriction.comparable.fields,
        vec![Field::Keyword("NOT".into()), Field::Keyword("OR".into())]
    );
}

#[test]
fn test_empty_call() {
    let filter = parse("now()");
    let Simple::Restriction(restriction) = &filter.expression.sequences[0].terms[0].simple else {
        panic!("expected restriction");
    };
    assert_eq!(restriction.comparable.call, Some(vec![]));
    assert!(restriction.comparison.is_none());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_parse_errors() {
    let inputs = vec![
        "",
        "()",
        "foo AND",
        "AND foo",
        "foo =",
        "(foo",
        "foo)",
        "foo = = 1",
        "foo bar",
        "foo(1,)",
        "foo.",
    ];

    for input in inputs {
        assert!(
            matches!(parse_err(input), ParseError::UnexpectedToken { .. }),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_error_reports_position() {
    let err = parse_err("foo AND\n  )");
    let ParseError::UnexpectedToken {
        found, position, ..
    } = err
    else {
        panic!("expected unexpected token");
    };
    assert_eq!(found, "\")\"");
    assert_eq!((position.line, position.column), (2, 3));
}

#[test]
fn test_trailing_input_is_rejected() {
    let err = parse_err("a = 1 b");
    assert_eq!(err.to_string(), "1:7: unexpected \"b\" (expected end of input)");
}

#[test]
fn test_lex_errors_surface() {
    assert!(matches!(parse_err("a = #"), ParseError::Lex(_)));
    assert!(matches!(parse_err("#"), ParseError::Lex(_)));
}

#[test]
fn test_integer_overflow() {
    let err = parse_err("a = 99999999999999999999");
    assert!(matches!(err, ParseError::InvalidLiteral { kind: "integer", .. }));
}

#[test]
fn test_float_overflow() {
    let input = format!("a = {}.0", "9".repeat(400));
    let err = parse_err(&input);
    assert!(matches!(err, ParseError::InvalidLiteral { kind: "float", .. }));
}

#[test]
fn test_nesting_limit() {
    let parens = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
    let calls = |depth: usize| format!("{}a{}", "f(".repeat(depth), ")".repeat(depth));

    assert!(parse_filter(&parens(MAX_DEPTH)).is_ok());
    assert!(parse_filter(&calls(MAX_DEPTH)).is_ok());

    for input in [parens(MAX_DEPTH + 1), calls(MAX_DEPTH + 1), parens(10_000), calls(10_000)] {
        let err = parse_filter(&input).unwrap_err();
        assert!(
            matches!(err, ParseError::TooDeep { limit: MAX_DEPTH, .. }),
            "Failed for depth {}",
            input.len() / 2
        );
    }

    // composites inside call arguments count too
    let mixed = format!("{}a{}", "f((".repeat(MAX_DEPTH / 2 + 1), "))".repeat(MAX_DEPTH / 2 + 1));
    assert!(matches!(parse_filter(&mixed), Err(ParseError::TooDeep { .. })));
}

#[test]
fn test_too_deep_reports_position() {
    let input = "(".repeat(MAX_DEPTH + 1);
    assert_eq!(
        parse_filter(&input).unwrap_err().to_string(),
        format!("1:{}: nesting exceeds {} levels", MAX_DEPTH + 1, MAX_DEPTH)
    );
}

// ============================================================================
// Order By
// ============================================================================

#[test]
fn test_order_by_round_trip() {
    let test_cases = vec![
        ("a", "a"),
        ("a desc", "a desc"),
        ("a,b", "a, b"),
        ("a desc, b", "a desc, b"),
        ("  a  desc ,b desc ", "a desc, b desc"),
        ("a.b.c desc", "a.b.c desc"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse_order(input).unwrap().to_string(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_order_by_structure() {
    let order = parse_order("create_time desc, user.name").unwrap();
    let sequences = &order.expression.sequences;
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0].path, vec!["create_time"]);
    assert!(sequences[0].desc);
    assert_eq!(sequences[1].path, vec!["user", "name"]);
    assert!(!sequences[1].desc);
}

#[test]
fn test_order_by_errors() {
    let inputs = vec!["", "a,", ",a", "a desc desc", "a b", "a.", "desc"];

    for input in inputs {
        assert!(parse_order(input).is_err(), "Failed for input: {}", input);
    }
}
