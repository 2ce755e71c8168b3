use crate::parser::{fast, ParserKind};
use crate::{Arg, AspireError, ResourceLimits};

fn raw_args(line: &str) -> Vec<(String, Vec<String>)> {
    fast::parse_line(line, &ResourceLimits::default())
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", line, e))
        .into_iter()
        .map(|term| {
            let args = term
                .args()
                .iter()
                .map(|a| a.as_str().unwrap_or_default().to_string())
                .collect();
            (term.predicate().to_string(), args)
        })
        .collect()
}

fn pair(predicate: &str, args: &[&str]) -> (String, Vec<String>) {
    (
        predicate.to_string(),
        args.iter().map(|a| a.to_string()).collect(),
    )
}

#[test]
fn test_simple_model_line() {
    assert_eq!(
        raw_args("obj(a). obj(b). att(c)."),
        vec![
            pair("obj", &["a"]),
            pair("obj", &["b"]),
            pair("att", &["c"])
        ]
    );
}

#[test]
fn test_separators() {
    let test_cases = vec![
        ("a b c", "space separated"),
        ("a. b. c.", "dot separated"),
        ("a.b.c", "dot without space"),
        ("  a\tb   c  ", "mixed whitespace"),
        ("a. b c.", "mixed separators"),
    ];
    for (line, description) in test_cases {
        assert_eq!(
            raw_args(line),
            vec![pair("a", &[]), pair("b", &[]), pair("c", &[])],
            "separators: {}",
            description
        );
    }
}

#[test]
fn test_nested_arguments_stay_whole() {
    assert_eq!(
        raw_args("edge(f(1,2),g(h(3)),-4)."),
        vec![pair("edge", &["f(1,2)", "g(h(3))", "-4"])]
    );
}

#[test]
fn test_arguments_are_trimmed() {
    assert_eq!(
        raw_args("p( 1 , two ,(a,b) )"),
        vec![pair("p", &["1", "two", "(a,b)"])]
    );
}

#[test]
fn test_empty_line_has_no_terms() {
    assert!(raw_args("").is_empty());
    assert!(raw_args("   ").is_empty());
}

#[test]
fn test_empty_argument_list() {
    let terms = fast::parse_line("f()", &ResourceLimits::default()).unwrap();
    assert_eq!(terms.len(), 1);
    assert_eq!(terms[0].predicate(), "f");
    assert!(terms[0].is_constant());
}

#[test]
fn test_quotes_are_not_interpreted() {
    // the comma inside the string splits the argument; the careful parser does not
    assert_eq!(
        raw_args("msg(\"a,b\")."),
        vec![pair("msg", &["\"a", "b\""])]
    );
}

#[test]
fn test_malformed_lines() {
    let test_cases = vec![
        ("obj(a.", "unclosed '('", 3),
        ("obj(a)).", "unmatched ')'", 6),
        ("(a).", "missing predicate name", 0),
        ("p(a)x", "unexpected text after argument list", 4),
        ("p(a,,b)", "empty argument", 4),
        ("p(a,)", "empty argument", 4),
    ];
    for (line, message, position) in test_cases {
        match fast::parse_line(line, &ResourceLimits::default()) {
            Err(AspireError::MalformedTerm(details)) => {
                assert_eq!(details.message, message, "message for {:?}", line);
                assert_eq!(details.span.start, position, "position for {:?}", line);
                assert_eq!(details.parser, ParserKind::Fast);
                assert_eq!(details.line, line);
            }
            other => panic!("expected malformed term for {:?}, got {:?}", line, other),
        }
    }
}

#[test]
fn test_nesting_limit() {
    let limits = ResourceLimits::default().with_max_nesting_depth(3);
    assert!(fast::parse_line("f(g(h(1)))", &limits).is_ok());
    match fast::parse_line("f(g(h(i(1))))", &limits) {
        Err(AspireError::ResourceLimitExceeded { limit_name, .. }) => {
            assert_eq!(limit_name, "max_nesting_depth");
        }
        other => panic!("expected nesting limit error, got {:?}", other),
    }
}

#[test]
fn test_line_size_limit() {
    let limits = ResourceLimits::default().with_max_line_bytes(10);
    match fast::parse_line("a. b. c. d. e. f.", &limits) {
        Err(AspireError::ResourceLimitExceeded { limit_name, .. }) => {
            assert_eq!(limit_name, "max_line_bytes");
        }
        other => panic!("expected line size error, got {:?}", other),
    }
}

#[test]
fn test_arguments_are_raw() {
    let terms = fast::parse_line("p(1,a)", &ResourceLimits::default()).unwrap();
    assert_eq!(terms[0].args(), &[Arg::raw("1"), Arg::raw("a")]);
}
