//! Line parsers for the model lines printed by the solver
//!
//! Two strategies produce the same `Vec<Term>` for well-formed lines:
//! - [`fast`] scans delimiters at parenthesis depth zero and ignores quoting
//! - [`careful`] runs the pest grammar in `terms.pest` and honours quoted strings
//!
//! Both leave arguments as `Arg::Raw`. Typed arguments come from the
//! argument sub-grammar in [`arguments`], applied on demand by the pipeline.

use crate::error::AspireError;
use crate::resource_limits::ResourceLimits;
use crate::span::Span;
use crate::term::Term;
use pest_derive::Parser;
use serde::Serialize;
use std::fmt;

pub mod arguments;
pub mod careful;
pub mod fast;

pub use arguments::{parse_argument, ArgOptions};

#[derive(Parser)]
#[grammar = "src/parser/terms.pest"]
pub struct TermParser;

/// Which line parser produced, or failed to produce, a set of terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Fast,
    Careful,
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserKind::Fast => write!(f, "fast"),
            ParserKind::Careful => write!(f, "careful"),
        }
    }
}

/// Split one model line into terms with the given strategy
pub fn parse_line(
    line: &str,
    kind: ParserKind,
    limits: &ResourceLimits,
) -> Result<Vec<Term>, AspireError> {
    match kind {
        ParserKind::Fast => fast::parse_line(line, limits),
        ParserKind::Careful => careful::parse_line(line, limits),
    }
}

pub(crate) fn check_line_size(line: &str, limits: &ResourceLimits) -> Result<(), AspireError> {
    if line.len() > limits.max_line_bytes {
        return Err(AspireError::limit_exceeded(
            "max_line_bytes",
            limits.max_line_bytes,
            line.len(),
        ));
    }
    Ok(())
}

/// Deepest parenthesis nesting of `text`, skipping quoted strings
///
/// Stops early once `limit` is passed. Balance is not checked here; the
/// grammar reports unbalanced input with a proper position.
pub(crate) fn check_nesting(text: &str, limits: &ResourceLimits) -> Result<(), AspireError> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '(' => {
                depth += 1;
                if depth > limits.max_nesting_depth {
                    return Err(AspireError::limit_exceeded(
                        "max_nesting_depth",
                        limits.max_nesting_depth,
                        depth,
                    ));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Convert a pest failure into a malformed-term error over `line`
pub(crate) fn malformed_from_pest(
    line: &str,
    err: pest::error::Error<Rule>,
    kind: ParserKind,
) -> AspireError {
    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span::at(pos),
        pest::error::InputLocation::Span((start, end)) => Span::new(start, end),
    };
    let message = match &err.variant {
        pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            let mut expected: Vec<&str> = positives.iter().map(rule_label).collect();
            expected.sort_unstable();
            expected.dedup();
            format!("expected {}", expected.join(" or "))
        }
        variant => variant.message().into_owned(),
    };
    AspireError::malformed(message, line, span, kind)
}

fn rule_label(rule: &Rule) -> &'static str {
    match rule {
        Rule::term | Rule::predicate | Rule::identifier => "a term",
        Rule::quoted_string => "a quoted string",
        Rule::integer => "an integer",
        Rule::tuple => "a tuple",
        Rule::choice => "a choice term",
        Rule::trailing_comma => "','",
        Rule::EOI => "end of line",
        _ => "a valid token",
    }
}
