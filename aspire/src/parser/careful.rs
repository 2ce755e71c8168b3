use super::{check_line_size, check_nesting, malformed_from_pest, ParserKind, Rule, TermParser};
use crate::error::AspireError;
use crate::resource_limits::ResourceLimits;
use crate::term::{Arg, Term};
use pest::iterators::Pair;
use pest::Parser;

/// Parse a model line with the term grammar
///
/// Quoted strings may contain `.`, `,`, `(` and `)`; argument boundaries are
/// exact. Arguments are returned as `Arg::Raw` holding their source text.
pub fn parse_line(line: &str, limits: &ResourceLimits) -> Result<Vec<Term>, AspireError> {
    check_line_size(line, limits)?;
    check_nesting(line, limits)?;

    let pairs = TermParser::parse(Rule::line, line)
        .map_err(|e| malformed_from_pest(line, e, ParserKind::Careful))?;

    let mut terms = Vec::new();
    for pair in pairs {
        if pair.as_rule() == Rule::line {
            for inner_pair in pair.into_inner() {
                if inner_pair.as_rule() == Rule::term {
                    terms.push(raw_term(inner_pair));
                }
            }
        }
    }
    Ok(terms)
}

fn raw_term(pair: Pair<Rule>) -> Term {
    let mut inner = pair.into_inner();
    let predicate = inner.next().map(|p| p.as_str()).unwrap_or_default();
    let args = inner.map(|p| Arg::Raw(p.as_str().to_string())).collect();
    Term::from_parts(predicate, args)
}
