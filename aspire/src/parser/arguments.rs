use super::{check_nesting, Rule, TermParser};
use crate::resource_limits::ResourceLimits;
use crate::term::{Arg, Term};
use pest::iterators::Pair;
use pest::Parser;

/// How the argument sub-grammar turns matched text into values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgOptions {
    /// Integer literals become `Arg::Int`; otherwise they stay `Arg::Raw`
    pub parse_integers: bool,
}

impl Default for ArgOptions {
    fn default() -> Self {
        Self {
            parse_integers: true,
        }
    }
}

impl ArgOptions {
    pub fn integers_unparsed() -> Self {
        Self {
            parse_integers: false,
        }
    }
}

/// Parse one argument's text into a typed value
///
/// Returns `None` when the text is not a single argument of the term
/// grammar (for instance a fragment produced by the fast parser splitting
/// inside a quoted string), or nests deeper than the limits allow.
pub fn parse_argument(text: &str, options: ArgOptions, limits: &ResourceLimits) -> Option<Arg> {
    check_nesting(text, limits).ok()?;
    let mut pairs = TermParser::parse(Rule::argument, text).ok()?;
    let argument = pairs.next()?;
    let value = argument.into_inner().next()?;
    Some(build(value, options))
}

/// Type every raw argument inside `arg`, leaving already typed values alone
///
/// Raw text the grammar rejects passes through unchanged.
pub fn coerce(arg: Arg, options: ArgOptions, limits: &ResourceLimits) -> Arg {
    match arg {
        Arg::Raw(text) => match parse_argument(&text, options, limits) {
            Some(parsed) => parsed,
            None => Arg::Raw(text),
        },
        Arg::Term(term) => Arg::Term(term.map_args(&mut |a| coerce(a, options, limits))),
        Arg::Tuple(items) => Arg::Tuple(
            items
                .into_iter()
                .map(|a| coerce(a, options, limits))
                .collect(),
        ),
        Arg::Pool(alternatives) => Arg::Pool(
            alternatives
                .into_iter()
                .map(|a| coerce(a, options, limits))
                .collect(),
        ),
        typed => typed,
    }
}

fn build(pair: Pair<Rule>, options: ArgOptions) -> Arg {
    match pair.as_rule() {
        Rule::integer => {
            let text = pair.as_str();
            if options.parse_integers {
                // out of i64 range stays as written
                text.parse::<i64>()
                    .map(Arg::Int)
                    .unwrap_or_else(|_| Arg::Raw(text.to_string()))
            } else {
                Arg::Raw(text.to_string())
            }
        }
        Rule::quoted_string => {
            let text = pair.as_str();
            Arg::Text(text[1..text.len() - 1].to_string())
        }
        Rule::term => {
            let mut inner = pair.into_inner();
            let predicate = inner.next().map(|p| p.as_str()).unwrap_or_default();
            let args = inner.map(|p| build(p, options)).collect();
            Arg::Term(Term::from_parts(predicate, args))
        }
        Rule::tuple => {
            let mut trailing_comma = false;
            let mut items = Vec::new();
            for inner_pair in pair.into_inner() {
                if inner_pair.as_rule() == Rule::trailing_comma {
                    trailing_comma = true;
                } else {
                    items.push(build(inner_pair, options));
                }
            }
            // `(a)` is only grouping; `(a,)` is a one-element tuple
            if items.len() == 1 && !trailing_comma {
                items.remove(0)
            } else {
                Arg::Tuple(items)
            }
        }
        Rule::choice => Arg::Pool(pair.into_inner().map(|p| build(p, options)).collect()),
        _ => Arg::Raw(pair.as_str().to_string()),
    }
}
