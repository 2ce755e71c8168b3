use crate::error::AspireError;
use serde::Serialize;
use std::fmt;

/// A ground predicate application as printed by the solver
///
/// The predicate is never empty and the argument list cannot change once the
/// term exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Term {
    predicate: String,
    args: Vec<Arg>,
}

/// One argument of a term
///
/// Which variant shows up depends on the stages that touched the term: the
/// line parsers only produce `Raw`, the typed stages produce the rest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Arg {
    /// Argument text exactly as printed, not interpreted
    Raw(String),
    Int(i64),
    /// Content of a quoted string, without the quotes; escapes are kept as written
    Text(String),
    Term(Term),
    /// Parenthesized, comma separated arguments: `(a,b)`, or `(a,)` for one element
    Tuple(Vec<Arg>),
    /// Choice term: `a;b;c`
    Pool(Vec<Arg>),
}

impl Term {
    /// Create a term, rejecting an empty predicate name
    pub fn new(predicate: impl Into<String>, args: Vec<Arg>) -> Result<Self, AspireError> {
        let predicate = predicate.into();
        if predicate.trim().is_empty() {
            return Err(AspireError::InvalidTerm(
                "predicate name cannot be empty".to_string(),
            ));
        }
        Ok(Self { predicate, args })
    }

    /// A nullary term, i.e. a constant such as `a`
    pub fn atom(predicate: impl Into<String>) -> Result<Self, AspireError> {
        Self::new(predicate, Vec::new())
    }

    /// Used by the parsers, whose grammar already guarantees a non-empty name
    pub(crate) fn from_parts(predicate: &str, args: Vec<Arg>) -> Self {
        debug_assert!(!predicate.is_empty());
        Self {
            predicate: predicate.to_string(),
            args,
        }
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_constant(&self) -> bool {
        self.args.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<Arg>) {
        (self.predicate, self.args)
    }

    /// Rebuild the term with every argument passed through `f`, keeping the arity
    pub(crate) fn map_args(self, f: &mut impl FnMut(Arg) -> Arg) -> Self {
        Self {
            predicate: self.predicate,
            args: self.args.into_iter().map(|arg| f(arg)).collect(),
        }
    }
}

impl Arg {
    pub fn raw(text: impl Into<String>) -> Self {
        Arg::Raw(text.into())
    }

    pub fn text(content: impl Into<String>) -> Self {
        Arg::Text(content.into())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value of a raw or quoted argument
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Raw(s) | Arg::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Arg::Term(term) => Some(term),
            _ => None,
        }
    }

    /// Name of a constant (nullary term) argument
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Arg::Term(term) if term.is_constant() => Some(term.predicate()),
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Arg::Raw(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            write_joined(f, &self.args, ",")?;
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Raw(s) => write!(f, "{}", s),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Text(s) => write!(f, "\"{}\"", s),
            Arg::Term(term) => write!(f, "{}", term),
            Arg::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items, ",")?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Arg::Pool(alternatives) => write_joined(f, alternatives, ";"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, args: &[Arg], separator: &str) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

/// Content of `raw` when it is exactly one quoted string literal
///
/// `"a,b"` gives `a,b`; `"a"x"` or an unterminated `"a` give `None`.
pub(crate) fn quoted_content(raw: &str) -> Option<&str> {
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    let mut escaped = false;
    for c in inner.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return None,
            _ => {}
        }
    }
    // a trailing lone backslash escapes the closing quote
    if escaped {
        return None;
    }
    Some(inner)
}
