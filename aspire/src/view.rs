//! Legacy term view
//!
//! Older answer-set tooling exposed atoms as objects with a `predicate` and
//! an `arguments` tuple, integers already converted. `TermView` offers that
//! same capability set as a plain value built from a [`Term`].

use crate::parser::arguments::{coerce, ArgOptions};
use crate::resource_limits::ResourceLimits;
use crate::term::{Arg, Term};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TermView {
    predicate: String,
    arguments: Vec<Arg>,
}

impl TermView {
    /// Build the view of `term`, typing any raw argument
    pub fn from_term(term: Term, limits: &ResourceLimits) -> Self {
        let (predicate, args) = term.into_parts();
        Self::from_parts(predicate, args, ArgOptions::default(), limits)
    }

    /// Build a view typing raw arguments under `options`; typed ones are kept
    pub(crate) fn from_parts(
        predicate: String,
        args: Vec<Arg>,
        options: ArgOptions,
        limits: &ResourceLimits,
    ) -> Self {
        let arguments = args
            .into_iter()
            .map(|arg| coerce(arg, options, limits))
            .collect();
        Self {
            predicate,
            arguments,
        }
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn arguments(&self) -> &[Arg] {
        &self.arguments
    }

    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.arguments.get(index)
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
}

impl fmt::Display for TermView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate)?;
        if !self.arguments.is_empty() {
            let args: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
            write!(f, "({})", args.join(","))?;
        }
        Ok(())
    }
}
