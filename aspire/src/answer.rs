use crate::term::Term;
use serde::Serialize;
use std::fmt;

/// The terms of one model, with the metadata the solver printed around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSet {
    terms: Vec<Term>,
    cost: Option<Vec<i64>>,
    shown: bool,
    index: usize,
}

impl AnswerSet {
    /// Create an answer set for the `index`-th model (1-based)
    pub fn new(terms: Vec<Term>, index: usize) -> Self {
        Self {
            terms,
            cost: None,
            shown: false,
            index,
        }
    }

    pub fn with_cost(mut self, cost: Option<Vec<i64>>) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_shown(mut self, shown: bool) -> Self {
        self.shown = shown;
        self
    }

    /// Terms in the order they appeared on the model line
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Optimization values reported for this model, most significant first
    pub fn cost(&self) -> Option<&[i64]> {
        self.cost.as_deref()
    }

    /// Whether the terms are the solver's shown projection rather than a bare model line
    pub fn shown(&self) -> bool {
        self.shown
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.terms.contains(term)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    pub fn into_terms(self) -> Vec<Term> {
        self.terms
    }

    /// The model line in the solver's syntax: `a(1). b.`
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnswerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}.", term)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AnswerSet {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
