//! Shapes a model takes as it passes through the stages

use super::stage::Stage;
use crate::answer::AnswerSet;
use crate::parser::arguments::{coerce, parse_argument, ArgOptions};
use crate::resource_limits::ResourceLimits;
use crate::term::{quoted_content, Arg};
use crate::view::TermView;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// What is left of an atom once the stages are done with it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum AtomValue {
    /// All arguments
    Args(Vec<Arg>),
    /// Only the first argument; `None` for a constant
    First(Option<Arg>),
    /// No arguments at all
    Bare,
    /// The atom written back as text
    Literal(String),
    View(TermView),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ShapedAtom {
    pub predicate: String,
    pub value: AtomValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Atoms {
    /// Atoms in model order, duplicates kept
    Flat(Vec<ShapedAtom>),
    /// Values per predicate, each list without duplicates
    Grouped(BTreeMap<String, Vec<AtomValue>>),
}

/// One model after every stage of the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapedAnswer {
    pub index: usize,
    pub cost: Option<Vec<i64>>,
    pub shown: bool,
    pub atoms: Atoms,
}

impl ShapedAnswer {
    /// Values of every atom of `predicate`
    pub fn get(&self, predicate: &str) -> Vec<&AtomValue> {
        match &self.atoms {
            Atoms::Flat(atoms) => atoms
                .iter()
                .filter(|atom| atom.predicate == predicate)
                .map(|atom| &atom.value)
                .collect(),
            Atoms::Grouped(groups) => groups
                .get(predicate)
                .map(|values| values.iter().collect())
                .unwrap_or_default(),
        }
    }

    pub fn flat(&self) -> Option<&[ShapedAtom]> {
        match &self.atoms {
            Atoms::Flat(atoms) => Some(atoms),
            Atoms::Grouped(_) => None,
        }
    }

    pub fn grouped(&self) -> Option<&BTreeMap<String, Vec<AtomValue>>> {
        match &self.atoms {
            Atoms::Grouped(groups) => Some(groups),
            Atoms::Flat(_) => None,
        }
    }

    /// Number of atoms, or of predicates once grouped
    pub fn len(&self) -> usize {
        match &self.atoms {
            Atoms::Flat(atoms) => atoms.len(),
            Atoms::Grouped(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for AtomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomValue::Args(args) if args.is_empty() => Ok(()),
            AtomValue::Args(args) => write!(f, "({})", join(args)),
            AtomValue::First(Some(arg)) => write!(f, "{}", arg),
            AtomValue::First(None) | AtomValue::Bare => Ok(()),
            AtomValue::Literal(text) => write!(f, "{}", text),
            AtomValue::View(view) => write!(f, "{}", view),
        }
    }
}

impl fmt::Display for ShapedAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            AtomValue::Literal(_) | AtomValue::View(_) => write!(f, "{}", self.value),
            AtomValue::First(Some(arg)) => write!(f, "{}({})", self.predicate, arg),
            value => write!(f, "{}{}", self.predicate, value),
        }
    }
}

fn join(args: &[Arg]) -> String {
    args.iter().map(Arg::to_string).collect::<Vec<_>>().join(",")
}

/// Run `answer_set` through `stages` in order
pub(crate) fn reshape(
    answer_set: AnswerSet,
    stages: &[Stage],
    limits: &ResourceLimits,
) -> ShapedAnswer {
    let index = answer_set.index();
    let shown = answer_set.shown();
    let cost = answer_set.cost().map(<[i64]>::to_vec);
    let mut atoms = Atoms::Flat(
        answer_set
            .into_terms()
            .into_iter()
            .map(|term| {
                let (predicate, args) = term.into_parts();
                ShapedAtom {
                    predicate,
                    value: AtomValue::Args(args),
                }
            })
            .collect(),
    );
    // integers left as written by an earlier stage stay that way in views
    let options = if stages.contains(&Stage::IntNotParsed) {
        ArgOptions::integers_unparsed()
    } else {
        ArgOptions::default()
    };
    for stage in stages {
        atoms = apply(atoms, *stage, options, limits);
    }
    ShapedAnswer {
        index,
        cost,
        shown,
        atoms,
    }
}

fn apply(atoms: Atoms, stage: Stage, options: ArgOptions, limits: &ResourceLimits) -> Atoms {
    match stage {
        Stage::CarefulParsing => atoms,
        Stage::ByPredicate => match atoms {
            Atoms::Flat(list) => {
                let mut groups: BTreeMap<String, Vec<AtomValue>> = BTreeMap::new();
                for atom in list {
                    groups.entry(atom.predicate).or_default().push(atom.value);
                }
                Atoms::Grouped(
                    groups
                        .into_iter()
                        .map(|(predicate, values)| (predicate, dedup_in_order(values)))
                        .collect(),
                )
            }
            grouped => grouped,
        },
        Stage::Sorted => match atoms {
            Atoms::Flat(mut list) => {
                list.sort();
                list.dedup();
                Atoms::Flat(list)
            }
            Atoms::Grouped(groups) => Atoms::Grouped(
                groups
                    .into_iter()
                    .map(|(predicate, mut values)| {
                        values.sort();
                        values.dedup();
                        (predicate, values)
                    })
                    .collect(),
            ),
        },
        Stage::NoArg => match atoms {
            Atoms::Flat(list) => Atoms::Flat(
                list.into_iter()
                    .map(|atom| ShapedAtom {
                        predicate: atom.predicate,
                        value: AtomValue::Bare,
                    })
                    .collect(),
            ),
            Atoms::Grouped(groups) => Atoms::Grouped(
                groups
                    .into_keys()
                    .map(|predicate| (predicate, Vec::new()))
                    .collect(),
            ),
        },
        _ => map_values(atoms, |predicate, value| {
            transform(stage, predicate, value, options, limits)
        }),
    }
}

fn map_values(atoms: Atoms, mut f: impl FnMut(&str, AtomValue) -> AtomValue) -> Atoms {
    match atoms {
        Atoms::Flat(list) => Atoms::Flat(
            list.into_iter()
                .map(|atom| {
                    let value = f(&atom.predicate, atom.value);
                    ShapedAtom {
                        predicate: atom.predicate,
                        value,
                    }
                })
                .collect(),
        ),
        Atoms::Grouped(groups) => Atoms::Grouped(
            groups
                .into_iter()
                .map(|(predicate, values)| {
                    let values = values.into_iter().map(|v| f(&predicate, v)).collect();
                    (predicate, dedup_in_order(values))
                })
                .collect(),
        ),
    }
}

fn transform(
    stage: Stage,
    predicate: &str,
    value: AtomValue,
    options: ArgOptions,
    limits: &ResourceLimits,
) -> AtomValue {
    match stage {
        Stage::FirstArgOnly => match value {
            AtomValue::Args(args) => AtomValue::First(args.into_iter().next()),
            other => other,
        },
        Stage::ParseArgs => map_args(value, |arg| coerce(arg, ArgOptions::default(), limits)),
        Stage::IntNotParsed => {
            map_args(value, |arg| coerce(arg, ArgOptions::integers_unparsed(), limits))
        }
        Stage::DiscardQuotes => map_args(value, |arg| discard_quotes(arg, limits)),
        Stage::TermView => match value {
            AtomValue::Args(args) => {
                AtomValue::View(TermView::from_parts(predicate.to_string(), args, options, limits))
            }
            other => other,
        },
        Stage::AtomsAsString => match value {
            AtomValue::Args(args) if args.is_empty() => AtomValue::Literal(predicate.to_string()),
            AtomValue::Args(args) => {
                AtomValue::Literal(format!("{}({})", predicate, join(&args)))
            }
            other => other,
        },
        Stage::ByPredicate | Stage::Sorted | Stage::NoArg | Stage::CarefulParsing => value,
    }
}

fn map_args(value: AtomValue, mut f: impl FnMut(Arg) -> Arg) -> AtomValue {
    match value {
        AtomValue::Args(args) => AtomValue::Args(args.into_iter().map(&mut f).collect()),
        AtomValue::First(Some(arg)) => AtomValue::First(Some(f(arg))),
        other => other,
    }
}

/// A raw argument that is exactly one quoted literal becomes its content
///
/// Raw compound arguments holding quoted literals (`f("x")`, `("a",b)`) are
/// read with the argument grammar so the literals inside lose their quotes
/// too; integers in them stay as written. Anything else raw is kept.
pub(crate) fn discard_quotes(arg: Arg, limits: &ResourceLimits) -> Arg {
    match arg {
        Arg::Raw(text) => {
            if let Some(content) = quoted_content(&text) {
                return Arg::Text(content.to_string());
            }
            if !text.contains('"') {
                return Arg::Raw(text);
            }
            match parse_argument(&text, ArgOptions::integers_unparsed(), limits) {
                Some(nested @ (Arg::Term(_) | Arg::Tuple(_) | Arg::Pool(_))) => {
                    discard_quotes(nested, limits)
                }
                _ => Arg::Raw(text),
            }
        }
        Arg::Term(term) => Arg::Term(term.map_args(&mut |a| discard_quotes(a, limits))),
        Arg::Tuple(items) => Arg::Tuple(
            items
                .into_iter()
                .map(|a| discard_quotes(a, limits))
                .collect(),
        ),
        Arg::Pool(items) => Arg::Pool(
            items
                .into_iter()
                .map(|a| discard_quotes(a, limits))
                .collect(),
        ),
        other => other,
    }
}

fn dedup_in_order(values: Vec<AtomValue>) -> Vec<AtomValue> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
