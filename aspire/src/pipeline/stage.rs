use crate::error::AspireError;
use crate::parser::ParserKind;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// One transformation step applied to every model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Group atoms under their predicate, collapsing duplicates
    ByPredicate,
    /// Keep only the first argument of each atom
    FirstArgOnly,
    /// Type every argument: integers, strings, nested terms, tuples
    ParseArgs,
    /// Like `ParseArgs`, but integers stay as written
    IntNotParsed,
    /// Expose each atom as a `TermView`
    TermView,
    /// Replace quoted string arguments by their content
    DiscardQuotes,
    /// Sort atoms, or the values of each group, collapsing duplicates
    Sorted,
    /// Split lines with the grammar parser even when nothing else needs it
    #[serde(rename = "careful")]
    CarefulParsing,
    /// Render each atom back to its text form
    AtomsAsString,
    /// Drop arguments, keep predicates
    NoArg,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::ByPredicate,
        Stage::FirstArgOnly,
        Stage::ParseArgs,
        Stage::IntNotParsed,
        Stage::TermView,
        Stage::DiscardQuotes,
        Stage::Sorted,
        Stage::CarefulParsing,
        Stage::AtomsAsString,
        Stage::NoArg,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::ByPredicate => "by-predicate",
            Stage::FirstArgOnly => "first-arg-only",
            Stage::ParseArgs => "parse-args",
            Stage::IntNotParsed => "int-not-parsed",
            Stage::TermView => "term-view",
            Stage::DiscardQuotes => "discard-quotes",
            Stage::Sorted => "sorted",
            Stage::CarefulParsing => "careful",
            Stage::AtomsAsString => "atoms-as-string",
            Stage::NoArg => "no-arg",
        }
    }

    /// Whether the stage needs exact argument boundaries from the grammar parser
    pub fn requires_careful(&self) -> bool {
        matches!(
            self,
            Stage::FirstArgOnly
                | Stage::ParseArgs
                | Stage::IntNotParsed
                | Stage::TermView
                | Stage::DiscardQuotes
                | Stage::CarefulParsing
        )
    }

    fn shapes_arguments(&self) -> bool {
        matches!(
            self,
            Stage::FirstArgOnly
                | Stage::NoArg
                | Stage::ParseArgs
                | Stage::IntNotParsed
                | Stage::DiscardQuotes
        )
    }

    fn conflicts_with_literal(&self) -> bool {
        self.shapes_arguments() || *self == Stage::TermView
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Stage {
    type Err = AspireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Stage::ALL.iter().map(Stage::name).collect();
                AspireError::configuration(format!(
                    "unknown stage '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

#[derive(Debug)]
struct Link {
    stage: Stage,
    prev: Option<Rc<Link>>,
}

/// An immutable sequence of stages
///
/// Appending returns a new chain that shares every earlier link with the
/// chain it was built from, so forking a pipeline costs one allocation.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    last: Option<Rc<Link>>,
    len: usize,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// This chain followed by `stage`, if that combination can be applied
    pub fn then(&self, stage: Stage) -> Result<Chain, AspireError> {
        check(&self.stages(), stage)?;
        Ok(Chain {
            last: Some(Rc::new(Link {
                stage,
                prev: self.last.clone(),
            })),
            len: self.len + 1,
        })
    }

    pub fn from_stages<I: IntoIterator<Item = Stage>>(stages: I) -> Result<Chain, AspireError> {
        stages
            .into_iter()
            .try_fold(Chain::new(), |chain, stage| chain.then(stage))
    }

    /// This chain followed by every stage of `other`, in order
    pub fn concat(&self, other: &Chain) -> Result<Chain, AspireError> {
        other
            .stages()
            .into_iter()
            .try_fold(self.clone(), |chain, stage| chain.then(stage))
    }

    /// Stages in application order
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::with_capacity(self.len);
        let mut link = self.last.as_deref();
        while let Some(current) = link {
            stages.push(current.stage);
            link = current.prev.as_deref();
        }
        stages.reverse();
        stages
    }

    pub fn contains(&self, stage: Stage) -> bool {
        let mut link = self.last.as_deref();
        while let Some(current) = link {
            if current.stage == stage {
                return true;
            }
            link = current.prev.as_deref();
        }
        false
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The line parser every model of this chain goes through
    pub fn parser_kind(&self) -> ParserKind {
        if self.stages().iter().any(Stage::requires_careful) {
            ParserKind::Careful
        } else {
            ParserKind::Fast
        }
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.stages() == other.stages()
    }
}

impl Eq for Chain {}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.stages().iter().map(Stage::name).collect();
        write!(f, "{}", names.join(" | "))
    }
}

fn check(existing: &[Stage], next: Stage) -> Result<(), AspireError> {
    let has = |stage: Stage| existing.contains(&stage);
    let reject = |reason: String| {
        Err(AspireError::configuration(format!(
            "cannot apply '{}' {}",
            next, reason
        )))
    };

    if next == Stage::ByPredicate && has(Stage::FirstArgOnly) {
        return reject(
            "after 'first-arg-only'; group by predicate first, then keep the first argument"
                .to_string(),
        );
    }
    for (a, b) in [
        (Stage::FirstArgOnly, Stage::NoArg),
        (Stage::ParseArgs, Stage::IntNotParsed),
    ] {
        if (next == a && has(b)) || (next == b && has(a)) {
            let other = if next == a { b } else { a };
            return reject(format!("together with '{}'", other));
        }
    }
    if next == Stage::AtomsAsString {
        if let Some(other) = existing.iter().find(|s| s.conflicts_with_literal()) {
            return reject(format!(
                "after '{}'; atoms rendered as text keep their arguments as written",
                other
            ));
        }
    }
    if next.conflicts_with_literal() && has(Stage::AtomsAsString) {
        return reject("after 'atoms-as-string'; atoms are already text".to_string());
    }
    if next == Stage::TermView {
        if let Some(other) = existing
            .iter()
            .find(|s| matches!(s, Stage::FirstArgOnly | Stage::NoArg))
        {
            return reject(format!("after '{}'; the view needs every argument", other));
        }
    }
    if next.shapes_arguments() && has(Stage::TermView) {
        return reject("after 'term-view'; shape arguments before building views".to_string());
    }
    Ok(())
}
