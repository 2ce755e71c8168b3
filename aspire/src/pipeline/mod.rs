//! The transformation pipeline
//!
//! An [`Answers`] value pairs a single-pass source of models with a chain of
//! stages. Adding a stage returns a new value; the old one stays usable and
//! both share the same source, so whichever is iterated first consumes it.
//!
//! ```
//! use aspire::Answers;
//!
//! let answers = Answers::from_lines(vec!["obj(a). obj(b). att(c).".to_string()])
//!     .by_predicate()
//!     .unwrap();
//! let model = answers.iter().next().unwrap().unwrap();
//! assert_eq!(model.get("obj").len(), 2);
//! ```

pub mod shape;
pub mod stage;

pub use shape::{AtomValue, Atoms, ShapedAnswer, ShapedAtom};
pub use stage::{Chain, Stage};

use crate::answer::AnswerSet;
use crate::error::AspireError;
use crate::parser::{self, ParserKind};
use crate::resource_limits::ResourceLimits;
use crate::solver::framing::{Framing, ModelReader, Outcome, RawModel};
use crate::solver::source::{IterSource, LineSource, ReaderSource, SourceStatus};
use std::cell::RefCell;
use std::io::BufRead;
use std::rc::Rc;
use tracing::debug;

/// Where the models of a pipeline come from
enum Feed {
    Lines(ModelReader),
    Parsed {
        sets: Option<Box<dyn Iterator<Item = AnswerSet>>>,
        status: SourceStatus,
    },
}

enum Pulled {
    Raw(RawModel),
    Parsed(AnswerSet),
}

impl Feed {
    fn next(&mut self) -> Result<Option<Pulled>, AspireError> {
        match self {
            Feed::Lines(reader) => Ok(reader.next_model()?.map(Pulled::Raw)),
            Feed::Parsed { sets, status } => {
                let Some(iter) = sets.as_mut() else {
                    return Ok(None);
                };
                match iter.next() {
                    Some(set) => {
                        *status = SourceStatus::Streaming { pid: None };
                        Ok(Some(Pulled::Parsed(set)))
                    }
                    None => {
                        *sets = None;
                        *status = SourceStatus::Exhausted { code: None };
                        Ok(None)
                    }
                }
            }
        }
    }

    fn release(&mut self) {
        match self {
            Feed::Lines(reader) => reader.release(),
            Feed::Parsed { sets, status } => {
                if sets.take().is_some() {
                    *status = SourceStatus::Released;
                }
            }
        }
    }

    fn status(&self) -> SourceStatus {
        match self {
            Feed::Lines(reader) => reader.status(),
            Feed::Parsed { status, .. } => *status,
        }
    }
}

/// Lazily reshaped models from one source
#[derive(Clone)]
pub struct Answers {
    feed: Rc<RefCell<Feed>>,
    chain: Chain,
    limits: ResourceLimits,
}

impl Answers {
    /// Models read from any line source, framed as given
    pub fn from_source(source: Box<dyn LineSource>, framing: Framing, limits: ResourceLimits) -> Self {
        Self::from_feed(Feed::Lines(ModelReader::new(source, framing)), limits)
    }

    /// One model per non-blank line
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'static,
    {
        Self::from_source(
            Box::new(IterSource::new(lines)),
            Framing::Lines,
            ResourceLimits::default(),
        )
    }

    /// Captured solver output held in memory
    pub fn from_solver_output<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'static,
    {
        Self::from_source(
            Box::new(IterSource::new(lines)),
            Framing::Solver,
            ResourceLimits::default(),
        )
    }

    pub fn from_reader<R: BufRead + 'static>(reader: R, framing: Framing) -> Self {
        Self::from_source(
            Box::new(ReaderSource::new(reader)),
            framing,
            ResourceLimits::default(),
        )
    }

    /// Answer sets that are already parsed, e.g. built by hand
    pub fn from_answer_sets<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = AnswerSet>,
        I::IntoIter: 'static,
    {
        Self::from_feed(
            Feed::Parsed {
                sets: Some(Box::new(sets.into_iter())),
                status: SourceStatus::Pending,
            },
            ResourceLimits::default(),
        )
    }

    fn from_feed(feed: Feed, limits: ResourceLimits) -> Self {
        Self {
            feed: Rc::new(RefCell::new(feed)),
            chain: Chain::new(),
            limits,
        }
    }

    /// Same source and stages, parsed under other limits
    pub fn with_limits(&self, limits: ResourceLimits) -> Self {
        Self {
            limits,
            ..self.clone()
        }
    }

    /// Append one stage, rejecting combinations that cannot be applied
    pub fn with_stage(&self, stage: Stage) -> Result<Answers, AspireError> {
        Ok(Self {
            chain: self.chain.then(stage)?,
            ..self.clone()
        })
    }

    /// Append every stage of `chain`
    pub fn with_chain(&self, chain: &Chain) -> Result<Answers, AspireError> {
        Ok(Self {
            chain: self.chain.concat(chain)?,
            ..self.clone()
        })
    }

    pub fn by_predicate(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::ByPredicate)
    }

    pub fn first_arg_only(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::FirstArgOnly)
    }

    pub fn parse_args(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::ParseArgs)
    }

    pub fn int_not_parsed(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::IntNotParsed)
    }

    pub fn term_view(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::TermView)
    }

    pub fn discard_quotes(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::DiscardQuotes)
    }

    pub fn sorted(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::Sorted)
    }

    pub fn careful_parsing(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::CarefulParsing)
    }

    pub fn atoms_as_string(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::AtomsAsString)
    }

    pub fn no_arg(&self) -> Result<Answers, AspireError> {
        self.with_stage(Stage::NoArg)
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn parser_kind(&self) -> ParserKind {
        self.chain.parser_kind()
    }

    /// The solver command line, empty for sources without a process
    pub fn command(&self) -> String {
        match &*self.feed.borrow() {
            Feed::Lines(reader) => reader.command(),
            Feed::Parsed { .. } => String::new(),
        }
    }

    /// The last summary verdict seen so far in solver output
    pub fn outcome(&self) -> Option<Outcome> {
        match &*self.feed.borrow() {
            Feed::Lines(reader) => reader.outcome(),
            Feed::Parsed { .. } => None,
        }
    }

    pub fn status(&self) -> SourceStatus {
        self.feed.borrow().status()
    }

    /// Stop the source now; a running solver is killed and reaped
    pub fn cancel(&self) {
        self.feed.borrow_mut().release();
    }

    pub fn iter(&self) -> ModelIter {
        ModelIter {
            puller: Puller::new(self.feed.clone()),
            parser: self.parser_kind(),
            stages: self.chain.stages(),
            limits: self.limits.clone(),
        }
    }

    /// Parsed models with no stage applied
    pub fn answer_sets(&self) -> AnswerSetIter {
        AnswerSetIter {
            puller: Puller::new(self.feed.clone()),
            parser: self.parser_kind(),
            limits: self.limits.clone(),
        }
    }
}

impl std::fmt::Debug for Answers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Answers")
            .field("chain", &self.chain.stages())
            .field("status", &self.status())
            .finish()
    }
}

impl IntoIterator for Answers {
    type Item = Result<ShapedAnswer, AspireError>;
    type IntoIter = ModelIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &Answers {
    type Item = Result<ShapedAnswer, AspireError>;
    type IntoIter = ModelIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pulls from the shared feed and releases it when dropped early
struct Puller {
    feed: Rc<RefCell<Feed>>,
    done: bool,
}

impl Puller {
    fn new(feed: Rc<RefCell<Feed>>) -> Self {
        Self { feed, done: false }
    }

    fn pull(&mut self) -> Option<Result<Pulled, AspireError>> {
        if self.done {
            return None;
        }
        let pulled = self.feed.borrow_mut().next();
        match pulled {
            Ok(Some(pulled)) => Some(Ok(pulled)),
            Ok(None) | Err(AspireError::Cancelled) => {
                self.done = true;
                None
            }
            Err(e) => {
                // the source is gone after a read or process failure
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl Drop for Puller {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if let Ok(mut feed) = self.feed.try_borrow_mut() {
            if matches!(feed.status(), SourceStatus::Streaming { .. }) {
                debug!("iteration stopped before end of output, releasing source");
            }
            feed.release();
        }
    }
}

fn parse(pulled: Pulled, parser: ParserKind, limits: &ResourceLimits) -> Result<AnswerSet, AspireError> {
    match pulled {
        Pulled::Parsed(set) => Ok(set),
        Pulled::Raw(model) => {
            let terms = parser::parse_line(&model.line, parser, limits)?;
            Ok(AnswerSet::new(terms, model.index)
                .with_cost(model.cost)
                .with_shown(model.shown))
        }
    }
}

/// Iterator over reshaped models
pub struct ModelIter {
    puller: Puller,
    parser: ParserKind,
    stages: Vec<Stage>,
    limits: ResourceLimits,
}

impl Iterator for ModelIter {
    type Item = Result<ShapedAnswer, AspireError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pulled = match self.puller.pull()? {
            Ok(pulled) => pulled,
            Err(e) => return Some(Err(e)),
        };
        Some(
            parse(pulled, self.parser, &self.limits)
                .map(|set| shape::reshape(set, &self.stages, &self.limits)),
        )
    }
}

/// Iterator over parsed, unshaped models
pub struct AnswerSetIter {
    puller: Puller,
    parser: ParserKind,
    limits: ResourceLimits,
}

impl Iterator for AnswerSetIter {
    type Item = Result<AnswerSet, AspireError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pulled = match self.puller.pull()? {
            Ok(pulled) => pulled,
            Err(e) => return Some(Err(e)),
        };
        Some(parse(pulled, self.parser, &self.limits))
    }
}
