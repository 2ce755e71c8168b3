//! Model framing
//!
//! Splits a stream of solver output lines into raw model lines plus the
//! metadata printed around them. Non-model lines (version banner, progress
//! messages, statistics) are skipped.

use super::source::{LineSource, SourceStatus};
use crate::error::AspireError;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{trace, warn};

/// How model lines are recognized in a line stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Solver output: a model is the line following an `Answer: n` header
    #[default]
    Solver,
    /// Every non-blank line that is not solver framing is one model
    Lines,
}

/// The solver's verdict, read from its summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Satisfiable,
    Unsatisfiable,
    Unknown,
    OptimumFound,
}

/// One model line with its header metadata, not yet parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModel {
    pub index: usize,
    pub line: String,
    pub cost: Option<Vec<i64>>,
    pub shown: bool,
}

enum LineKind {
    Answer(Option<usize>),
    Optimization(Vec<i64>),
    Verdict(Outcome),
    Chatter,
    Content,
}

fn statistics_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // `Models       : 3`, `Time         : 0.002s (...)`, `Optimum      : yes`
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9 ]*\s:(\s|$)").expect("valid pattern"))
}

fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix("Answer:") {
        return LineKind::Answer(rest.trim().parse().ok());
    }
    if let Some(rest) = trimmed.strip_prefix("Optimization:") {
        let values: Result<Vec<i64>, _> = rest.split_whitespace().map(str::parse).collect();
        return match values {
            Ok(values) => LineKind::Optimization(values),
            Err(_) => {
                warn!(line = %line, "unreadable optimization line");
                LineKind::Chatter
            }
        };
    }
    match trimmed {
        "SATISFIABLE" => return LineKind::Verdict(Outcome::Satisfiable),
        "UNSATISFIABLE" => return LineKind::Verdict(Outcome::Unsatisfiable),
        "UNKNOWN" => return LineKind::Verdict(Outcome::Unknown),
        "OPTIMUM FOUND" => return LineKind::Verdict(Outcome::OptimumFound),
        _ => {}
    }
    if trimmed.starts_with("clingo version")
        || trimmed.starts_with("Reading from")
        || trimmed.starts_with("Solving...")
        || trimmed.starts_with("*** ")
        || trimmed.starts_with('%')
        || statistics_line().is_match(trimmed)
    {
        return LineKind::Chatter;
    }
    LineKind::Content
}

/// Pulls raw models out of a line source, one at a time
///
/// A model is held back for exactly one more line, so that an
/// `Optimization:` line printed right after it is attached to it. Whatever
/// that line is, the model is handed out once it has been read; the reader
/// never waits for the next model's line.
pub struct ModelReader {
    source: Box<dyn LineSource>,
    framing: Framing,
    held: Option<RawModel>,
    awaiting_model: Option<usize>,
    pending_cost: Option<Vec<i64>>,
    next_index: usize,
    outcome: Option<Outcome>,
    deferred: Option<AspireError>,
    finished: bool,
}

impl ModelReader {
    pub fn new(source: Box<dyn LineSource>, framing: Framing) -> Self {
        Self {
            source,
            framing,
            held: None,
            awaiting_model: None,
            pending_cost: None,
            next_index: 1,
            outcome: None,
            deferred: None,
            finished: false,
        }
    }

    /// The next model, `None` once the output is exhausted
    pub fn next_model(&mut self) -> Result<Option<RawModel>, AspireError> {
        loop {
            if self.finished {
                if let Some(model) = self.held.take() {
                    return Ok(Some(model));
                }
                return self.deferred.take().map_or(Ok(None), Err);
            }
            let line = match self.source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.finished = true;
                    continue;
                }
                Err(e) => {
                    // a model held back for its cost line goes out before the error
                    self.finished = true;
                    self.deferred = Some(e);
                    continue;
                }
            };

            if let Some(index) = self.awaiting_model.take() {
                trace!(index, "model line");
                let cost = self.pending_cost.take();
                if let Some(ready) = self.hold(RawModel {
                    index,
                    line,
                    cost,
                    shown: true,
                }) {
                    return Ok(Some(ready));
                }
                continue;
            }

            match classify(&line) {
                LineKind::Answer(number) => {
                    let index = number.unwrap_or(self.next_index);
                    self.next_index = index + 1;
                    self.awaiting_model = Some(index);
                }
                LineKind::Optimization(values) => match self.held.as_mut() {
                    Some(model) if model.cost.is_none() => model.cost = Some(values),
                    _ => self.pending_cost = Some(values),
                },
                LineKind::Verdict(outcome) => {
                    trace!(?outcome, "solver verdict");
                    self.outcome = Some(outcome);
                }
                LineKind::Chatter => trace!(line = %line, "skipped"),
                LineKind::Content => match self.framing {
                    Framing::Lines if !line.trim().is_empty() => {
                        let index = self.next_index;
                        self.next_index += 1;
                        let cost = self.pending_cost.take();
                        let model = RawModel {
                            index,
                            line,
                            cost,
                            shown: false,
                        };
                        // the new model waits for its own lookahead line
                        match self.hold(model) {
                            Some(ready) => return Ok(Some(ready)),
                            None => continue,
                        }
                    }
                    Framing::Lines => {}
                    Framing::Solver => trace!(line = %line, "unframed line skipped"),
                },
            }

            // one line past the model has been read: nothing more can attach to it
            if let Some(ready) = self.held.take() {
                return Ok(Some(ready));
            }
        }
    }

    /// Keep `model` back and hand out the one held before it
    fn hold(&mut self, model: RawModel) -> Option<RawModel> {
        self.held.replace(model)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn status(&self) -> SourceStatus {
        self.source.status()
    }

    pub fn command(&self) -> String {
        self.source.command()
    }

    pub fn release(&mut self) {
        self.finished = true;
        self.held = None;
        self.deferred = None;
        self.source.release();
    }
}
