use crate::solver::framing::{Framing, ModelReader, Outcome, RawModel};
use crate::solver::source::{IterSource, LineSource, SourceStatus};
use crate::AspireError;

fn reader(lines: &[&str], framing: Framing) -> ModelReader {
    let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    ModelReader::new(Box::new(IterSource::new(lines)), framing)
}

fn models(reader: &mut ModelReader) -> Vec<RawModel> {
    let mut models = Vec::new();
    while let Some(model) = reader.next_model().unwrap() {
        models.push(model);
    }
    models
}

const SOLVER_OUTPUT: &[&str] = &[
    "clingo version 5.6.2",
    "Reading from stdin",
    "Solving...",
    "Answer: 1",
    "obj(a). obj(b). att(c).",
    "Answer: 2",
    "obj(a).",
    "SATISFIABLE",
    "",
    "Models       : 2",
    "Calls        : 1",
    "Time         : 0.002s (Solving: 0.00s 1st Model: 0.00s Unsat: 0.00s)",
    "CPU Time     : 0.002s",
];

#[test]
fn test_solver_framing() {
    let mut reader = reader(SOLVER_OUTPUT, Framing::Solver);
    let models = models(&mut reader);
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].index, 1);
    assert_eq!(models[0].line, "obj(a). obj(b). att(c).");
    assert!(models[0].shown);
    assert_eq!(models[1].index, 2);
    assert_eq!(models[1].line, "obj(a).");
    assert_eq!(reader.outcome(), Some(Outcome::Satisfiable));
}

#[test]
fn test_optimization_attaches_to_preceding_model() {
    let mut reader = reader(
        &[
            "Answer: 1",
            "cost(9).",
            "Optimization: 9 2",
            "Answer: 2",
            "cost(5).",
            "Optimization: 5 3",
            "OPTIMUM FOUND",
            "",
            "Models       : 2",
            "  Optimum    : yes",
            "Optimization : 5 3",
        ],
        Framing::Solver,
    );
    let models = models(&mut reader);
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].cost, Some(vec![9, 2]));
    assert_eq!(models[1].cost, Some(vec![5, 3]));
    assert_eq!(reader.outcome(), Some(Outcome::OptimumFound));
}

#[test]
fn test_optimization_before_model_attaches_to_next() {
    let mut reader = reader(
        &["Answer: 1", "a.", "Optimization: 4", "Optimization: 3", "Answer: 2", "b."],
        Framing::Solver,
    );
    let models = models(&mut reader);
    assert_eq!(models[0].cost, Some(vec![4]));
    assert_eq!(models[1].cost, Some(vec![3]));
}

#[test]
fn test_empty_model_line_is_a_model() {
    let mut reader = reader(&["Answer: 1", "", "SATISFIABLE"], Framing::Solver);
    let models = models(&mut reader);
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].line, "");
}

#[test]
fn test_unsatisfiable_has_no_models() {
    let mut reader = reader(
        &["clingo version 5.6.2", "Reading from p.lp", "Solving...", "UNSATISFIABLE", "", "Models       : 0"],
        Framing::Solver,
    );
    assert!(models(&mut reader).is_empty());
    assert_eq!(reader.outcome(), Some(Outcome::Unsatisfiable));
}

#[test]
fn test_lines_framing_numbers_models() {
    let mut reader = reader(&["a(1).", "", "  ", "b(2).", "% comment", "c."], Framing::Lines);
    let models = models(&mut reader);
    let lines: Vec<&str> = models.iter().map(|m| m.line.as_str()).collect();
    assert_eq!(lines, vec!["a(1).", "b(2).", "c."]);
    let indexes: Vec<usize> = models.iter().map(|m| m.index).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
    assert!(models.iter().all(|m| !m.shown));
}

#[test]
fn test_lines_framing_accepts_solver_headers() {
    let mut reader = reader(&["Answer: 7", "a.", "b."], Framing::Lines);
    let models = models(&mut reader);
    assert_eq!(models.len(), 2);
    assert_eq!((models[0].index, models[0].shown), (7, true));
    assert_eq!((models[1].index, models[1].shown), (8, false));
}

#[test]
fn test_unreadable_optimization_line_is_skipped() {
    let mut reader = reader(&["Answer: 1", "a.", "Optimization: x"], Framing::Solver);
    let models = models(&mut reader);
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].cost, None);
}

struct FailingSource {
    lines: Vec<String>,
}

impl LineSource for FailingSource {
    fn next_line(&mut self) -> Result<Option<String>, AspireError> {
        if self.lines.is_empty() {
            Err(AspireError::exit(Some(65), "solver reported an error", "clingo", "boom"))
        } else {
            Ok(Some(self.lines.remove(0)))
        }
    }

    fn release(&mut self) {}

    fn status(&self) -> SourceStatus {
        SourceStatus::Streaming { pid: None }
    }
}

#[test]
fn test_held_model_comes_before_source_error() {
    let source = FailingSource {
        lines: vec!["Answer: 1".to_string(), "a.".to_string()],
    };
    let mut reader = ModelReader::new(Box::new(source), Framing::Solver);
    assert_eq!(reader.next_model().unwrap().map(|m| m.line), Some("a.".to_string()));
    assert!(matches!(reader.next_model(), Err(AspireError::SolverProcess(_))));
    assert_eq!(reader.next_model(), Ok(None));
}

#[test]
fn test_release_ends_models() {
    let mut reader = reader(SOLVER_OUTPUT, Framing::Solver);
    reader.release();
    assert_eq!(reader.next_model(), Ok(None));
    assert_eq!(reader.status(), SourceStatus::Released);
}

/// Hands out its lines and counts how many were asked for
struct CountingSource {
    lines: Vec<String>,
    read: std::rc::Rc<std::cell::Cell<usize>>,
}

impl LineSource for CountingSource {
    fn next_line(&mut self) -> Result<Option<String>, AspireError> {
        let read = self.read.get();
        self.read.set(read + 1);
        Ok(self.lines.get(read).cloned())
    }

    fn release(&mut self) {}

    fn status(&self) -> SourceStatus {
        SourceStatus::Streaming { pid: None }
    }
}

fn counting_reader(lines: &[&str], framing: Framing) -> (ModelReader, std::rc::Rc<std::cell::Cell<usize>>) {
    let read = std::rc::Rc::new(std::cell::Cell::new(0));
    let source = CountingSource {
        lines: lines.iter().map(|l| l.to_string()).collect(),
        read: read.clone(),
    };
    (ModelReader::new(Box::new(source), framing), read)
}

#[test]
fn test_model_is_yielded_before_the_next_model_line() {
    let (mut reader, read) = counting_reader(
        &["Answer: 1", "a.", "Optimization: 4", "Answer: 2", "b."],
        Framing::Solver,
    );
    let first = reader.next_model().unwrap().unwrap();
    assert_eq!(first.line, "a.");
    assert_eq!(first.cost, Some(vec![4]));
    assert_eq!(read.get(), 3, "read past the cost line of model 1");

    let second = reader.next_model().unwrap().unwrap();
    assert_eq!((second.index, second.line.as_str()), (2, "b."));
}

#[test]
fn test_answer_header_releases_the_held_model() {
    let (mut reader, read) = counting_reader(&["Answer: 1", "a.", "Answer: 2", "b."], Framing::Solver);
    assert_eq!(reader.next_model().unwrap().map(|m| m.index), Some(1));
    assert_eq!(read.get(), 3);
}

#[test]
fn test_verdict_and_chatter_release_the_held_model() {
    for trailer in ["SATISFIABLE", "Solving...", "% progress"] {
        let (mut reader, read) = counting_reader(&["Answer: 1", "a.", trailer, "Answer: 2"], Framing::Solver);
        assert_eq!(reader.next_model().unwrap().map(|m| m.index), Some(1), "after {}", trailer);
        assert_eq!(read.get(), 3, "after {}", trailer);
    }
}

#[test]
fn test_lines_framing_looks_ahead_one_line() {
    let (mut reader, read) = counting_reader(&["a.", "b.", "c."], Framing::Lines);
    assert_eq!(reader.next_model().unwrap().map(|m| m.line), Some("a.".to_string()));
    assert_eq!(read.get(), 2);
}
