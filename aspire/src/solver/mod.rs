//! Running the solver and reading its output
//!
//! `solve` and `solve_inline` only describe a run; the process starts when
//! the first model is pulled from the returned [`Answers`] and is killed and
//! reaped as soon as the answers are exhausted, cancelled or dropped.

pub mod framing;
pub mod options;
pub mod process;
pub mod source;

pub use framing::{Framing, ModelReader, Outcome, RawModel};
pub use options::{SolveOptions, CLINGO_ENV};
pub use process::SolverRun;
pub use source::{IterSource, LineSource, ReaderSource, SourceStatus};

use crate::error::AspireError;
use crate::pipeline::Answers;
use std::path::{Path, PathBuf};

/// Run the solver over `files` and, when given, a program fed through stdin
pub fn solve<I, P>(files: I, inline: Option<&str>, options: &SolveOptions) -> Result<Answers, AspireError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let files: Vec<PathBuf> = files
        .into_iter()
        .map(|f| f.as_ref().to_path_buf())
        .collect();
    if files.is_empty() && inline.is_none() {
        return Err(AspireError::launch(
            "no program given: pass source files or an inline program",
            options.clingo_path.display().to_string(),
        ));
    }
    options.validate()?;

    let run = SolverRun::new(
        options.clingo_path.clone(),
        options.arguments(&files, inline.is_some()),
        inline.map(str::to_string),
    );
    Ok(Answers::from_source(
        Box::new(run),
        Framing::Solver,
        options.limits.clone(),
    ))
}

/// Run the solver over a program given as text
pub fn solve_inline(program: &str, options: &SolveOptions) -> Result<Answers, AspireError> {
    solve(Vec::<PathBuf>::new(), Some(program), options)
}
