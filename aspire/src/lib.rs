//! # Aspire
//!
//! **Answer sets as data**
//!
//! Aspire runs the clingo answer set solver, reads its models one at a time
//! and reshapes them into values a program can use directly: terms grouped by
//! predicate, typed arguments, plain strings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aspire::{solve_inline, AspireResult, SolveOptions};
//!
//! fn main() -> AspireResult<()> {
//!     let answers = solve_inline(
//!         "obj(a;b). att(c). 1 { pick(X) : obj(X) } 1.",
//!         &SolveOptions::new().with_nb_model(0),
//!     )?
//!     .by_predicate()?
//!     .parse_args()?;
//!
//!     for model in &answers {
//!         let model = model?;
//!         println!("model {}: picks {:?}", model.index, model.get("pick"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Models
//! The solver prints each model as one line of ground terms. A line is split
//! by the fast delimiter scanner unless a stage needs exact argument
//! boundaries, in which case the grammar parser is used for the whole run.
//!
//! ### Stages
//! Stages such as `by_predicate` or `parse_args` are appended to an
//! [`Answers`] value and applied to every model, in order. Combinations that
//! cannot be applied are rejected when the stage is added.
//!
//! ### Laziness
//! Nothing runs until the first model is pulled. Dropping the iterator early
//! kills the solver.

pub mod answer;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod resource_limits;
pub mod serializers;
pub mod solver;
pub mod span;
pub mod term;
pub mod view;

pub use answer::AnswerSet;
pub use error::{AspireError, FailureKind, MalformedTerm, SolverFailure};
pub use parser::{parse_line, ParserKind};
pub use pipeline::{
    AnswerSetIter, Answers, AtomValue, Atoms, Chain, ModelIter, ShapedAnswer, ShapedAtom, Stage,
};
pub use resource_limits::ResourceLimits;
pub use solver::{solve, solve_inline, Framing, Outcome, SolveOptions, SourceStatus};
pub use span::Span;
pub use term::{Arg, Term};
pub use view::TermView;

/// Result type for Aspire operations
pub type AspireResult<T> = Result<T, AspireError>;

#[cfg(test)]
mod tests;
