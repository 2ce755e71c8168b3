use crate::parser::ParserKind;
use crate::span::Span;
use std::fmt;
use thiserror::Error;

/// Where and why a model line could not be split into terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedTerm {
    pub message: String,
    pub line: String,
    pub span: Span,
    pub fragment: String,
    pub parser: ParserKind,
}

impl fmt::Display for MalformedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Malformed term: {} at byte {} near '{}' ({} parser)",
            self.message, self.span.start, self.fragment, self.parser
        )
    }
}

/// Why the solver process failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The process could not be started, or was given invalid options
    Launch,
    /// The process exited with a failure code, or was killed by a signal it was not sent
    Exit { code: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverFailure {
    pub kind: FailureKind,
    pub message: String,
    pub command: String,
    pub stderr: String,
}

impl fmt::Display for SolverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FailureKind::Launch => write!(f, "Solver could not be started: {}", self.message)?,
            FailureKind::Exit { code: Some(code) } => {
                write!(f, "Solver failed with exit code {}: {}", code, self.message)?
            }
            FailureKind::Exit { code: None } => {
                write!(f, "Solver was terminated by a signal: {}", self.message)?
            }
        }
        if !self.command.is_empty() {
            write!(f, " (command: {})", self.command)?;
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, "\n{}", stderr)?;
        }
        Ok(())
    }
}

/// Error types for parsing and reshaping solver output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AspireError {
    /// A line's parenthesis or quote structure could not be resolved
    #[error("{0}")]
    MalformedTerm(Box<MalformedTerm>),

    /// A stage chain that cannot be applied
    #[error("Pipeline configuration error: {0}")]
    PipelineConfiguration(String),

    /// The solver process failed to start or exited with a failure code
    #[error("{0}")]
    SolverProcess(Box<SolverFailure>),

    /// A term built by hand violates the term invariants
    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    #[error("Resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})")]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
    },

    #[error("I/O error: {0}")]
    Io(String),

    /// Raised by a released source to unwind a pending read. Iterators turn it
    /// into the end of iteration, so it never reaches callers.
    #[doc(hidden)]
    #[error("solver run cancelled")]
    Cancelled,
}

impl AspireError {
    /// Create a malformed-term error pointing at `span` within `line`
    pub fn malformed(
        message: impl Into<String>,
        line: &str,
        span: Span,
        parser: ParserKind,
    ) -> Self {
        let start = span.start.min(line.len());
        let fragment: String = line.get(start..).unwrap_or_default().chars().take(32).collect();
        Self::MalformedTerm(Box::new(MalformedTerm {
            message: message.into(),
            line: line.to_string(),
            span,
            fragment,
            parser,
        }))
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::PipelineConfiguration(message.into())
    }

    /// Create a launch failure for `command`
    pub fn launch(message: impl Into<String>, command: impl Into<String>) -> Self {
        Self::SolverProcess(Box::new(SolverFailure {
            kind: FailureKind::Launch,
            message: message.into(),
            command: command.into(),
            stderr: String::new(),
        }))
    }

    /// Create an exit failure carrying the captured stderr
    pub fn exit(
        code: Option<i32>,
        message: impl Into<String>,
        command: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::SolverProcess(Box::new(SolverFailure {
            kind: FailureKind::Exit { code },
            message: message.into(),
            command: command.into(),
            stderr: stderr.into(),
        }))
    }

    pub fn limit_exceeded(
        limit_name: impl Into<String>,
        limit_value: impl ToString,
        actual_value: impl ToString,
    ) -> Self {
        Self::ResourceLimitExceeded {
            limit_name: limit_name.into(),
            limit_value: limit_value.to_string(),
            actual_value: actual_value.to_string(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, AspireError::MalformedTerm(_))
    }
}

impl From<std::io::Error> for AspireError {
    fn from(err: std::io::Error) -> Self {
        AspireError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AspireError {
    fn from(err: serde_json::Error) -> Self {
        AspireError::Io(format!("JSON serialization failed: {}", err))
    }
}
