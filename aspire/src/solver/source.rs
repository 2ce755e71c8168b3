use crate::error::AspireError;
use std::io::BufRead;

/// Where a line source is in its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// Nothing has been read yet; a solver run has not been started
    Pending,
    /// Lines are being read; `pid` is set for solver processes
    Streaming { pid: Option<u32> },
    /// End of output reached; `code` is the solver's exit code when there was a process
    Exhausted { code: Option<i32> },
    /// Stopped before the end of output and all resources freed
    Released,
}

/// An ordered, incrementally produced sequence of text lines
pub trait LineSource {
    /// The next line without its line terminator, or `None` at end of output
    ///
    /// A released source answers `Err(AspireError::Cancelled)`.
    fn next_line(&mut self) -> Result<Option<String>, AspireError>;

    /// Stop producing lines and free whatever backs the source
    fn release(&mut self);

    fn status(&self) -> SourceStatus;

    /// The command line behind the source, empty when there is none
    fn command(&self) -> String {
        String::new()
    }
}

/// Lines read from any buffered reader: captured solver output, an export file
pub struct ReaderSource<R: BufRead> {
    reader: Option<R>,
    status: SourceStatus,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            status: SourceStatus::Pending,
        }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Option<String>, AspireError> {
        let Some(reader) = self.reader.as_mut() else {
            return match self.status {
                SourceStatus::Released => Err(AspireError::Cancelled),
                _ => Ok(None),
            };
        };
        self.status = SourceStatus::Streaming { pid: None };
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            self.reader = None;
            self.status = SourceStatus::Exhausted { code: None };
            return Ok(None);
        }
        trim_line_ending(&mut line);
        Ok(Some(line))
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            self.status = SourceStatus::Released;
        }
    }

    fn status(&self) -> SourceStatus {
        self.status
    }
}

/// Lines already in memory, or produced by any iterator of strings
pub struct IterSource {
    lines: Option<Box<dyn Iterator<Item = String>>>,
    status: SourceStatus,
}

impl IterSource {
    pub fn new<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'static,
    {
        Self {
            lines: Some(Box::new(lines.into_iter())),
            status: SourceStatus::Pending,
        }
    }
}

impl LineSource for IterSource {
    fn next_line(&mut self) -> Result<Option<String>, AspireError> {
        let Some(lines) = self.lines.as_mut() else {
            return match self.status {
                SourceStatus::Released => Err(AspireError::Cancelled),
                _ => Ok(None),
            };
        };
        match lines.next() {
            Some(mut line) => {
                self.status = SourceStatus::Streaming { pid: None };
                trim_line_ending(&mut line);
                Ok(Some(line))
            }
            None => {
                self.lines = None;
                self.status = SourceStatus::Exhausted { code: None };
                Ok(None)
            }
        }
    }

    fn release(&mut self) {
        if self.lines.take().is_some() {
            self.status = SourceStatus::Released;
        }
    }

    fn status(&self) -> SourceStatus {
        self.status
    }
}

pub(crate) fn trim_line_ending(line: &mut String) {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
}
