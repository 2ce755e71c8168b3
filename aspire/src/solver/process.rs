//! The solver run handle
//!
//! A `SolverRun` owns one solver process for its whole life: it starts the
//! process on the first read, hands out stdout one line at a time, and on
//! every way out (end of output, read error, release, drop) kills the
//! process if it still runs and reaps it.

use super::source::{trim_line_ending, LineSource, SourceStatus};
use crate::error::AspireError;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, warn};

/// Exit codes from here on mean the solver itself failed (33 memory, 65 error,
/// 128 no run). Lower codes combine the result flags: 1 interrupted,
/// 10 satisfiable, 20 search space exhausted.
const FIRST_FAILURE_CODE: i32 = 33;

/// Only the head of a chatty stderr is kept in error messages
const MAX_STDERR_BYTES: u64 = 64 * 1024;

pub struct SolverRun {
    program: PathBuf,
    args: Vec<String>,
    stdin: Option<String>,
    state: RunState,
}

enum RunState {
    Pending,
    Running(Running),
    Finished { code: Option<i32> },
    Failed,
    Released,
}

struct Running {
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr: File,
}

impl SolverRun {
    /// Describe a run of `program` with `args`; `stdin` is written to the
    /// process once it starts. Nothing is started yet.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, stdin: Option<String>) -> Self {
        Self {
            program: program.into(),
            args,
            stdin,
            state: RunState::Pending,
        }
    }

    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    pub fn pid(&self) -> Option<u32> {
        match &self.state {
            RunState::Running(running) => Some(running.child.id()),
            _ => None,
        }
    }

    fn launch(&mut self) -> Result<(), AspireError> {
        match self.spawn() {
            Ok(running) => {
                debug!(
                    pid = running.child.id(),
                    command = %self.command_line(),
                    "solver started"
                );
                self.state = RunState::Running(running);
                Ok(())
            }
            Err(e) => {
                self.state = RunState::Failed;
                Err(e)
            }
        }
    }

    fn spawn(&mut self) -> Result<Running, AspireError> {
        let stderr = tempfile::tempfile()?;
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(if self.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::from(stderr.try_clone()?));

        let mut child = command.spawn().map_err(|e| {
            AspireError::launch(
                format!("failed to spawn {}: {}", self.program.display(), e),
                self.command_line(),
            )
        })?;

        if let (Some(program), Some(mut stdin)) = (self.stdin.take(), child.stdin.take()) {
            // the solver reads its whole input before printing models; a
            // failed write means it already exited and the exit code will say why
            if let Err(e) = stdin.write_all(program.as_bytes()) {
                debug!(error = %e, "solver closed stdin early");
            }
        }

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AspireError::launch(
                "solver stdout was not captured",
                self.command_line(),
            ));
        };

        Ok(Running {
            child,
            stdout: BufReader::new(stdout),
            stderr,
        })
    }

    /// Reap the process after its stdout closed and judge the exit code
    fn finish(&mut self) -> Result<(), AspireError> {
        let RunState::Running(mut running) = std::mem::replace(&mut self.state, RunState::Failed)
        else {
            return Ok(());
        };
        let pid = running.child.id();
        let status = running.child.wait()?;
        let code = status.code();
        self.state = RunState::Finished { code };
        debug!(pid, ?code, "solver exited");

        if is_failure(code) {
            let stderr = read_captured(&mut running.stderr);
            let message = match code {
                Some(33) => "out of memory".to_string(),
                Some(65) => "solver reported an error".to_string(),
                Some(128) => "solver did not run".to_string(),
                Some(code) => format!("unexpected exit code {}", code),
                None => "killed by a signal".to_string(),
            };
            warn!(pid, ?code, "solver failed");
            return Err(AspireError::exit(code, message, self.command_line(), stderr));
        }
        Ok(())
    }
}

impl LineSource for SolverRun {
    fn next_line(&mut self) -> Result<Option<String>, AspireError> {
        if matches!(self.state, RunState::Pending) {
            self.launch()?;
        }
        let running = match &mut self.state {
            RunState::Running(running) => running,
            RunState::Released => return Err(AspireError::Cancelled),
            _ => return Ok(None),
        };

        let mut line = String::new();
        match running.stdout.read_line(&mut line) {
            Ok(0) => {
                self.finish()?;
                Ok(None)
            }
            Ok(_) => {
                trim_line_ending(&mut line);
                Ok(Some(line))
            }
            Err(e) => {
                self.release();
                Err(e.into())
            }
        }
    }

    /// Kill the process if it still runs, reap it, and close its pipes
    ///
    /// Safe to call any number of times; a finished run keeps its exit status.
    fn release(&mut self) {
        match std::mem::replace(&mut self.state, RunState::Released) {
            RunState::Running(mut running) => {
                let pid = running.child.id();
                if let Err(e) = running.child.kill() {
                    debug!(pid, error = %e, "solver already gone");
                }
                match running.child.wait() {
                    Ok(status) => debug!(pid, %status, "solver released"),
                    Err(e) => warn!(pid, error = %e, "could not reap solver"),
                }
            }
            RunState::Finished { code } => self.state = RunState::Finished { code },
            RunState::Pending | RunState::Failed | RunState::Released => {}
        }
    }

    fn status(&self) -> SourceStatus {
        match &self.state {
            RunState::Pending => SourceStatus::Pending,
            RunState::Running(running) => SourceStatus::Streaming {
                pid: Some(running.child.id()),
            },
            RunState::Finished { code } => SourceStatus::Exhausted { code: *code },
            RunState::Failed => SourceStatus::Exhausted { code: None },
            RunState::Released => SourceStatus::Released,
        }
    }

    fn command(&self) -> String {
        self.command_line()
    }
}

impl Drop for SolverRun {
    fn drop(&mut self) {
        self.release();
    }
}

fn is_failure(code: Option<i32>) -> bool {
    match code {
        Some(code) => !(0..FIRST_FAILURE_CODE).contains(&code),
        None => true,
    }
}

fn read_captured(stderr: &mut File) -> String {
    let mut captured = String::new();
    if stderr.seek(SeekFrom::Start(0)).is_ok() {
        let _ = stderr
            .take(MAX_STDERR_BYTES)
            .read_to_string(&mut captured);
    }
    captured
}
