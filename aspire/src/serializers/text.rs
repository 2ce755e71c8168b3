//! Answer sets written the way the solver prints them
//!
//! ```text
//! Answer: 1
//! obj(a). obj(b). att(c).
//! Optimization: 5 3
//! ```
//!
//! Such a file reads back with [`Framing::Solver`], so empty models and
//! costs survive the round trip.

use crate::answer::AnswerSet;
use crate::error::AspireError;
use crate::pipeline::Answers;
use crate::solver::framing::Framing;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub fn write_answer_set<W: Write>(writer: &mut W, answer_set: &AnswerSet) -> Result<(), AspireError> {
    writeln!(writer, "Answer: {}", answer_set.index())?;
    writeln!(writer, "{}", answer_set)?;
    if let Some(cost) = answer_set.cost() {
        let values: Vec<String> = cost.iter().map(i64::to_string).collect();
        writeln!(writer, "Optimization: {}", values.join(" "))?;
    }
    Ok(())
}

pub fn write_answer_sets<'a, W, I>(writer: &mut W, answer_sets: I) -> Result<(), AspireError>
where
    W: Write,
    I: IntoIterator<Item = &'a AnswerSet>,
{
    for answer_set in answer_sets {
        write_answer_set(writer, answer_set)?;
    }
    Ok(())
}

/// Pull every model of `answers` and write it; returns how many were written
///
/// Stops at the first model that fails to parse or at a solver failure.
pub fn write_answers<W: Write>(writer: &mut W, answers: &Answers) -> Result<usize, AspireError> {
    let mut written = 0;
    for answer_set in answers.answer_sets() {
        write_answer_set(writer, &answer_set?)?;
        written += 1;
    }
    Ok(written)
}

pub fn to_text<'a, I>(answer_sets: I) -> String
where
    I: IntoIterator<Item = &'a AnswerSet>,
{
    let mut buffer = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_answer_sets(&mut buffer, answer_sets);
    String::from_utf8_lossy(&buffer).into_owned()
}

pub fn read_answer_sets<R: Read + 'static>(reader: R) -> Answers {
    Answers::from_reader(BufReader::new(reader), Framing::Solver)
}

pub fn save(path: impl AsRef<Path>, answers: &Answers) -> Result<usize, AspireError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    let written = write_answers(&mut writer, answers)?;
    writer.flush()?;
    Ok(written)
}

pub fn load(path: impl AsRef<Path>) -> Result<Answers, AspireError> {
    let file = File::open(path.as_ref()).map_err(|e| {
        AspireError::Io(format!("cannot open {}: {}", path.as_ref().display(), e))
    })?;
    Ok(read_answer_sets(file))
}
