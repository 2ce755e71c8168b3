use crate::error::AspireError;
use crate::pipeline::Answers;
use serde::Serialize;
use std::io::Write;

/// Serialize a shaped answer, answer set or term on one line
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AspireError> {
    Ok(serde_json::to_string(value)?)
}

pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, AspireError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write every reshaped model of `answers` as one JSON object per line
pub fn write_json_lines<W: Write>(writer: &mut W, answers: &Answers) -> Result<usize, AspireError> {
    let mut written = 0;
    for answer in answers {
        serde_json::to_writer(&mut *writer, &answer?)?;
        writeln!(writer)?;
        written += 1;
    }
    Ok(written)
}
