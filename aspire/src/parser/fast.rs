use super::{check_line_size, ParserKind};
use crate::error::AspireError;
use crate::resource_limits::ResourceLimits;
use crate::span::Span;
use crate::term::{Arg, Term};

/// Parse a model line by scanning delimiters at parenthesis depth zero
///
/// Terms are separated by `.` or whitespace outside parentheses, and
/// arguments by `,` outside nested parentheses. Quotes are not interpreted,
/// so a quoted argument containing `,` or parentheses is split wrongly; the
/// careful parser handles those lines. Unbalanced parentheses are always
/// reported, never truncated.
pub fn parse_line(line: &str, limits: &ResourceLimits) -> Result<Vec<Term>, AspireError> {
    check_line_size(line, limits)?;

    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut open_positions: Vec<usize> = Vec::new();
    let mut term_start: Option<usize> = None;

    for (i, c) in line.char_indices() {
        match c {
            '(' => {
                depth += 1;
                if depth > limits.max_nesting_depth {
                    return Err(AspireError::limit_exceeded(
                        "max_nesting_depth",
                        limits.max_nesting_depth,
                        depth,
                    ));
                }
                open_positions.push(i);
                term_start.get_or_insert(i);
            }
            ')' => {
                if depth == 0 {
                    return Err(AspireError::malformed(
                        "unmatched ')'",
                        line,
                        Span::new(i, i + 1),
                        ParserKind::Fast,
                    ));
                }
                depth -= 1;
                open_positions.pop();
            }
            '.' | ' ' | '\t' | '\r' | '\n' if depth == 0 => {
                if let Some(start) = term_start.take() {
                    terms.push(split_term(line, start, i)?);
                }
            }
            _ => {
                term_start.get_or_insert(i);
            }
        }
    }

    if let Some(&open) = open_positions.first() {
        return Err(AspireError::malformed(
            "unclosed '('",
            line,
            Span::new(open, line.len()),
            ParserKind::Fast,
        ));
    }
    if let Some(start) = term_start {
        terms.push(split_term(line, start, line.len())?);
    }
    Ok(terms)
}

/// Split `line[start..end]` into predicate name and raw arguments
fn split_term(line: &str, start: usize, end: usize) -> Result<Term, AspireError> {
    let text = &line[start..end];
    let malformed = |message: &str, offset: usize| {
        AspireError::malformed(
            message,
            line,
            Span::new(start + offset, end),
            ParserKind::Fast,
        )
    };

    let Some(open) = text.find('(') else {
        return Ok(Term::from_parts(text, Vec::new()));
    };
    if open == 0 {
        return Err(malformed("missing predicate name", 0));
    }

    // the argument list must close exactly at the end of the term
    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close.ok_or_else(|| malformed("unclosed '('", open))?;
    if close + 1 != text.len() {
        return Err(malformed(
            "unexpected text after argument list",
            close + 1,
        ));
    }

    let inner = &text[open + 1..close];
    let mut args = Vec::new();
    if !inner.trim().is_empty() {
        let mut depth = 0usize;
        let mut arg_start = 0usize;
        for (i, c) in inner.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => {
                    args.push(raw_arg(inner, arg_start, i).ok_or_else(|| {
                        malformed("empty argument", open + 1 + arg_start)
                    })?);
                    arg_start = i + 1;
                }
                _ => {}
            }
        }
        args.push(
            raw_arg(inner, arg_start, inner.len())
                .ok_or_else(|| malformed("empty argument", open + 1 + arg_start))?,
        );
    }

    Ok(Term::from_parts(&text[..open], args))
}

fn raw_arg(inner: &str, start: usize, end: usize) -> Option<Arg> {
    let text = inner[start..end].trim();
    if text.is_empty() {
        None
    } else {
        Some(Arg::Raw(text.to_string()))
    }
}
