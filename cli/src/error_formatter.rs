use aspire::{AspireError, FailureKind};
use ariadne::{Color, Label, Report, ReportKind, Source};

/// Format an AspireError with fancy terminal output using Ariadne
pub fn format_error(error: &AspireError) -> String {
    match error {
        AspireError::MalformedTerm(details) => {
            let mut output = Vec::new();
            let source_id = "<model line>";
            let start = details.span.start.min(details.line.len());
            let end = details.span.end.clamp(start, details.line.len());
            // ariadne needs a non-empty range to draw the label
            let end = if end == start {
                (start + 1).min(details.line.len())
            } else {
                end
            };

            let report = Report::build(ReportKind::Error, source_id, start)
                .with_message(format!("Malformed term: {}", details.message))
                .with_label(
                    Label::new((source_id, start..end))
                        .with_message(format!("{} parser stopped here", details.parser))
                        .with_color(Color::Red),
                )
                .with_help("use --careful if the line contains quoted strings");

            match report
                .finish()
                .write((source_id, Source::from(details.line.as_str())), &mut output)
            {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => format!("{}", error),
            }
        }
        AspireError::SolverProcess(failure) => {
            let mut message = match failure.kind {
                FailureKind::Launch => format!("Solver error: {}", failure.message),
                FailureKind::Exit { code: Some(code) } => {
                    format!("Solver error: {} (exit code {})", failure.message, code)
                }
                FailureKind::Exit { code: None } => format!("Solver error: {}", failure.message),
            };
            if !failure.command.is_empty() {
                message.push_str(&format!("\n  Command: {}", failure.command));
            }
            let stderr = failure.stderr.trim();
            if !stderr.is_empty() {
                message.push_str("\n  Solver output:");
                for line in stderr.lines() {
                    message.push_str(&format!("\n    {}", line));
                }
            }
            message
        }
        AspireError::PipelineConfiguration(msg) => format!("Configuration error: {}", msg),
        AspireError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
        } => format!(
            "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}",
            limit_name, limit_value, actual_value
        ),
        other => format!("Error: {}", other),
    }
}
