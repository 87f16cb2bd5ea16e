//! Record layer error types

use crate::{
    DR0001, DR0002, DR0100, DR0101, DR0200, DR0201, DR0202, DR0300, DR0401, ErrorCode,
    SourceLocation, Span,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// The literal or path expression the error points into
    pub source: Option<String>,
    /// Location inside `source`
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            source: None,
            location: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    /// Point the diagnostic at a span of `source`
    pub fn with_span(mut self, span: Span, source: impl Into<String>) -> Self {
        let source = source.into();
        self.location = Some(SourceLocation::from_span(span, &source));
        self.source = Some(source);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic with the offending text underlined
    pub fn render(&self) -> String {
        let mut out = self.to_string();
        if let (Some(source), Some(location)) = (&self.source, &self.location) {
            let width = location.length.max(1);
            out.push_str(&format!(
                "\n  | {}\n  | {}{}",
                source,
                " ".repeat(location.column - 1),
                "^".repeat(width)
            ));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  = help: {help}"));
        }
        out
    }

    /// Render with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => self.severity.to_string().red().bold(),
            Severity::Warning => self.severity.to_string().yellow().bold(),
        };
        let mut out = format!("{}[{}]: {}", severity, self.code, self.message.bold());
        if let (Some(source), Some(location)) = (&self.source, &self.location) {
            let width = location.length.max(1);
            out.push_str(&format!(
                "\n  {} {}\n  {} {}{}",
                "|".blue(),
                source,
                "|".blue(),
                " ".repeat(location.column - 1),
                "^".repeat(width).red()
            ));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "= help:".cyan(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main record layer error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// A value cannot be converted to the requested type
    #[error("{}: cannot convert {found} value '{value}' to {expected}", DR0100)]
    TypeMismatch {
        expected: String,
        found: String,
        value: String,
    },

    /// A string could not be parsed with the selected date pattern
    #[error("{}: error parsing date '{input}' using the format '{format}'", DR0101)]
    DateParseError { input: String, format: String },

    /// Wire text that does not follow the literal grammar
    #[error("{}: {message} at offset {offset} in '{literal}'", DR0001)]
    MalformedLiteral {
        message: String,
        literal: String,
        offset: usize,
    },

    /// A value kind that has no textual form for the requested tag
    #[error("{}: a {kind} value cannot be written as {tag}", DR0002)]
    UnsupportedType { tag: String, kind: String },

    /// A path expression that cannot be tokenized or indexed
    #[error("{}: {message} in path '{path}' at {span}", DR0200)]
    MalformedPath {
        message: String,
        path: String,
        span: Span,
    },

    #[error("{}: index {index} is out of range for length {length}", DR0201)]
    IndexOutOfRange { index: i64, length: usize },

    #[error("{}: unknown attribute '{name}'", DR0202)]
    UnknownAttribute { name: String },

    /// The record loader could not materialize a record
    #[error("{}: record {rid} not found", DR0300)]
    RecordNotFound { rid: String },

    #[error("{}: {message}", DR0401)]
    Config { message: String },
}

impl RecordError {
    pub fn type_mismatch(
        expected: impl fmt::Display,
        found: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            value: value.to_string(),
        }
    }

    pub fn date_parse(input: impl Into<String>, format: impl Into<String>) -> Self {
        Self::DateParseError {
            input: input.into(),
            format: format.into(),
        }
    }

    pub fn malformed_literal(
        message: impl Into<String>,
        literal: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::MalformedLiteral {
            message: message.into(),
            literal: literal.into(),
            offset,
        }
    }

    pub fn unsupported_type(tag: impl fmt::Display, kind: impl fmt::Display) -> Self {
        Self::UnsupportedType {
            tag: tag.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn malformed_path(
        message: impl Into<String>,
        path: impl Into<String>,
        span: impl Into<Span>,
    ) -> Self {
        Self::MalformedPath {
            message: message.into(),
            path: path.into(),
            span: span.into(),
        }
    }

    pub fn index_out_of_range(index: i64, length: usize) -> Self {
        Self::IndexOutOfRange { index, length }
    }

    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }

    pub fn record_not_found(rid: impl fmt::Display) -> Self {
        Self::RecordNotFound {
            rid: rid.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TypeMismatch { .. } => DR0100,
            Self::DateParseError { .. } => DR0101,
            Self::MalformedLiteral { .. } => DR0001,
            Self::UnsupportedType { .. } => DR0002,
            Self::MalformedPath { .. } => DR0200,
            Self::IndexOutOfRange { .. } => DR0201,
            Self::UnknownAttribute { .. } => DR0202,
            Self::RecordNotFound { .. } => DR0300,
            Self::Config { .. } => DR0401,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self {
            Self::MalformedLiteral { message, .. } | Self::MalformedPath { message, .. } => {
                message.clone()
            }
            other => {
                let text = other.to_string();
                let prefix = format!("{}: ", other.code());
                text.strip_prefix(&prefix).map(str::to_owned).unwrap_or(text)
            }
        };
        let mut diag = Diagnostic::error(self.code(), message);
        match self {
            Self::MalformedLiteral {
                literal, offset, ..
            } => {
                let end = literal
                    .get(*offset..)
                    .and_then(|rest| rest.chars().next())
                    .map_or(*offset, |c| offset + c.len_utf8());
                diag = diag.with_span(Span::new(*offset, end), literal.clone());
            }
            Self::MalformedPath { path, span, .. } => {
                diag = diag.with_span(*span, path.clone());
            }
            _ => {}
        }
        if let Some(help) = self.code().info().help {
            diag = diag.with_help(help);
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_code() {
        let err = RecordError::type_mismatch("INTEGER", "STRING", "abc");
        assert_eq!(
            err.to_string(),
            "DR0100: cannot convert STRING value 'abc' to INTEGER"
        );
        assert_eq!(err.code(), DR0100);
    }

    #[test]
    fn test_path_diagnostic_points_at_span() {
        let err = RecordError::malformed_path("missing closing ']'", "items[0", 5..7);
        let diag = err.to_diagnostic();

        assert_eq!(diag.message, "missing closing ']'");
        assert_eq!(diag.location.as_ref().map(|l| l.column), Some(6));
        assert!(diag.render().contains("     ^^"));
    }

    #[test]
    fn test_diagnostic_strips_code_prefix() {
        let err = RecordError::record_not_found("#3:1");
        let diag = err.to_diagnostic();
        assert_eq!(diag.message, "record #3:1 not found");
        assert!(diag.to_string().starts_with("error: DR0300"));
    }

    #[test]
    fn test_warning_render() {
        let diag = Diagnostic::warning(DR0100, "body does not parse as LONG").with_span(
            Span::new(0, 4),
            "12lx",
        );
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(
            diag.render(),
            "warning: DR0100 - body does not parse as LONG at 1:1\n  | 12lx\n  | ^^^^"
        );
    }

    #[test]
    fn test_literal_offset_past_end() {
        let err = RecordError::malformed_literal("unterminated string", "\"abc", 4);
        let diag = err.to_diagnostic();
        assert_eq!(diag.location.map(|l| l.offset), Some(4));
    }
}
