// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types, diagnostics, and reporting for the front end.

use std::fmt;

/// Categories of front-end errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontErrorKind {
    Lex,
    Structural,
    Arity,
    Continuation,
    Lookup,
    Access,
    Expansion,
    Cli,
    Io,
    NothingToDo,
}

/// A front-end error with a kind and message.
#[derive(Debug, Clone)]
pub struct FrontError {
    kind: FrontErrorKind,
    message: String,
}

impl FrontError {
    pub fn new(kind: FrontErrorKind, msg: &str, param: Option<&str>) -> Self {
        Self {
            kind,
            message: format_error(msg, param),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> FrontErrorKind {
        self.kind
    }
}

impl fmt::Display for FrontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FrontError {}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A diagnostic message with location and context.
///
/// `source` overrides file-line context when set; the structurer uses it to
/// show the accumulated multi-line statement text with the offending column
/// inside it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub(crate) line: u32,
    pub(crate) column: Option<usize>,
    pub(crate) width: Option<usize>,
    pub(crate) severity: Severity,
    pub(crate) error: FrontError,
    pub(crate) file: Option<String>,
    pub(crate) source: Option<String>,
}

impl Diagnostic {
    pub fn new(line: u32, severity: Severity, error: FrontError) -> Self {
        Self {
            line,
            column: None,
            width: None,
            severity,
            error,
            file: None,
            source: None,
        }
    }

    pub fn with_column(mut self, column: Option<usize>) -> Self {
        self.column = column;
        self
    }

    /// Byte width of the offending token, so the whole range is marked
    /// rather than its first character.
    pub fn with_width(mut self, width: Option<usize>) -> Self {
        self.width = width;
        self
    }

    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    pub fn error(&self) -> &FrontError {
        &self.error
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn format(&self) -> String {
        let sev = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        format!("{}: {} - {}", self.line, sev, self.error.message())
    }

    pub fn format_with_context(&self, lines: Option<&[String]>, use_color: bool) -> String {
        let sev = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        let header = match &self.file {
            Some(file) => format!("{file}:{}: {sev}", self.line),
            None => format!("{}: {sev}", self.line),
        };

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');

        let context = build_context_lines(
            self.line,
            self.column,
            self.width,
            lines,
            self.source.as_deref(),
            use_color,
        );
        for line in context {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&format!("{sev}: {}", self.error.message()));
        out
    }
}

/// Report from a run that produced output, possibly with diagnostics.
#[derive(Debug)]
pub struct RunReport {
    diagnostics: Vec<Diagnostic>,
    source_lines: Vec<String>,
}

impl RunReport {
    pub fn new(diagnostics: Vec<Diagnostic>, source_lines: Vec<String>) -> Self {
        Self {
            diagnostics,
            source_lines,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Error from a failed run.
#[derive(Debug)]
pub struct RunError {
    error: FrontError,
    diagnostics: Vec<Diagnostic>,
    source_lines: Vec<String>,
}

impl RunError {
    pub fn new(error: FrontError, diagnostics: Vec<Diagnostic>, source_lines: Vec<String>) -> Self {
        Self {
            error,
            diagnostics,
            source_lines,
        }
    }

    pub fn kind(&self) -> FrontErrorKind {
        self.error.kind()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for RunError {}

/// Build context lines for error display.
pub fn build_context_lines(
    line_num: u32,
    column: Option<usize>,
    width: Option<usize>,
    lines: Option<&[String]>,
    source_override: Option<&str>,
    use_color: bool,
) -> Vec<String> {
    let mut out = Vec::new();
    let line_idx = line_num.saturating_sub(1) as usize;

    if let Some(source) = source_override {
        let highlighted = mark(source, column, width, use_color);
        out.push(format!("{:>5} | {}", line_num, highlighted));
        return out;
    }

    let lines = match lines {
        Some(lines) if !lines.is_empty() => lines,
        _ => {
            out.push(format!("{:>5} | <source unavailable>", line_num));
            return out;
        }
    };

    if line_idx >= lines.len() {
        out.push(format!("{:>5} | <source unavailable>", line_num));
        return out;
    }

    let display = mark(&lines[line_idx], column, width, use_color);
    out.push(format!("{:>5} | {}", line_num, display));

    out
}

fn mark(line: &str, column: Option<usize>, width: Option<usize>, use_color: bool) -> String {
    match (column, width) {
        (Some(column), Some(width)) if column > 0 && width > 1 => {
            crate::report::highlight_range(line, column - 1, column - 1 + width, use_color)
        }
        _ => crate::report::highlight_line(line, column, use_color),
    }
}

/// Format an error message with an optional parameter.
pub fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(p) => format!("{msg}: {p}"),
        None => msg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_format_includes_line_and_severity() {
        let err = FrontError::new(FrontErrorKind::Structural, "Unexpected closer", None);
        let diag = Diagnostic::new(12, Severity::Error, err);
        assert_eq!(diag.format(), "12: ERROR - Unexpected closer");
    }

    #[test]
    fn format_error_appends_parameter() {
        assert_eq!(format_error("Unknown alias", Some("foo")), "Unknown alias: foo");
        assert_eq!(format_error("Unknown alias", None), "Unknown alias");
    }

    #[test]
    fn context_marks_the_whole_token_range() {
        let err = FrontError::new(FrontErrorKind::Expansion, "Circular alias substitution", None);
        let diag = Diagnostic::new(1, Severity::Error, err)
            .with_source(Some("lda looper;".to_string()))
            .with_column(Some(5))
            .with_width(Some(6));
        let text = diag.format_with_context(None, true);
        assert!(text.contains("lda \x1b[31mlooper\x1b[0m;"));
    }

    #[test]
    fn context_uses_source_override_when_present() {
        let err = FrontError::new(FrontErrorKind::Arity, "Unexpected extra term", None);
        let diag = Diagnostic::new(3, Severity::Error, err)
            .with_source(Some("a, b = 1; c".to_string()))
            .with_column(Some(4));
        let text = diag.format_with_context(Some(&["unrelated".to_string()]), false);
        assert!(text.contains("a, b = 1; c"));
        assert!(!text.contains("unrelated"));
    }
}
