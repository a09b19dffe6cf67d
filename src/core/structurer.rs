// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Statement structurer: turns physical lines into semicolon-terminated
//! statements with resolved container nesting.
//!
//! A statement may span several physical lines. The structurer keeps pulling
//! lines while the statement is incomplete: a container is still open, an
//! assignment still owes right-hand terms, or the line ends on an operator
//! awaiting an operand. Tokens are grouped into chunks, one per run between
//! structural boundaries, each tagged with the hierarchy level it was
//! captured at.

use crate::core::error::{Diagnostic, FrontError, FrontErrorKind, Severity};
use crate::core::expander::expand_aliases;
use crate::core::scope::Session;
use crate::core::tokenizer::{tokenize, Token, TokenClass, ASSIGN_OPERATORS};

/// Container kinds tracked on the hierarchy stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Paren,
    Bracket,
    Brace,
    Str,
    FormatStr,
}

impl ContainerKind {
    fn name(self) -> &'static str {
        match self {
            ContainerKind::Paren => "(",
            ContainerKind::Bracket => "[",
            ContainerKind::Brace => "{",
            ContainerKind::Str => "\"",
            ContainerKind::FormatStr => "$\"",
        }
    }
}

/// One open hierarchy level: its container kind (`None` for the statement
/// itself), terms seen so far, and the assignment arity bookkeeping.
#[derive(Debug)]
struct LevelRecord {
    kind: Option<ContainerKind>,
    terms: u32,
    resolving: bool,
    required: u32,
}

impl LevelRecord {
    fn bottom() -> Self {
        Self {
            kind: None,
            terms: 0,
            resolving: false,
            required: 0,
        }
    }

    fn open(kind: ContainerKind) -> Self {
        Self {
            kind: Some(kind),
            terms: 0,
            resolving: false,
            required: 0,
        }
    }
}

/// A token run captured between two structural boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub tokens: Vec<Token>,
    pub level: i32,
    pub terms: u32,
}

/// One semicolon-terminated statement, possibly spanning several physical
/// lines.
#[derive(Debug, Clone)]
pub struct Statement {
    pub chunks: Vec<Chunk>,
    pub max_level: i32,
    pub first_line: u32,
    pub last_line: u32,
    /// Accumulated source text the chunk offsets index into.
    pub text: String,
}

/// Outcome of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Ok,
    Malformed,
    Unterminated,
}

/// Statements fetched, the outcome, the next unconsumed line index, and any
/// diagnostics produced along the way.
#[derive(Debug)]
pub struct FetchResult {
    pub statements: Vec<Statement>,
    pub outcome: FetchOutcome,
    pub next_line: usize,
    pub diagnostics: Vec<Diagnostic>,
}

struct Fetcher<'a> {
    session: &'a Session,
    file: Option<&'a str>,
    levels: Vec<LevelRecord>,
    chunks: Vec<Chunk>,
    current: Vec<Token>,
    max_level: i32,
    ctx: String,
    line_no: u32,
    stmt_first_line: u32,
    in_block_comment: bool,
    statements: Vec<Statement>,
    diagnostics: Vec<Diagnostic>,
}

enum LineStep {
    Continue,
    CleanStop,
    Abort,
}

impl<'a> Fetcher<'a> {
    fn new(session: &'a Session, file: Option<&'a str>) -> Self {
        Self {
            session,
            file,
            levels: vec![LevelRecord::bottom()],
            chunks: Vec::new(),
            current: Vec::new(),
            max_level: -1,
            ctx: String::new(),
            line_no: 0,
            stmt_first_line: 0,
            in_block_comment: false,
            statements: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Depth of the innermost open container. The bottom record keeps the
    /// statement's own bookkeeping at level -1.
    fn level(&self) -> i32 {
        self.levels.len() as i32 - 2
    }

    fn top(&mut self) -> &mut LevelRecord {
        let last = self.levels.len() - 1;
        &mut self.levels[last]
    }

    fn has_pending(&self) -> bool {
        !self.chunks.is_empty() || self.current.iter().any(Token::is_semantic)
    }

    fn report(&mut self, kind: FrontErrorKind, msg: &str, offset: usize, width: usize) {
        let diag = Diagnostic::new(
            self.line_no,
            Severity::Error,
            FrontError::new(kind, msg, None),
        )
        .with_file(self.file.map(str::to_string))
        .with_source(Some(self.ctx.clone()))
        .with_column(Some(offset + 1))
        .with_width(Some(width));
        self.diagnostics.push(diag);
    }

    fn record_chunk(&mut self, level: i32, terms: u32) {
        let tokens = std::mem::take(&mut self.current);
        self.chunks.push(Chunk {
            tokens,
            level,
            terms,
        });
    }

    fn open_container(&mut self, token: Token, kind: ContainerKind) {
        let level = self.level();
        let terms = self.top().terms;
        self.current.push(token);
        self.record_chunk(level, terms);
        self.levels.push(LevelRecord::open(kind));
        if self.level() > self.max_level {
            self.max_level = self.level();
        }
    }

    /// Pop the innermost level. The closer token lands at the end of the
    /// inner chunk so the reducer's triple merge keeps source order.
    fn close_container(&mut self, token: Token, kind: ContainerKind) -> bool {
        let offset = token.offset;
        let width = token.text.len();
        if self.level() < 0 {
            self.report(
                FrontErrorKind::Structural,
                &format!("Unmatched '{}' with no open container", token.text),
                offset,
                width,
            );
            return false;
        }
        let top_kind = self.top().kind;
        if top_kind != Some(kind) {
            let expected = top_kind.map(ContainerKind::name).unwrap_or("?");
            self.report(
                FrontErrorKind::Structural,
                &format!(
                    "Mismatched '{}'; innermost open container is '{expected}'",
                    token.text
                ),
                offset,
                width,
            );
            return false;
        }
        if self.top().resolving && self.top().required > 0 {
            self.report(
                FrontErrorKind::Arity,
                "Missing right-hand terms before container close",
                offset,
                width,
            );
            return false;
        }
        let level = self.level();
        let terms = self.top().terms;
        self.current.push(token);
        self.record_chunk(level, terms);
        self.levels.pop();
        true
    }

    fn handle_comma(&mut self, token: Token) -> bool {
        let offset = token.offset;
        let record = self.top();
        if record.resolving {
            if record.required == 0 {
                self.report(FrontErrorKind::Arity, "Unexpected extra term", offset, 1);
                return false;
            }
            record.required -= 1;
        } else {
            record.terms += 1;
            if record.kind == Some(ContainerKind::Bracket) && record.terms > 1 {
                self.report(
                    FrontErrorKind::Arity,
                    "Too many comma-separated terms inside '[ ]'",
                    offset,
                    1,
                );
                return false;
            }
        }
        self.current.push(token);
        true
    }

    fn handle_terminator(&mut self, token: Token) -> bool {
        let offset = token.offset;
        if self.level() > -1 {
            self.report(
                FrontErrorKind::Structural,
                "Statement terminator inside an open container",
                offset,
                1,
            );
            return false;
        }
        let bottom = self.top();
        if bottom.resolving && bottom.required > 0 {
            self.report(
                FrontErrorKind::Arity,
                "Missing right-hand terms before statement end",
                offset,
                1,
            );
            return false;
        }
        self.current.push(token);
        self.finish_statement();
        true
    }

    fn finish_statement(&mut self) {
        // Keep the chunk sequence ending at level -1 so the reducer always
        // has a right neighbor for the deepest chunk.
        let terms = self.top().terms;
        if !self.current.is_empty() || self.chunks.last().map(|c| c.level) != Some(-1) {
            self.record_chunk(-1, terms);
        }
        let chunks = std::mem::take(&mut self.chunks);
        self.statements.push(Statement {
            chunks,
            max_level: self.max_level,
            first_line: self.stmt_first_line,
            last_line: self.line_no,
            text: self.ctx.clone(),
        });
        self.max_level = -1;
        self.levels.truncate(1);
        self.levels[0] = LevelRecord::bottom();
    }

    /// Whether the pending statement can stand as written at a line end.
    fn complete_at_line_end(&self) -> bool {
        if self.level() > -1 || self.in_block_comment {
            return false;
        }
        let bottom = &self.levels[0];
        if bottom.resolving && bottom.required > 0 {
            return false;
        }
        let last = self
            .chunks
            .iter()
            .flat_map(|c| c.tokens.iter())
            .chain(self.current.iter())
            .filter(|t| t.is_semantic())
            .last();
        match last {
            Some(token) => !awaits_operand(token),
            None => true,
        }
    }

    fn process_line(&mut self, line: &str) -> LineStep {
        let base = if self.has_pending() || self.in_block_comment {
            self.ctx.push(' ');
            self.ctx.len()
        } else {
            self.ctx = line.to_string();
            0
        };
        if base != 0 {
            self.ctx.push_str(line);
        }

        let tokens = match expand_aliases(tokenize(line), self.session) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.report(
                    FrontErrorKind::Expansion,
                    &err.message,
                    base + err.offset,
                    err.len.max(1),
                );
                return LineStep::Abort;
            }
        };

        for token in tokens {
            let token = token.shifted(base);
            if self.in_block_comment {
                if token.text == "*/" {
                    self.in_block_comment = false;
                }
                continue;
            }
            if !token.is_semantic() {
                self.current.push(token);
                continue;
            }
            if self.stmt_first_line == 0 || !self.has_pending() {
                self.stmt_first_line = self.line_no;
            }

            let in_string = matches!(
                self.top().kind,
                Some(ContainerKind::Str) | Some(ContainerKind::FormatStr)
            );
            if in_string {
                if !self.string_token(token) {
                    return LineStep::Abort;
                }
                continue;
            }

            let text = token.text.clone();
            let ok = match text.as_str() {
                "//" => break,
                "/*" => {
                    self.in_block_comment = true;
                    true
                }
                "(" => {
                    self.open_container(token, ContainerKind::Paren);
                    true
                }
                "[" => {
                    self.open_container(token, ContainerKind::Bracket);
                    true
                }
                "\"" => {
                    self.open_container(token, ContainerKind::Str);
                    true
                }
                "$\"" => {
                    self.open_container(token, ContainerKind::FormatStr);
                    true
                }
                "{" => {
                    self.report(
                        FrontErrorKind::Structural,
                        "'{' is only allowed inside a format string",
                        token.offset,
                        1,
                    );
                    false
                }
                ")" => self.close_container(token, ContainerKind::Paren),
                "]" => self.close_container(token, ContainerKind::Bracket),
                "}" => self.close_container(token, ContainerKind::Brace),
                "," => self.handle_comma(token),
                ";" => self.handle_terminator(token),
                text if ASSIGN_OPERATORS.contains(&text) => {
                    let record = self.top();
                    if !record.resolving {
                        record.resolving = true;
                        record.required = record.terms;
                    }
                    self.current.push(token);
                    true
                }
                _ => {
                    self.current.push(token);
                    true
                }
            };
            if !ok {
                return LineStep::Abort;
            }
        }

        if !self.has_pending() {
            if self.statements.is_empty() || self.in_block_comment {
                return LineStep::Continue;
            }
            return LineStep::CleanStop;
        }
        if self.complete_at_line_end() {
            self.finish_statement();
            return LineStep::CleanStop;
        }
        LineStep::Continue
    }

    /// Inside a plain or format string only the closing quote, and for
    /// format strings an interpolation brace, are structural.
    fn string_token(&mut self, token: Token) -> bool {
        let kind = match self.top().kind {
            Some(kind) => kind,
            None => return true,
        };
        let text = token.text.clone();
        match (kind, text.as_str()) {
            (ContainerKind::Str, "\"") => self.close_container(token, ContainerKind::Str),
            (ContainerKind::FormatStr, "\"") => {
                self.close_container(token, ContainerKind::FormatStr)
            }
            (ContainerKind::FormatStr, "{") => {
                self.open_container(token, ContainerKind::Brace);
                true
            }
            _ => {
                self.current.push(token);
                true
            }
        }
    }
}

fn awaits_operand(token: &Token) -> bool {
    if token.class == TokenClass::Operator {
        // A close of a block comment does not dangle.
        return token.text != "*/";
    }
    matches!(
        token.text.as_str(),
        "," | "=" | "+" | "-" | "*" | "/" | "%" | "&" | "|" | "^" | "<" | ">" | "!" | "~" | "?"
            | ":" | "."
    )
}

/// Fetch statements starting at `lines[start]`. Stops at the first clean
/// line boundary after at least one statement, on a structural/arity error
/// (`Malformed`), or when input runs out mid-statement (`Unterminated`).
pub fn fetch_statements(
    session: &Session,
    lines: &[String],
    start: usize,
    file: Option<&str>,
) -> FetchResult {
    let mut fetcher = Fetcher::new(session, file);
    let mut next_line = lines.len();

    for (idx, line) in lines.iter().enumerate().skip(start) {
        fetcher.line_no = (idx + 1) as u32;
        match fetcher.process_line(line) {
            LineStep::Continue => {}
            LineStep::CleanStop => {
                return FetchResult {
                    statements: fetcher.statements,
                    outcome: FetchOutcome::Ok,
                    next_line: idx + 1,
                    diagnostics: fetcher.diagnostics,
                };
            }
            LineStep::Abort => {
                return FetchResult {
                    statements: fetcher.statements,
                    outcome: FetchOutcome::Malformed,
                    next_line: idx + 1,
                    diagnostics: fetcher.diagnostics,
                };
            }
        }
        next_line = idx + 1;
    }

    if fetcher.has_pending() {
        let line = fetcher.stmt_first_line;
        let marker = fetcher
            .chunks
            .iter()
            .flat_map(|c| c.tokens.iter())
            .chain(fetcher.current.iter())
            .filter(|t| t.is_semantic())
            .last()
            .map(|t| (t.offset + 1, t.text.len()));
        let diag = Diagnostic::new(
            line,
            Severity::Error,
            FrontError::new(
                FrontErrorKind::Continuation,
                "Unterminated statement at end of input",
                None,
            ),
        )
        .with_file(file.map(str::to_string))
        .with_source(Some(fetcher.ctx.clone()))
        .with_column(marker.map(|(column, _)| column))
        .with_width(marker.map(|(_, width)| width));
        fetcher.diagnostics.push(diag);
        return FetchResult {
            statements: fetcher.statements,
            outcome: FetchOutcome::Unterminated,
            next_line,
            diagnostics: fetcher.diagnostics,
        };
    }

    FetchResult {
        statements: fetcher.statements,
        outcome: FetchOutcome::Ok,
        next_line,
        diagnostics: fetcher.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::{fetch_statements, FetchOutcome};
    use crate::core::scope::Session;

    fn lines(source: &[&str]) -> Vec<String> {
        source.iter().map(|s| s.to_string()).collect()
    }

    fn fetch(source: &[&str]) -> super::FetchResult {
        let session = Session::default();
        fetch_statements(&session, &lines(source), 0, Some("test.asm"))
    }

    #[test]
    fn simple_statement_is_one_chunk() {
        let result = fetch(&["lda #5;"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 1);
        let stmt = &result.statements[0];
        assert_eq!(stmt.max_level, -1);
        assert_eq!(stmt.chunks.len(), 1);
        assert_eq!(stmt.chunks[0].level, -1);
    }

    #[test]
    fn nested_containers_produce_tagged_chunks() {
        let result = fetch(&["sta (base), y;"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        let stmt = &result.statements[0];
        assert_eq!(stmt.max_level, 0);
        let levels: Vec<i32> = stmt.chunks.iter().map(|c| c.level).collect();
        assert_eq!(levels, vec![-1, 0, -1]);
    }

    #[test]
    fn mismatched_closer_is_malformed() {
        let result = fetch(&["(1, 2];"]);
        assert_eq!(result.outcome, FetchOutcome::Malformed);
        assert_eq!(result.diagnostics.len(), 1);
        // Column points at the ']'.
        assert_eq!(result.diagnostics[0].format_with_context(None, false)
            .lines()
            .count(), 3);
    }

    #[test]
    fn unmatched_closer_is_malformed() {
        let result = fetch(&["1 + 2);"]);
        assert_eq!(result.outcome, FetchOutcome::Malformed);
    }

    #[test]
    fn matched_assignment_arity_passes() {
        let result = fetch(&["a, b = 1, 2;"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn short_assignment_arity_fails() {
        let result = fetch(&["a, b = 1;"]);
        assert_eq!(result.outcome, FetchOutcome::Malformed);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn extra_right_hand_term_fails() {
        let result = fetch(&["a, b = 1, 2, 3;"]);
        assert_eq!(result.outcome, FetchOutcome::Malformed);
    }

    #[test]
    fn statement_spans_two_lines() {
        let result = fetch(&["lda (base,", "x);"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 1);
        let stmt = &result.statements[0];
        assert_eq!(stmt.first_line, 1);
        assert_eq!(stmt.last_line, 2);
        assert_eq!(stmt.text, "lda (base, x);");
    }

    #[test]
    fn open_container_at_eof_is_unterminated() {
        let result = fetch(&["lda (base"]);
        assert_eq!(result.outcome, FetchOutcome::Unterminated);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].line(), 1);
    }

    #[test]
    fn unterminated_diagnostic_marks_the_whole_last_token() {
        let result = fetch(&["lda (base"]);
        assert_eq!(result.outcome, FetchOutcome::Unterminated);
        let rendered = result.diagnostics[0].format_with_context(None, true);
        assert!(rendered.contains("\x1b[31mbase\x1b[0m"));
    }

    #[test]
    fn trailing_operator_continues_to_next_line() {
        let result = fetch(&["a = 1 +", "2;"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 1);
        assert_eq!(result.statements[0].last_line, 2);
    }

    #[test]
    fn terminator_inside_container_is_structural() {
        let result = fetch(&["(1; 2);"]);
        assert_eq!(result.outcome, FetchOutcome::Malformed);
    }

    #[test]
    fn brace_outside_format_string_is_structural() {
        let result = fetch(&["a = {1};"]);
        assert_eq!(result.outcome, FetchOutcome::Malformed);
    }

    #[test]
    fn brace_inside_format_string_opens_a_level() {
        let result = fetch(&["msg = $\"value {a + 1} end\";"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        let stmt = &result.statements[0];
        assert_eq!(stmt.max_level, 1);
    }

    #[test]
    fn plain_string_ignores_structural_characters() {
        let result = fetch(&["msg = \"keep (, [ and ; inside\";"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 1);
        assert_eq!(result.statements[0].max_level, 0);
    }

    #[test]
    fn second_comma_in_brackets_fails() {
        let result = fetch(&["lda base[x, y, z];"]);
        assert_eq!(result.outcome, FetchOutcome::Malformed);
    }

    #[test]
    fn one_comma_in_brackets_is_allowed() {
        let result = fetch(&["lda base[x, y];"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
    }

    #[test]
    fn multiple_statements_on_one_line() {
        let result = fetch(&["a = 1; b = 2;"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 2);
    }

    #[test]
    fn line_comment_hides_the_rest_of_the_line() {
        let result = fetch(&["a = 1; // b = ("]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 1);
    }

    #[test]
    fn block_comment_spans_lines() {
        let result = fetch(&["a = /* open (", "still ) comment */ 1;"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 1);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let result = fetch(&["", "   ", "nop;"]);
        assert_eq!(result.outcome, FetchOutcome::Ok);
        assert_eq!(result.statements.len(), 1);
        assert_eq!(result.statements[0].first_line, 3);
    }

    #[test]
    fn fetch_reports_next_unconsumed_line() {
        let session = Session::default();
        let src = lines(&["a = 1;", "b = 2;"]);
        let result = fetch_statements(&session, &src, 0, None);
        assert_eq!(result.next_line, 1);
        let result = fetch_statements(&session, &src, result.next_line, None);
        assert_eq!(result.next_line, 2);
        assert_eq!(result.statements.len(), 1);
    }
}
