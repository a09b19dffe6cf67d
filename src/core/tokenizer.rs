// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Tokenizer for assembly source lines.
//
// Splits one physical line into tokens that cover the input exactly:
// concatenating the token texts in order reproduces the line. Whitespace
// is kept as single-character tokens so later stages can do exact column
// arithmetic when pointing at errors.

/// Coarse classification assigned at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Whitespace,
    Operator,
    LiteralLead,
    IdentifierLike,
    Separator,
}

/// One lexical token: exact source text, byte offset within the line
/// context it was scanned from, and its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub offset: usize,
    pub class: TokenClass,
}

impl Token {
    pub fn new(text: &str, offset: usize, class: TokenClass) -> Self {
        Self {
            text: text.to_string(),
            offset,
            class,
        }
    }

    /// Shift the token's offset by `base`, used when a line is appended to
    /// a multi-line statement context.
    pub fn shifted(mut self, base: usize) -> Self {
        self.offset += base;
        self
    }

    /// Whitespace tokens exist only for offset bookkeeping.
    pub fn is_semantic(&self) -> bool {
        self.class != TokenClass::Whitespace
    }
}

// Longest first within each group so the scan stays greedy.
const OPERATORS_3: &[&str] = &["<=>", ">>=", "<<=", "??="];
const OPERATORS_2: &[&str] = &[
    "//", "/*", "*/", "$\"", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=", "<<", ">>", "->", "??", "?.",
];

/// Compound-assignment operators recognized by the statement structurer.
pub const ASSIGN_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "|=", "&=", "^=", "??=", ">>=", "<<=",
];

fn is_separator(c: char) -> bool {
    matches!(
        c,
        '!' | '"'
            | '£'
            | '$'
            | '%'
            | '^'
            | '&'
            | '*'
            | '('
            | ')'
            | '+'
            | '-'
            | '='
            | '['
            | ']'
            | '{'
            | '}'
            | ';'
            | ':'
            | '\''
            | '@'
            | '#'
            | '~'
            | '\\'
            | '|'
            | ','
            | '<'
            | '.'
            | '>'
            | '/'
            | '?'
    )
}

fn match_multi_operator(rest: &str) -> Option<usize> {
    for op in OPERATORS_3 {
        if rest.starts_with(op) {
            return Some(op.len());
        }
    }
    for op in OPERATORS_2 {
        if rest.starts_with(op) {
            return Some(op.len());
        }
    }
    None
}

/// Split one line into tokens. Total over its input: there is no error
/// condition, and empty input yields an empty sequence.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        let c = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };

        if c.is_whitespace() {
            let len = c.len_utf8();
            tokens.push(Token::new(&rest[..len], pos, TokenClass::Whitespace));
            pos += len;
            continue;
        }

        if let Some(len) = match_multi_operator(rest) {
            tokens.push(Token::new(&rest[..len], pos, TokenClass::Operator));
            pos += len;
            continue;
        }

        if is_separator(c) {
            let len = c.len_utf8();
            tokens.push(Token::new(&rest[..len], pos, TokenClass::Separator));
            pos += len;
            continue;
        }

        // Maximal run of characters that are neither whitespace nor a
        // separator forms a single identifier/literal token.
        let mut len = 0;
        for rc in rest.chars() {
            if rc.is_whitespace() || is_separator(rc) {
                break;
            }
            len += rc.len_utf8();
        }
        let text = &rest[..len];
        let class = if text.starts_with(|d: char| d.is_ascii_digit()) {
            TokenClass::LiteralLead
        } else {
            TokenClass::IdentifierLike
        };
        tokens.push(Token::new(text, pos, class));
        pos += len;
    }

    tokens
}
