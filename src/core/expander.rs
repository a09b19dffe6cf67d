// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Alias expander: fixed-point substitution of text aliases.
//!
//! Identifier tokens whose text is bound in the visible scope chain to a
//! constant text value are replaced by the re-tokenized replacement text.
//! Passes repeat until none substitutes. A pass ceiling turns circular
//! substitutions into an error instead of a hang.

use crate::core::scope::Session;
use crate::core::tokenizer::{tokenize, Token, TokenClass};
use crate::core::value::{Access, Value};

/// Circular or too-deep alias substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandError {
    pub message: String,
    pub alias: String,
    /// Offset of the still-substituting token within its line context.
    pub offset: usize,
    /// Byte length of that token, for range markers in diagnostics.
    pub len: usize,
}

/// Expand text aliases in `tokens` to a fixed point. Lookups run with
/// public privilege; private bindings are never substituted.
pub fn expand_aliases(mut tokens: Vec<Token>, session: &Session) -> Result<Vec<Token>, ExpandError> {
    for _ in 0..session.max_alias_depth {
        let mut substituted = false;
        let mut out = Vec::with_capacity(tokens.len());

        for token in tokens {
            if token.class != TokenClass::IdentifierLike {
                out.push(token);
                continue;
            }
            let entry = match session.lookup(&token.text, Access::Public, None) {
                Ok(entry) if entry.is_text_substitution() => entry,
                _ => {
                    out.push(token);
                    continue;
                }
            };
            let replacement = match &entry.value {
                Value::Text(text) => text,
                _ => {
                    out.push(token);
                    continue;
                }
            };
            substituted = true;
            for piece in tokenize(replacement) {
                out.push(piece.shifted(token.offset));
            }
        }

        if !substituted {
            return Ok(out);
        }
        tokens = out;
    }

    // Still substituting after the ceiling: some alias chain never settles.
    let (alias, offset) = tokens
        .iter()
        .find(|t| {
            t.class == TokenClass::IdentifierLike
                && matches!(
                    session.lookup(&t.text, Access::Public, None),
                    Ok(entry) if entry.is_text_substitution()
                )
        })
        .map(|t| (t.text.clone(), t.offset))
        .unwrap_or_default();
    let len = alias.len();
    Err(ExpandError {
        message: format!("Circular alias substitution involving '{alias}'"),
        alias,
        offset,
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::expand_aliases;
    use crate::core::scope::{Session, ROOT_SCOPE};
    use crate::core::tokenizer::tokenize;
    use crate::core::value::{Access, Entry, Value};

    fn text_alias(session: &mut Session, alias: &str, replacement: &str) {
        session.bind(
            ROOT_SCOPE,
            alias,
            Entry::constant(Value::Text(replacement.to_string()), Access::Public),
        );
    }

    fn expand_to_text(session: &Session, line: &str) -> String {
        expand_aliases(tokenize(line), session)
            .expect("expansion")
            .iter()
            .map(|t| t.text.as_str())
            .collect()
    }

    #[test]
    fn no_bindings_is_a_no_op() {
        let session = Session::default();
        assert_eq!(expand_to_text(&session, "lda foo, q"), "lda foo, q");
    }

    #[test]
    fn single_alias_substitutes_once() {
        let mut session = Session::default();
        text_alias(&mut session, "zero_page", "$00");
        assert_eq!(expand_to_text(&session, "lda zero_page;"), "lda $00;");
    }

    #[test]
    fn chained_aliases_reach_a_fixed_point() {
        let mut session = Session::default();
        text_alias(&mut session, "outer", "inner + 1");
        text_alias(&mut session, "inner", "$10");
        assert_eq!(expand_to_text(&session, "lda outer;"), "lda $10 + 1;");
    }

    #[test]
    fn non_text_entries_are_not_substituted() {
        let mut session = Session::default();
        session.bind(
            ROOT_SCOPE,
            "count",
            Entry::constant(Value::Int(3), Access::Public),
        );
        assert_eq!(expand_to_text(&session, "lda count;"), "lda count;");
    }

    #[test]
    fn variable_text_entries_are_not_substituted() {
        let mut session = Session::default();
        session.bind(
            ROOT_SCOPE,
            "name",
            Entry::variable(Value::Text("other".to_string()), Access::Public),
        );
        assert_eq!(expand_to_text(&session, "lda name;"), "lda name;");
    }

    #[test]
    fn self_referential_alias_errors() {
        let mut session = Session::default();
        text_alias(&mut session, "loop", "loop + 1");
        let err = expand_aliases(tokenize("lda loop;"), &session).unwrap_err();
        assert_eq!(err.alias, "loop");
    }

    #[test]
    fn circular_alias_error_spans_the_whole_token() {
        let mut session = Session::default();
        text_alias(&mut session, "looper", "looper");
        let err = expand_aliases(tokenize("lda looper;"), &session).unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.len, 6);
    }

    #[test]
    fn private_bindings_are_not_substituted() {
        let mut session = Session::default();
        session.bind(
            ROOT_SCOPE,
            "hidden",
            Entry::constant(Value::Text("$44".to_string()), Access::Private),
        );
        assert_eq!(expand_to_text(&session, "lda hidden;"), "lda hidden;");
    }

    #[test]
    fn mutually_circular_aliases_error() {
        let mut session = Session::default();
        text_alias(&mut session, "ping", "pong");
        text_alias(&mut session, "pong", "ping");
        assert!(expand_aliases(tokenize("ping;"), &session).is_err());
    }

    #[test]
    fn substituted_tokens_keep_the_source_offset() {
        let mut session = Session::default();
        text_alias(&mut session, "base", "addr + 2");
        let tokens = expand_aliases(tokenize("lda base"), &session).expect("expansion");
        let addr = tokens.iter().find(|t| t.text == "addr").expect("addr token");
        assert_eq!(addr.offset, 4);
    }
}
