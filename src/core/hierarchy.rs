// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Hierarchy reducer: collapses a statement's chunk sequence from the
//! deepest nesting level outward until a single top-level token run
//! remains, preserving source order throughout.

use crate::core::structurer::{Chunk, Statement};
use crate::core::tokenizer::Token;

/// Reduce a statement to its flattened token sequence.
///
/// Repeatedly finds a chunk at the current maximum depth and merges it with
/// its immediate neighbors into one chunk a level up, inheriting the left
/// neighbor's term count. Expression evaluation consumes the result.
pub fn reduce(statement: &Statement) -> Vec<Token> {
    let mut chunks: Vec<Chunk> = statement.chunks.clone();
    let mut depth = statement.max_level;

    while depth > -1 {
        let found = chunks.iter().position(|c| c.level == depth);
        let idx = match found {
            Some(idx) => idx,
            None => {
                depth -= 1;
                continue;
            }
        };

        let start = idx.saturating_sub(1);
        let end = (idx + 1).min(chunks.len() - 1);
        let merged_terms = chunks[start].terms;
        let mut tokens = Vec::new();
        for chunk in &chunks[start..=end] {
            tokens.extend(chunk.tokens.iter().cloned());
        }
        chunks.splice(
            start..=end,
            [Chunk {
                tokens,
                level: depth - 1,
                terms: merged_terms,
            }],
        );
    }

    chunks.into_iter().flat_map(|c| c.tokens).collect()
}
