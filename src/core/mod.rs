// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Target-independent assembler front end.
//!
//! # Components
//!
//! - [`tokenizer`] - Line scanning into atomic tokens
//! - [`expander`] - Fixed-point text alias substitution
//! - [`structurer`] - Multi-line statement fetching with nesting and arity checks
//! - [`hierarchy`] - Chunk reduction to a flat token sequence
//! - [`scope`] - Scope-chain symbol database with visibility control
//! - [`value`] - Assemble-time value and entry types
//! - [`error`] - Error kinds, diagnostics, and run reports

pub mod error;
pub mod expander;
pub mod hierarchy;
pub mod scope;
pub mod structurer;
pub mod tokenizer;
pub mod value;

// Re-exports for convenience
pub use error::{Diagnostic, FrontError, FrontErrorKind, RunError, RunReport, Severity};
pub use expander::{expand_aliases, ExpandError};
pub use hierarchy::reduce;
pub use scope::{LookupError, Session, ROOT_SCOPE};
pub use structurer::{fetch_statements, Chunk, FetchOutcome, FetchResult, Statement};
pub use tokenizer::{tokenize, Token, TokenClass};
pub use value::{Access, Entry, ScopeId, Value};
