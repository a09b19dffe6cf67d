// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Assembler front-end driver.
//!
//! Ties the per-line stages together: read the source, bootstrap the
//! session, then fetch and reduce statements until the input is exhausted.

pub mod cli;

use std::fs;
use std::path::Path;

use clap::Parser;
use serde_json::json;

use crate::core::error::{FrontError, FrontErrorKind, RunError, RunReport};
use crate::core::hierarchy::reduce;
use crate::core::scope::{Session, ROOT_SCOPE};
use crate::core::structurer::{fetch_statements, FetchOutcome, Statement};
use crate::core::value::{Access, Entry, Value};

use cli::{input_name_from_path, validate_cli, Cli, CliConfig};

// Re-export public types
pub use crate::core::error::{RunError as FrontRunError, RunReport as FrontRunReport};
pub use cli::VERSION;

/// Run the front end with command-line arguments.
pub fn run() -> Result<Vec<RunReport>, RunError> {
    let cli = Cli::parse();
    let config = validate_cli(&cli)?;

    let mut reports = Vec::new();
    for asm_path in &cli.infiles {
        let report = run_one(&config, asm_path)?;
        reports.push(report);
    }
    Ok(reports)
}

/// Process one input file through fetch and reduce.
pub fn run_one(config: &CliConfig, path: &Path) -> Result<RunReport, RunError> {
    let asm_name = input_name_from_path(path)?;

    let source = fs::read_to_string(path).map_err(|err| {
        RunError::new(
            FrontError::new(FrontErrorKind::Io, &err.to_string(), Some(&asm_name)),
            Vec::new(),
            Vec::new(),
        )
    })?;
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    if lines.iter().all(|line| line.trim().is_empty()) {
        return Err(RunError::new(
            FrontError::new(
                FrontErrorKind::NothingToDo,
                "Nothing to do: input file is empty",
                Some(&asm_name),
            ),
            Vec::new(),
            lines,
        ));
    }

    let mut session = Session::new(config.max_alias_depth);
    session.bind(
        ROOT_SCOPE,
        "lang",
        Entry::constant(Value::Text(config.lang.clone()), Access::Public),
    );

    let mut statements = Vec::new();
    let mut diagnostics = Vec::new();
    let mut pos = 0;
    while pos < lines.len() {
        let mut result = fetch_statements(&session, &lines, pos, Some(&asm_name));
        diagnostics.append(&mut result.diagnostics);
        statements.extend(result.statements);
        match result.outcome {
            FetchOutcome::Ok => {}
            FetchOutcome::Malformed => {
                return Err(RunError::new(
                    FrontError::new(
                        FrontErrorKind::Structural,
                        "Malformed statement",
                        Some(&asm_name),
                    ),
                    diagnostics,
                    lines,
                ));
            }
            FetchOutcome::Unterminated => {
                return Err(RunError::new(
                    FrontError::new(
                        FrontErrorKind::Continuation,
                        "Unterminated statement",
                        Some(&asm_name),
                    ),
                    diagnostics,
                    lines,
                ));
            }
        }
        if result.next_line <= pos {
            break;
        }
        pos = result.next_line;
    }

    if config.dump_statements {
        for (idx, statement) in statements.iter().enumerate() {
            println!("{}", format_statement(idx, statement));
        }
    }
    if config.dump_json {
        println!("{}", statements_json(&asm_name, &statements));
    }

    // Reduce every statement so downstream evaluation gets flat token runs.
    for statement in &statements {
        let _flat = reduce(statement);
    }

    Ok(RunReport::new(diagnostics, lines))
}

/// One-line-per-chunk listing of a statement's structure.
pub fn format_statement(idx: usize, statement: &Statement) -> String {
    let mut out = format!(
        "stmt {:>3} | lines {}-{} | depth {:>2} | {}\n",
        idx + 1,
        statement.first_line,
        statement.last_line,
        statement.max_level,
        statement.text
    );
    for chunk in &statement.chunks {
        let text: String = chunk.tokens.iter().map(|t| t.text.as_str()).collect();
        out.push_str(&format!(
            "  level {:>2} terms {} | {}\n",
            chunk.level, chunk.terms, text
        ));
    }
    out.pop();
    out
}

/// JSON dump of the structured statements.
pub fn statements_json(file: &str, statements: &[Statement]) -> String {
    let dump = json!({
        "file": file,
        "statements": statements
            .iter()
            .map(|s| {
                json!({
                    "first_line": s.first_line,
                    "last_line": s.last_line,
                    "max_level": s.max_level,
                    "text": s.text,
                    "chunks": s.chunks
                        .iter()
                        .map(|c| {
                            json!({
                                "level": c.level,
                                "terms": c.terms,
                                "tokens": c.tokens
                                    .iter()
                                    .filter(|t| t.is_semantic())
                                    .map(|t| json!({
                                        "text": t.text,
                                        "offset": t.offset,
                                    }))
                                    .collect::<Vec<_>>(),
                            })
                        })
                        .collect::<Vec<_>>(),
                })
            })
            .collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&dump).unwrap_or_default()
}

#[cfg(test)]
mod tests;
