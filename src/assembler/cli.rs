// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::core::error::{FrontError, FrontErrorKind, RunError};

pub const VERSION: &str = "0.1";

const LONG_ABOUT: &str = "6502/NES cross-assembler front end.

Reads assembly source, expands text aliases, and structures it into
semicolon-terminated statements with resolved container nesting. Use
--dump-statements or --dump-json to inspect the structured output.";

#[derive(Parser, Debug)]
#[command(
    name = "famiforge",
    version = VERSION,
    about = "6502/NES cross-assembler front end",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        short = 'i',
        long = "infile",
        value_name = "FILE",
        action = ArgAction::Append,
        long_help = "Input assembly file (repeatable). Files must end with .asm."
    )]
    pub infiles: Vec<PathBuf>,
    #[arg(
        long = "dump-statements",
        action = ArgAction::SetTrue,
        long_help = "Print each structured statement's chunk layout to stdout."
    )]
    pub dump_statements: bool,
    #[arg(
        long = "dump-json",
        action = ArgAction::SetTrue,
        long_help = "Print the structured statements as JSON to stdout."
    )]
    pub dump_json: bool,
    #[arg(
        long = "lang",
        value_name = "CODE",
        default_value = "en",
        long_help = "Language code bound to the built-in 'lang' constant. Defaults to en."
    )]
    pub lang: String,
    #[arg(
        long = "max-alias-depth",
        value_name = "N",
        default_value_t = 64,
        long_help = "Maximum alias expansion passes per line. Defaults to 64."
    )]
    pub max_alias_depth: usize,
}

pub fn input_name_from_path(path: &Path) -> Result<String, RunError> {
    let asm_name = path.to_string_lossy().to_string();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(name) => name,
        None => {
            return Err(RunError::new(
                FrontError::new(FrontErrorKind::Cli, "Invalid input file name", None),
                Vec::new(),
                Vec::new(),
            ))
        }
    };
    if !file_name.ends_with(".asm") {
        return Err(RunError::new(
            FrontError::new(FrontErrorKind::Cli, "Input file must end with .asm", None),
            Vec::new(),
            Vec::new(),
        ));
    }
    Ok(asm_name)
}

/// Validate CLI arguments and return parsed configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, RunError> {
    if cli.infiles.is_empty() {
        return Err(RunError::new(
            FrontError::new(
                FrontErrorKind::Cli,
                "No input files specified. Use -i/--infile",
                None,
            ),
            Vec::new(),
            Vec::new(),
        ));
    }

    if cli.max_alias_depth == 0 {
        return Err(RunError::new(
            FrontError::new(
                FrontErrorKind::Cli,
                "--max-alias-depth must be at least 1",
                None,
            ),
            Vec::new(),
            Vec::new(),
        ));
    }

    Ok(CliConfig {
        dump_statements: cli.dump_statements,
        dump_json: cli.dump_json,
        lang: cli.lang.clone(),
        max_alias_depth: cli.max_alias_depth,
    })
}

/// Validated CLI configuration.
#[derive(Debug)]
pub struct CliConfig {
    pub dump_statements: bool,
    pub dump_json: bool,
    pub lang: String,
    pub max_alias_depth: usize,
}
