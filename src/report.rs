// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Source-context highlighting for diagnostics.

/// ANSI color is used unless the NO_COLOR convention asks otherwise.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Highlight the character at `column` (1-based) in red when color is
/// enabled. A column past the end of the line appends a caret instead.
pub fn highlight_line(line: &str, column: Option<usize>, use_color: bool) -> String {
    let column = match column {
        Some(column) if column > 0 => column,
        _ => return line.to_string(),
    };
    let idx = column - 1;
    if idx >= line.len() {
        if use_color {
            return format!("{line}\x1b[31m^\x1b[0m");
        }
        return format!("{line}^");
    }
    let (head, tail) = line.split_at(idx);
    let ch = tail.chars().next().unwrap_or(' ');
    let rest = &tail[ch.len_utf8()..];
    if use_color {
        format!("{head}\x1b[31m{ch}\x1b[0m{rest}")
    } else {
        format!("{head}{ch}{rest}")
    }
}

/// Highlight a half-open byte range in red. Used for multi-character
/// tokens where a single column would under-mark the problem.
pub fn highlight_range(line: &str, start: usize, end: usize, use_color: bool) -> String {
    if !use_color || start >= end || start >= line.len() {
        return line.to_string();
    }
    let end = end.min(line.len());
    let head = &line[..start];
    let mid = &line[start..end];
    let rest = &line[end..];
    format!("{head}\x1b[31m{mid}\x1b[0m{rest}")
}
