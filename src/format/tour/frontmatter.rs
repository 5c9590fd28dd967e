// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use super::TourDiagnostic;
use crate::model::tour::TourMeta;

const FENCE: &str = "---";

fn is_fence(line: &str) -> bool {
    line.trim_end() == FENCE
}

/// Splits the leading frontmatter block off `lines`.
///
/// Returns the parsed metadata and the index of the first body line. Without a closing fence the
/// whole input is body and the metadata stays empty.
pub(super) fn split_frontmatter(
    lines: &[&str],
    diagnostics: &mut Vec<TourDiagnostic>,
) -> (TourMeta, usize) {
    if !lines.first().is_some_and(|line| is_fence(line)) {
        return (TourMeta::default(), 0);
    }

    let Some(close_idx) = lines.iter().skip(1).position(|line| is_fence(line)).map(|pos| pos + 1)
    else {
        diagnostics.push(TourDiagnostic::UnclosedFrontmatter);
        return (TourMeta::default(), 0);
    };

    let mut meta = TourMeta::default();
    for (idx, line) in lines.iter().enumerate().take(close_idx).skip(1) {
        parse_meta_line(&mut meta, line, idx + 1, diagnostics);
    }

    (meta, close_idx + 1)
}

fn parse_meta_line(
    meta: &mut TourMeta,
    line: &str,
    line_no: usize,
    diagnostics: &mut Vec<TourDiagnostic>,
) {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return;
    }

    let Some((key, value)) = trimmed.split_once(':') else {
        diagnostics
            .push(TourDiagnostic::InvalidFrontmatterLine { line_no, line: trimmed.to_owned() });
        return;
    };
    let key = key.trim().to_ascii_lowercase();
    let value = value.trim();

    let mut invalid = || {
        diagnostics.push(TourDiagnostic::InvalidFrontmatterValue {
            line_no,
            key: key.clone(),
            value: value.to_owned(),
        })
    };

    match key.as_str() {
        "title" => meta.title = scalar(value),
        "description" => meta.description = scalar(value),
        "author" => meta.author = scalar(value),
        "difficulty" => match unquote(value).parse() {
            Ok(difficulty) => meta.difficulty = Some(difficulty),
            Err(_) => invalid(),
        },
        "version" => match unquote(value).trim().parse::<i64>() {
            Ok(version) => meta.version = Some(version),
            Err(_) => invalid(),
        },
        "tags" => meta.tags = parse_list(value),
        _ => {}
    }
}

fn scalar(value: &str) -> Option<String> {
    let value = unquote(value);
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn parse_list(value: &str) -> Vec<String> {
    let inner = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(value);
    inner
        .split(',')
        .map(|item| unquote(item.trim()).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Serializes the known frontmatter fields back into a fenced block.
///
/// Scalars are always double-quoted, so any single-line value survives a parse round trip. Tags
/// must not contain `,` or `]`.
pub fn export_frontmatter(meta: &TourMeta) -> String {
    let mut out = String::from("---\n");
    let fields = [
        ("title", meta.title.as_deref()),
        ("description", meta.description.as_deref()),
        ("author", meta.author.as_deref()),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "{key}: \"{value}\"");
        }
    }
    if let Some(difficulty) = meta.difficulty {
        let _ = writeln!(out, "difficulty: {difficulty}");
    }
    if !meta.tags.is_empty() {
        let _ = writeln!(out, "tags: [{}]", meta.tags.join(", "));
    }
    if let Some(version) = meta.version {
        let _ = writeln!(out, "version: {version}");
    }
    out.push_str("---\n");
    out
}
