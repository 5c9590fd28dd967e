// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tour markup parsing.
//!
//! A tour file is an optional `---` fenced frontmatter block followed by FQL source in which lines
//! starting with `--@` are directives for the step being built:
//!
//! ```text
//! ---
//! title: Interest accrual
//! tags: [journals, rates]
//! ---
//! --@ step: Open the books
//! --@ text: Every ledger starts with accounts.
//! --@   Continuation lines are indented by two or more spaces.
//! CREATE ACCOUNT @bank ASSET;
//! ```
//!
//! Parsing never fails. Anything the parser has to guess about is reported as a
//! [`TourDiagnostic`] by [`parse_tour_with_diagnostics`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::tour::{AssertOperator, Tour, TourAssert, TourStep};

mod frontmatter;

pub use frontmatter::export_frontmatter;

pub const DIRECTIVE_PREFIX: &str = "--@";

/// A non-fatal authoring problem found while parsing a tour.
///
/// `line_no` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourDiagnostic {
    UnclosedFrontmatter,
    InvalidFrontmatterLine { line_no: usize, line: String },
    InvalidFrontmatterValue { line_no: usize, key: String, value: String },
    UnknownDirective { line_no: usize, key: String },
    InvalidDirectiveValue { line_no: usize, key: String, value: String },
    MalformedAssert { line_no: usize, value: String },
    OrphanContinuation { line_no: usize },
}

impl fmt::Display for TourDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclosedFrontmatter => {
                f.write_str("frontmatter has no closing '---'; the whole file is treated as steps")
            }
            Self::InvalidFrontmatterLine { line_no, line } => {
                write!(f, "ignored frontmatter line {line_no}: {line} (expected 'key: value')")
            }
            Self::InvalidFrontmatterValue { line_no, key, value } => {
                write!(f, "ignored invalid {key} on line {line_no}: {value}")
            }
            Self::UnknownDirective { line_no, key } => {
                write!(f, "ignored unknown directive on line {line_no}: {key}")
            }
            Self::InvalidDirectiveValue { line_no, key, value } => {
                write!(f, "invalid {key} value on line {line_no}: {value} (default kept)")
            }
            Self::MalformedAssert { line_no, value } => write!(
                f,
                "assert on line {line_no} is neither '<name> contains <text>' nor '<name> = <text>': {value}"
            ),
            Self::OrphanContinuation { line_no } => write!(
                f,
                "continuation on line {line_no} has no preceding text/note/caption/expect directive"
            ),
        }
    }
}

/// Parses tour markup into a [`Tour`], degrading gracefully on malformed input.
pub fn parse_tour(source: &str) -> Tour {
    parse_tour_with_diagnostics(source).0
}

pub fn parse_tour_with_diagnostics(source: &str) -> (Tour, Vec<TourDiagnostic>) {
    let lines: Vec<&str> = source.lines().collect();
    let mut diagnostics = Vec::new();
    let (meta, body_start) = frontmatter::split_frontmatter(&lines, &mut diagnostics);

    let mut steps = Vec::new();
    let mut current: Option<StepBuilder> = None;

    for (idx, line) in lines.iter().enumerate().skip(body_start) {
        let line_no = idx + 1;
        match classify_line(line) {
            LineKind::Content(content) => {
                if current.is_none() && content.trim().is_empty() {
                    continue;
                }
                current.get_or_insert_with(StepBuilder::implicit).push_code(content);
            }
            LineKind::Spacer => match current.as_mut() {
                Some(builder) => builder.continue_multiline("", line_no, &mut diagnostics),
                None => diagnostics.push(TourDiagnostic::OrphanContinuation { line_no }),
            },
            LineKind::Continuation(value) => match current.as_mut() {
                Some(builder) => builder.continue_multiline(value, line_no, &mut diagnostics),
                None => diagnostics.push(TourDiagnostic::OrphanContinuation { line_no }),
            },
            LineKind::Directive { key, value } => {
                let Some(directive) = Directive::from_key(key) else {
                    diagnostics
                        .push(TourDiagnostic::UnknownDirective { line_no, key: key.to_owned() });
                    continue;
                };
                if directive == Directive::Step {
                    if let Some(builder) = current.take() {
                        steps.push(builder.finish());
                    }
                    current = Some(StepBuilder::new(value));
                    continue;
                }
                current.get_or_insert_with(StepBuilder::implicit).apply(
                    directive,
                    key,
                    value,
                    line_no,
                    &mut diagnostics,
                );
            }
            LineKind::Unrecognized(text) => {
                diagnostics.push(TourDiagnostic::UnknownDirective { line_no, key: text.to_owned() });
            }
        }
    }

    if let Some(builder) = current {
        steps.push(builder.finish());
    }

    (Tour::new(meta, steps), diagnostics)
}

/// Returns only the runnable FQL of a tour: frontmatter and directive lines removed, trimmed and
/// newline-terminated.
pub fn extract_fql(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let mut ignored = Vec::new();
    let (_, body_start) = frontmatter::split_frontmatter(&lines, &mut ignored);

    let code = lines[body_start..]
        .iter()
        .filter(|line| matches!(classify_line(line), LineKind::Content(_)))
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    let trimmed = code.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{trimmed}\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Content(&'a str),
    Spacer,
    Continuation(&'a str),
    Directive { key: &'a str, value: &'a str },
    Unrecognized(&'a str),
}

fn classify_line(line: &str) -> LineKind<'_> {
    let Some(rest) = line.trim_start().strip_prefix(DIRECTIVE_PREFIX) else {
        return LineKind::Content(line);
    };

    if rest.trim().is_empty() {
        return LineKind::Spacer;
    }
    if rest.starts_with("  ") {
        return LineKind::Continuation(rest.trim());
    }

    let rest = rest.trim();
    if let Some((key, value)) = rest.split_once(':') {
        let key = key.trim();
        if is_directive_key(key) {
            return LineKind::Directive { key, value: value.trim() };
        }
    }
    if is_directive_key(rest) {
        return LineKind::Directive { key: rest, value: "" };
    }

    LineKind::Unrecognized(rest)
}

fn is_directive_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|ch| ch.is_ascii_alphabetic())
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Step,
    Text,
    Note,
    Caption,
    Expect,
    Highlight,
    Focus,
    Reveal,
    Run,
    Pause,
    Wait,
    Assert,
    Show,
    HideOutput,
    Layout,
}

impl Directive {
    fn from_key(key: &str) -> Option<Self> {
        let directive = match key.to_ascii_lowercase().as_str() {
            "step" => Self::Step,
            "text" => Self::Text,
            "note" => Self::Note,
            "caption" => Self::Caption,
            "expect" => Self::Expect,
            "highlight" => Self::Highlight,
            "focus" => Self::Focus,
            "reveal" => Self::Reveal,
            "run" => Self::Run,
            "pause" => Self::Pause,
            "wait" => Self::Wait,
            "assert" => Self::Assert,
            "show" => Self::Show,
            "hideoutput" | "hide-output" | "hide_output" => Self::HideOutput,
            "layout" => Self::Layout,
            _ => return None,
        };
        Some(directive)
    }

    fn multiline_field(self) -> Option<MultilineField> {
        match self {
            Self::Text => Some(MultilineField::Text),
            Self::Note => Some(MultilineField::Note),
            Self::Caption => Some(MultilineField::Caption),
            Self::Expect => Some(MultilineField::Expect),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultilineField {
    Text,
    Note,
    Caption,
    Expect,
}

#[derive(Debug)]
struct StepBuilder {
    step: TourStep,
    code_lines: Vec<String>,
    last_multiline: Option<MultilineField>,
}

impl StepBuilder {
    fn new(title: &str) -> Self {
        Self { step: TourStep::new(title), code_lines: Vec::new(), last_multiline: None }
    }

    fn implicit() -> Self {
        Self::new("")
    }

    fn push_code(&mut self, line: &str) {
        self.code_lines.push(line.to_owned());
    }

    fn slot(&mut self, field: MultilineField) -> &mut Option<String> {
        match field {
            MultilineField::Text => &mut self.step.text,
            MultilineField::Note => &mut self.step.note,
            MultilineField::Caption => &mut self.step.caption,
            MultilineField::Expect => &mut self.step.expect,
        }
    }

    fn append_multiline(&mut self, field: MultilineField, value: &str) {
        let slot = self.slot(field);
        match slot {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(value);
            }
            None => *slot = Some(value.to_owned()),
        }
        self.last_multiline = Some(field);
    }

    fn continue_multiline(
        &mut self,
        value: &str,
        line_no: usize,
        diagnostics: &mut Vec<TourDiagnostic>,
    ) {
        match self.last_multiline {
            Some(field) => self.append_multiline(field, value),
            None => diagnostics.push(TourDiagnostic::OrphanContinuation { line_no }),
        }
    }

    fn apply(
        &mut self,
        directive: Directive,
        key: &str,
        value: &str,
        line_no: usize,
        diagnostics: &mut Vec<TourDiagnostic>,
    ) {
        if let Some(field) = directive.multiline_field() {
            self.append_multiline(field, value);
            return;
        }

        let mut invalid = || {
            diagnostics.push(TourDiagnostic::InvalidDirectiveValue {
                line_no,
                key: key.to_owned(),
                value: value.to_owned(),
            })
        };

        match directive {
            Directive::Highlight => self.step.highlight = split_list(value),
            Directive::Show => self.step.show = split_list(value),
            Directive::Focus => match value.parse() {
                Ok(range) => self.step.focus = Some(range),
                Err(_) => invalid(),
            },
            Directive::Reveal => match value.parse() {
                Ok(reveal) => self.step.reveal = reveal,
                Err(_) => invalid(),
            },
            Directive::Run => match value.parse() {
                Ok(run) => self.step.run = run,
                Err(_) => invalid(),
            },
            Directive::Layout => match value.parse() {
                Ok(layout) => self.step.layout = layout,
                Err(_) => invalid(),
            },
            Directive::Pause => match value.parse::<f64>() {
                Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => {
                    self.step.pause = Some(seconds)
                }
                _ => invalid(),
            },
            Directive::Wait => match parse_flag(value) {
                Some(flag) => self.step.wait = flag,
                None => invalid(),
            },
            Directive::HideOutput => match parse_flag(value) {
                Some(flag) => self.step.hide_output = flag,
                None => invalid(),
            },
            Directive::Assert => {
                let assert = parse_assert(value).unwrap_or_else(|| {
                    diagnostics.push(TourDiagnostic::MalformedAssert {
                        line_no,
                        value: value.to_owned(),
                    });
                    TourAssert::new(value, AssertOperator::Equals, "")
                });
                self.step.asserts.push(assert);
            }
            Directive::Step
            | Directive::Text
            | Directive::Note
            | Directive::Caption
            | Directive::Expect => {}
        }
    }

    fn finish(self) -> TourStep {
        let Self { mut step, code_lines, .. } = self;

        let start = code_lines.iter().position(|line| !line.trim().is_empty());
        let end = code_lines.iter().rposition(|line| !line.trim().is_empty());
        step.code = match (start, end) {
            (Some(start), Some(end)) => code_lines[start..=end].join("\n").trim().to_owned(),
            _ => String::new(),
        };
        step
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn assert_contains_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\S+)\s+contains\s+(.+)$").expect("valid assert regex"))
}

fn assert_equals_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$").expect("valid assert regex")
    })
}

fn parse_assert(value: &str) -> Option<TourAssert> {
    let value = value.trim();
    if let Some(caps) = assert_contains_regex().captures(value) {
        return Some(TourAssert::new(&caps[1], AssertOperator::Contains, caps[2].trim()));
    }
    if let Some(caps) = assert_equals_regex().captures(value) {
        return Some(TourAssert::new(caps[1].trim(), AssertOperator::Equals, caps[2].trim()));
    }
    None
}

#[cfg(test)]
mod tests;
