// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

/// A parsed guided lesson: frontmatter metadata plus an ordered sequence of steps.
///
/// Steps keep source order and are never mutated once the parser has finalized them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tour {
    meta: TourMeta,
    steps: Vec<TourStep>,
}

impl Tour {
    pub fn new(meta: TourMeta, steps: Vec<TourStep>) -> Self {
        Self { meta, steps }
    }

    pub fn meta(&self) -> &TourMeta {
        &self.meta
    }

    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&TourStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseTourValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ParseTourValueError::new("difficulty", s)),
        }
    }
}

/// Frontmatter of a tour document. All fields are optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TourMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
    pub version: Option<i64>,
}

impl TourMeta {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertOperator {
    Equals,
    Contains,
}

impl AssertOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Contains => "contains",
        }
    }
}

impl fmt::Display for AssertOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared check of a named query result against an expected string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TourAssert {
    variable: String,
    operator: AssertOperator,
    expected: String,
}

impl TourAssert {
    pub fn new(
        variable: impl Into<String>,
        operator: AssertOperator,
        expected: impl Into<String>,
    ) -> Self {
        Self { variable: variable.into(), operator, expected: expected.into() }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn operator(&self) -> AssertOperator {
        self.operator
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl fmt::Display for TourAssert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable, self.operator, self.expected)
    }
}

/// Pacing policy for progressively displaying a step's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RevealMode {
    #[default]
    Instant,
    Typewriter,
    LineByLine,
}

impl FromStr for RevealMode {
    type Err = ParseTourValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instant" => Ok(Self::Instant),
            "typewriter" => Ok(Self::Typewriter),
            "line-by-line" | "line_by_line" | "lines" => Ok(Self::LineByLine),
            _ => Err(ParseTourValueError::new("reveal", s)),
        }
    }
}

/// Whether a step's code executes automatically, only on explicit user action, or never.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunMode {
    #[default]
    Auto,
    Click,
    Skip,
}

impl FromStr for RunMode {
    type Err = ParseTourValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "click" => Ok(Self::Click),
            "skip" => Ok(Self::Skip),
            _ => Err(ParseTourValueError::new("run", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StepLayout {
    #[default]
    Stacked,
    Split,
    FullCode,
}

impl FromStr for StepLayout {
    type Err = ParseTourValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stacked" => Ok(Self::Stacked),
            "split" => Ok(Self::Split),
            "full-code" | "full_code" | "fullcode" => Ok(Self::FullCode),
            _ => Err(ParseTourValueError::new("layout", s)),
        }
    }
}

/// Inclusive 1-based line range of a step's code to keep in focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusRange {
    start: usize,
    end: usize,
}

impl FocusRange {
    pub fn new(start: usize, end: usize) -> Option<Self> {
        if start == 0 || end < start {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Whether the 0-based `line_idx` falls inside the range.
    pub fn contains_line(&self, line_idx: usize) -> bool {
        let line_no = line_idx + 1;
        line_no >= self.start && line_no <= self.end
    }
}

impl FromStr for FocusRange {
    type Err = ParseTourValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTourValueError::new("focus", s);
        let trimmed = s.trim();
        let (start, end) = match trimmed.split_once('-') {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (trimmed, trimmed),
        };
        let start = start.parse::<usize>().map_err(|_| err())?;
        let end = end.parse::<usize>().map_err(|_| err())?;
        Self::new(start, end).ok_or_else(err)
    }
}

impl fmt::Display for FocusRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// One unit of narrative, optional executable code, and presentation directives.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TourStep {
    pub(crate) title: String,
    pub(crate) text: Option<String>,
    pub(crate) note: Option<String>,
    pub(crate) caption: Option<String>,
    pub(crate) expect: Option<String>,
    pub(crate) code: String,
    pub(crate) highlight: Vec<String>,
    pub(crate) focus: Option<FocusRange>,
    pub(crate) reveal: RevealMode,
    pub(crate) run: RunMode,
    pub(crate) pause: Option<f64>,
    pub(crate) wait: bool,
    pub(crate) asserts: Vec<TourAssert>,
    pub(crate) show: Vec<String>,
    pub(crate) hide_output: bool,
    pub(crate) layout: StepLayout,
}

impl TourStep {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn expect(&self) -> Option<&str> {
        self.expect.as_deref()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn highlight(&self) -> &[String] {
        &self.highlight
    }

    pub fn focus(&self) -> Option<FocusRange> {
        self.focus
    }

    pub fn reveal(&self) -> RevealMode {
        self.reveal
    }

    pub fn run(&self) -> RunMode {
        self.run
    }

    pub fn pause(&self) -> Option<f64> {
        self.pause
    }

    pub fn wait(&self) -> bool {
        self.wait
    }

    pub fn asserts(&self) -> &[TourAssert] {
        &self.asserts
    }

    pub fn show(&self) -> &[String] {
        &self.show
    }

    pub fn hide_output(&self) -> bool {
        self.hide_output
    }

    pub fn layout(&self) -> StepLayout {
        self.layout
    }

    pub fn has_narrative(&self) -> bool {
        [&self.text, &self.note, &self.caption]
            .iter()
            .any(|value| value.as_deref().is_some_and(|value| !value.trim().is_empty()))
    }

    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }

    pub fn code_lines(&self) -> Vec<&str> {
        if self.code.is_empty() {
            return Vec::new();
        }
        self.code.split('\n').collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTourValueError {
    field: &'static str,
    value: String,
}

impl ParseTourValueError {
    fn new(field: &'static str, value: &str) -> Self {
        Self { field, value: value.to_owned() }
    }
}

impl fmt::Display for ParseTourValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} value: {:?}", self.field, self.value)
    }
}

impl std::error::Error for ParseTourValueError {}
