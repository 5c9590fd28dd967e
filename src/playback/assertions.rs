// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::exec::{ExecutionOutcome, ExecutionOutput};
use crate::model::tour::{AssertOperator, TourAssert, TourStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    assert: TourAssert,
    passed: bool,
}

impl AssertionResult {
    pub fn assert(&self) -> &TourAssert {
        &self.assert
    }

    pub fn passed(&self) -> bool {
        self.passed
    }
}

/// Checks one assertion against the joined result text.
///
/// `contains` is a plain substring test. `=` is lenient: an exact `<variable>: <expected>` line
/// passes, and so does the expected value appearing anywhere in the text.
pub fn assertion_passes(assert: &TourAssert, result_text: &str) -> bool {
    match assert.operator() {
        AssertOperator::Contains => result_text.contains(assert.expected()),
        AssertOperator::Equals => {
            let line = format!("{}: {}", assert.variable(), assert.expected());
            result_text.lines().any(|candidate| candidate.trim() == line)
                || result_text.contains(assert.expected())
        }
    }
}

/// Evaluates every assertion of a step. A failed execution fails them all.
pub fn evaluate_assertions(asserts: &[TourAssert], outcome: &ExecutionOutcome) -> Vec<AssertionResult> {
    let text = outcome.as_ref().ok().map(ExecutionOutput::joined);
    asserts
        .iter()
        .map(|assert| AssertionResult {
            assert: assert.clone(),
            passed: text.as_deref().is_some_and(|text| assertion_passes(assert, text)),
        })
        .collect()
}

/// Result lines a step wants on screen.
///
/// `hide_output` hides everything. Otherwise a non-empty `show` list keeps only lines whose
/// `name:` prefix is listed.
pub fn visible_result_lines<'a>(step: &TourStep, output: &'a ExecutionOutput) -> Vec<&'a str> {
    if step.hide_output() {
        return Vec::new();
    }

    let lines = output.results.iter().flat_map(|block| block.lines());
    if step.show().is_empty() {
        return lines.collect();
    }

    lines
        .filter(|line| {
            line.split_once(':')
                .is_some_and(|(name, _)| step.show().iter().any(|shown| shown == name.trim()))
        })
        .collect()
}
