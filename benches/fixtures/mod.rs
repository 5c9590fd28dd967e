// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::fmt::Write as _;

use fqltour::model::tour::Tour;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    Medium,
    LargeLongCode,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::LargeLongCode => "large_long_code",
        }
    }

    fn steps(self) -> usize {
        match self {
            Self::Small => 5,
            Self::Medium => 40,
            Self::LargeLongCode => 200,
        }
    }

    fn journals_per_step(self) -> usize {
        match self {
            Self::Small | Self::Medium => 1,
            Self::LargeLongCode => 12,
        }
    }
}

/// One journal entry touching two accounts, with dimensions and a comment.
pub fn journal(idx: usize) -> String {
    let day = idx % 28 + 1;
    let amount = 100 + idx * 7;
    format!(
        "-- entry {idx}\nCREATE JOURNAL\n    2023-01-{day:02}, {amount}.50, 'Entry {idx}'\nFOR Customer='C{idx}', Region='EU'\nDEBIT @acct_{idx}, CREDIT @bank;\n"
    )
}

/// FQL with `journals` journal entries, used for tokenizer benches.
pub fn fql_block(journals: usize) -> String {
    (0..journals).map(journal).collect()
}

/// A tour document exercising frontmatter, narrative continuations, presentation directives,
/// assertions and multi-line code.
pub fn tour_source(case: Case) -> String {
    let mut out = String::from(
        "---\ntitle: \"Bench tour\"\ndifficulty: intermediate\ntags: [bench, fixtures]\nversion: 3\n---\n",
    );
    for step in 0..case.steps() {
        let _ = writeln!(out, "--@ step: Step {step}");
        let _ = writeln!(out, "--@ text: This is **step {step}** with `inline` code.");
        let _ = writeln!(out, "--@   - a bullet about @acct_{step}");
        let _ = writeln!(out, "--@ reveal: line-by-line");
        let _ = writeln!(out, "--@ highlight: JOURNAL, @acct_{step}");
        let _ = writeln!(out, "--@ assert: Balance{step} = {step}");
        let _ = writeln!(out, "--@ show: Balance{step}");
        for journal_idx in 0..case.journals_per_step() {
            out.push_str(&journal(step * 100 + journal_idx));
        }
        let _ = writeln!(out, "GET balance(@acct_{step}, 2023-12-31) AS Balance{step}\n");
    }
    out
}

pub fn checksum_tour(tour: &Tour) -> u64 {
    tour.steps().iter().fold(tour.len() as u64, |acc, step| {
        acc.wrapping_mul(31)
            .wrapping_add(step.code().len() as u64)
            .wrapping_add(step.asserts().len() as u64)
            .wrapping_add(step.highlight().len() as u64)
    })
}
