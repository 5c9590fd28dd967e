// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{
    classify_line, export_frontmatter, extract_fql, parse_tour, parse_tour_with_diagnostics,
    LineKind, TourDiagnostic,
};
use crate::model::tour::{
    AssertOperator, Difficulty, FocusRange, RevealMode, RunMode, StepLayout, TourAssert, TourMeta,
};

#[test]
fn parses_frontmatter_fields() {
    let tour = parse_tour(
        r#"---
title: "Interest: the basics"
description: 'Accrue interest on a loan book'
author: Ada
difficulty: intermediate
tags: [loans, "rates", accrual]
version: 3
# comments are skipped
unknown: whatever
---
--@ step: One
GET account_count() AS count
"#,
    );

    let meta = tour.meta();
    assert_eq!(meta.title.as_deref(), Some("Interest: the basics"));
    assert_eq!(meta.description.as_deref(), Some("Accrue interest on a loan book"));
    assert_eq!(meta.author.as_deref(), Some("Ada"));
    assert_eq!(meta.difficulty, Some(Difficulty::Intermediate));
    assert_eq!(meta.tags, vec!["loans".to_owned(), "rates".to_owned(), "accrual".to_owned()]);
    assert_eq!(meta.version, Some(3));
    assert_eq!(tour.len(), 1);
}

#[test]
fn frontmatter_export_round_trips_known_fields() {
    let meta = TourMeta {
        title: Some("Ledger \"101\": accounts".to_owned()),
        description: Some("  leading spaces survive".to_owned()),
        author: Some("O'Brien".to_owned()),
        difficulty: Some(Difficulty::Advanced),
        tags: vec!["fx".to_owned(), "multi word".to_owned()],
        version: Some(-2),
    };

    let exported = export_frontmatter(&meta);
    let tour = parse_tour(&exported);
    assert_eq!(tour.meta(), &meta);
    assert!(tour.is_empty());
}

#[test]
fn empty_meta_exports_bare_fences() {
    assert_eq!(export_frontmatter(&TourMeta::default()), "---\n---\n");
}

#[test]
fn invalid_frontmatter_values_are_reported_and_skipped() {
    let (tour, diagnostics) = parse_tour_with_diagnostics(
        "---\ndifficulty: expert\nversion: two\nnot a pair\n---\nGET 1\n",
    );

    assert_eq!(tour.meta().difficulty, None);
    assert_eq!(tour.meta().version, None);
    assert_eq!(
        diagnostics,
        vec![
            TourDiagnostic::InvalidFrontmatterValue {
                line_no: 2,
                key: "difficulty".to_owned(),
                value: "expert".to_owned(),
            },
            TourDiagnostic::InvalidFrontmatterValue {
                line_no: 3,
                key: "version".to_owned(),
                value: "two".to_owned(),
            },
            TourDiagnostic::InvalidFrontmatterLine { line_no: 4, line: "not a pair".to_owned() },
        ]
    );
}

#[test]
fn unclosed_frontmatter_treats_everything_as_steps() {
    let (tour, diagnostics) =
        parse_tour_with_diagnostics("---\ntitle: Lost\n--@ step: S1\nGET 1\n");

    assert!(tour.meta().is_empty());
    assert_eq!(diagnostics, vec![TourDiagnostic::UnclosedFrontmatter]);
    assert_eq!(tour.len(), 2);
    assert_eq!(tour.steps()[0].title(), "");
    assert_eq!(tour.steps()[0].code(), "---\ntitle: Lost");
    assert_eq!(tour.steps()[1].title(), "S1");
    assert_eq!(tour.steps()[1].code(), "GET 1");
}

#[test]
fn splits_steps_in_source_order_and_trims_blank_edges() {
    let tour = parse_tour(
        "--@ step: S1\n\nCREATE ACCOUNT @bank ASSET;\n\nCREATE ACCOUNT @equity EQUITY;\n\n\n--@ step: S2\nGET balance(@bank, 2023-01-02) AS BankBalance\n\n",
    );

    assert_eq!(tour.len(), 2);
    assert_eq!(tour.steps()[0].title(), "S1");
    assert_eq!(
        tour.steps()[0].code(),
        "CREATE ACCOUNT @bank ASSET;\n\nCREATE ACCOUNT @equity EQUITY;"
    );
    assert_eq!(tour.steps()[1].title(), "S2");
    assert_eq!(tour.steps()[1].code(), "GET balance(@bank, 2023-01-02) AS BankBalance");
}

#[test]
fn continuation_and_spacer_lines_join_text() {
    let tour = parse_tour(
        "--@ step: Intro\n--@ text: First line\n--@   second line\n--@\n--@   new paragraph\n",
    );

    assert_eq!(
        tour.steps()[0].text(),
        Some("First line\nsecond line\n\nnew paragraph")
    );
}

#[test]
fn repeated_multiline_directives_accumulate_in_order() {
    let tour = parse_tour(
        "--@ step: S\n--@ note: a\n--@ caption: c\n--@   c2\n--@ note: b\n--@   b2\n--@ expect: one\n--@ expect: two\n",
    );
    let step = &tour.steps()[0];

    assert_eq!(step.note(), Some("a\nb\nb2"));
    assert_eq!(step.caption(), Some("c\nc2"));
    assert_eq!(step.expect(), Some("one\ntwo"));
    assert_eq!(step.text(), None);
}

#[rstest]
#[case("result contains interest_earned", "result", AssertOperator::Contains, "interest_earned")]
#[case("Total = 1506.34", "Total", AssertOperator::Equals, "1506.34")]
#[case("  pnl   =   -12.5  ", "pnl", AssertOperator::Equals, "-12.5")]
#[case("tb contains a = b", "tb", AssertOperator::Contains, "a = b")]
fn parses_assert_forms(
    #[case] value: &str,
    #[case] variable: &str,
    #[case] operator: AssertOperator,
    #[case] expected: &str,
) {
    let tour = parse_tour(&format!("--@ step: S\n--@ assert: {value}\nGET 1\n"));
    assert_eq!(tour.steps()[0].asserts(), &[TourAssert::new(variable, operator, expected)]);
}

#[rstest]
#[case("x <= 5")]
#[case("x<=5")]
#[case("Bank Balance = 10")]
#[case("= 10")]
fn assert_with_non_identifier_variable_is_diagnosed(#[case] value: &str) {
    let (tour, diagnostics) =
        parse_tour_with_diagnostics(&format!("--@ step: S\n--@ assert: {value}\nGET 1\n"));

    assert_eq!(
        tour.steps()[0].asserts(),
        &[TourAssert::new(value.trim(), AssertOperator::Equals, "")]
    );
    assert_eq!(
        diagnostics,
        vec![TourDiagnostic::MalformedAssert { line_no: 2, value: value.to_owned() }]
    );
}

#[test]
fn step_code_and_extracted_script_trim_alike() {
    let source = "--@ step: S\n    GET 1\n    GET 2\n";
    let tour = parse_tour(source);

    assert_eq!(tour.steps()[0].code(), "GET 1\n    GET 2");
    assert_eq!(extract_fql(source), format!("{}\n", tour.steps()[0].code()));
}

#[test]
fn malformed_assert_degrades_to_variable_only() {
    let (tour, diagnostics) =
        parse_tour_with_diagnostics("--@ step: S\n--@ assert: BankBalance\n--@ assert: x = 1\n");

    assert_eq!(
        tour.steps()[0].asserts(),
        &[
            TourAssert::new("BankBalance", AssertOperator::Equals, ""),
            TourAssert::new("x", AssertOperator::Equals, "1"),
        ]
    );
    assert_eq!(
        diagnostics,
        vec![TourDiagnostic::MalformedAssert { line_no: 2, value: "BankBalance".to_owned() }]
    );
}

#[test]
fn code_before_first_step_opens_one_implicit_step() {
    let tour = parse_tour("\n\nCREATE ACCOUNT @bank ASSET;\nCREATE ACCOUNT @cash ASSET;\n");

    assert_eq!(tour.len(), 1);
    assert_eq!(tour.steps()[0].title(), "");
    assert_eq!(tour.steps()[0].code(), "CREATE ACCOUNT @bank ASSET;\nCREATE ACCOUNT @cash ASSET;");
}

#[test]
fn directive_before_first_step_opens_implicit_step() {
    let tour = parse_tour("--@ text: Welcome\n--@ step: S1\nGET 1\n");

    assert_eq!(tour.len(), 2);
    assert_eq!(tour.steps()[0].title(), "");
    assert_eq!(tour.steps()[0].text(), Some("Welcome"));
    assert!(!tour.steps()[0].has_code());
    assert_eq!(tour.steps()[1].title(), "S1");
}

#[test]
fn unknown_directives_are_ignored() {
    let (tour, diagnostics) = parse_tour_with_diagnostics(
        "--@ future-directive: x\n--@ step: S\n--@ future-directive: y\nGET 1\n",
    );

    assert_eq!(tour.len(), 1);
    let step = &tour.steps()[0];
    assert_eq!(step.title(), "S");
    assert_eq!(step.code(), "GET 1");
    assert!(step.text().is_none());
    assert_eq!(
        diagnostics,
        vec![
            TourDiagnostic::UnknownDirective { line_no: 1, key: "future-directive".to_owned() },
            TourDiagnostic::UnknownDirective { line_no: 3, key: "future-directive".to_owned() },
        ]
    );
}

#[test]
fn presentation_directives_are_single_shot() {
    let tour = parse_tour(
        "--@ step: S\n--@ reveal: typewriter\n--@ reveal: line-by-line\n--@ run: click\n--@ layout: split\n--@ focus: 2-3\n--@ pause: 1.5\n--@ highlight: @bank, , balance\n--@ show: BankBalance, Stmt\n--@ wait\n--@ hideOutput\nGET 1\n",
    );
    let step = &tour.steps()[0];

    assert_eq!(step.reveal(), RevealMode::LineByLine);
    assert_eq!(step.run(), RunMode::Click);
    assert_eq!(step.layout(), StepLayout::Split);
    assert_eq!(step.focus(), FocusRange::new(2, 3));
    assert_eq!(step.pause(), Some(1.5));
    assert_eq!(step.highlight(), &["@bank".to_owned(), "balance".to_owned()]);
    assert_eq!(step.show(), &["BankBalance".to_owned(), "Stmt".to_owned()]);
    assert!(step.wait());
    assert!(step.hide_output());
}

#[test]
fn invalid_enum_values_keep_defaults() {
    let (tour, diagnostics) = parse_tour_with_diagnostics(
        "--@ step: S\n--@ run: sometimes\n--@ pause: -1\n--@ wait: maybe\nGET 1\n",
    );
    let step = &tour.steps()[0];

    assert_eq!(step.run(), RunMode::Auto);
    assert_eq!(step.pause(), None);
    assert!(!step.wait());
    assert_eq!(diagnostics.len(), 3);
}

#[test]
fn fql_comments_stay_code() {
    let tour = parse_tour("--@ step: S\n-- opening balances\nGET balance(@bank, 2023-01-01)\n");
    assert_eq!(tour.steps()[0].code(), "-- opening balances\nGET balance(@bank, 2023-01-01)");
}

#[test]
fn orphan_continuation_is_reported() {
    let (tour, diagnostics) = parse_tour_with_diagnostics("--@ step: S\n--@   dangling\nGET 1\n");

    assert!(tour.steps()[0].text().is_none());
    assert_eq!(diagnostics, vec![TourDiagnostic::OrphanContinuation { line_no: 2 }]);
}

#[rstest]
#[case("GET 1", LineKind::Content("GET 1"))]
#[case("--@", LineKind::Spacer)]
#[case("--@   ", LineKind::Spacer)]
#[case("--@   more", LineKind::Continuation("more"))]
#[case("--@ step: Two", LineKind::Directive { key: "step", value: "Two" })]
#[case("--@ wait", LineKind::Directive { key: "wait", value: "" })]
#[case("--@ what is this?", LineKind::Unrecognized("what is this?"))]
#[case("-- plain comment", LineKind::Content("-- plain comment"))]
fn classifies_lines(#[case] line: &str, #[case] expected: LineKind<'_>) {
    assert_eq!(classify_line(line), expected);
}

#[test]
fn extract_fql_keeps_only_code() {
    let source = "---\ntitle: T\n---\n--@ step: S1\n--@ text: hello\n--@   more\nCREATE ACCOUNT @bank ASSET;\n--@ step: S2\n--@ wait\nGET balance(@bank, 2023-01-02) AS b\n";

    let fql = extract_fql(source);
    assert_eq!(fql, "CREATE ACCOUNT @bank ASSET;\nGET balance(@bank, 2023-01-02) AS b\n");
    assert!(!fql.contains("---"));
    assert!(!fql.contains("--@"));
}

#[test]
fn extract_fql_of_directives_only_is_empty() {
    assert_eq!(extract_fql("--@ step: S\n--@ text: nothing to run\n"), "");
}

#[test]
fn handles_crlf_sources() {
    let tour = parse_tour("---\r\ntitle: Win\r\n---\r\n--@ step: S\r\nGET 1\r\n");
    assert_eq!(tour.meta().title.as_deref(), Some("Win"));
    assert_eq!(tour.steps()[0].code(), "GET 1");
}
