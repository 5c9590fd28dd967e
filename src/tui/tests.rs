// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use rstest::rstest;

use super::theme::TuiTheme;
use super::{
    draw, footer_help_line, header_line, help_lines, osc52_sequence, playback_action_for_key, step_counter_label,
    tour_summary, view_title, App,
};
use crate::exec::{ExecutionError, ExecutionOutput, ScriptedExecutor};
use crate::format::tour::{parse_tour, parse_tour_with_diagnostics};
use crate::model::tour::Tour;
use crate::playback::{Phase, PlaybackAction};

const TWO_STEPS: &str = "\
---
title: Demo
---
--@ step: Balance
--@ assert: Bank = 100
GET balance(@bank) AS Bank;

--@ step: Lend
--@ run: click
CREATE JOURNAL 2024-01-01, 50, 'loan';
";

fn app_with<'t>(tour: &'t Tour, executor: Arc<ScriptedExecutor>) -> App<'t> {
    App::new(tour, executor, None, TuiTheme::default()).expect("app")
}

fn line_to_string(line: &ratatui::text::Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect::<String>()
}

fn screen(app: &mut App<'_>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(90, 24)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(usize::from(buffer.area.width))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn settle(app: &mut App<'_>) {
    app.advance(Duration::ZERO);
    app.pump_completions(Duration::from_secs(1));
}

#[rstest]
#[case(KeyCode::Right, Phase::Result, Some(PlaybackAction::Next))]
#[case(KeyCode::Char(' '), Phase::Narrative, Some(PlaybackAction::Next))]
#[case(KeyCode::Enter, Phase::Done, Some(PlaybackAction::Next))]
#[case(KeyCode::Char('l'), Phase::Result, Some(PlaybackAction::Next))]
#[case(KeyCode::Left, Phase::Result, Some(PlaybackAction::Back))]
#[case(KeyCode::Char('h'), Phase::Result, Some(PlaybackAction::Back))]
#[case(KeyCode::Char('R'), Phase::Result, Some(PlaybackAction::Restart))]
#[case(KeyCode::Home, Phase::Executing, Some(PlaybackAction::Restart))]
#[case(KeyCode::Char('r'), Phase::CodeReveal, Some(PlaybackAction::Run))]
#[case(KeyCode::Char('r'), Phase::Result, Some(PlaybackAction::Retry))]
#[case(KeyCode::Char('s'), Phase::Narrative, Some(PlaybackAction::Skip))]
#[case(KeyCode::Char('x'), Phase::Result, None)]
#[case(KeyCode::Char('y'), Phase::Result, None)]
fn keys_map_to_playback_actions(
    #[case] code: KeyCode,
    #[case] phase: Phase,
    #[case] expected: Option<PlaybackAction>,
) {
    assert_eq!(playback_action_for_key(code, phase), expected);
}

#[test]
fn view_title_includes_key_and_tail() {
    assert_eq!(view_title("Code", Some('y'), Some("2/5")), "─[y]─ Code 2/5 ");
    assert_eq!(view_title("Narrative", None, Some("  ")), "─ Narrative ");
}

#[rstest]
#[case(0, 0, "[0/0]")]
#[case(0, 3, "[1/3]")]
#[case(4, 12, "[05/12]")]
fn step_counter_pads_to_total_width(#[case] index: usize, #[case] total: usize, #[case] expected: &str) {
    assert_eq!(step_counter_label(index, total), expected);
}

#[test]
fn osc52_sequence_wraps_base64_payload() {
    assert_eq!(osc52_sequence("GET 1"), "\x1b]52;c;R0VUIDE=\x1b\\");
}

#[test]
fn auto_step_executes_through_the_runtime() {
    let tour = parse_tour(TWO_STEPS);
    let executor = Arc::new(ScriptedExecutor::new().with_response(
        "balance(@bank)",
        Ok(ExecutionOutput::new(vec!["Bank: 100".to_owned()])),
    ));
    let mut app = app_with(&tour, Arc::clone(&executor));

    assert_eq!(app.session.phase(), Phase::Executing);
    settle(&mut app);

    assert_eq!(app.in_flight, 0);
    assert_eq!(app.session.phase(), Phase::Result);
    assert!(app.session.current_result().is_some_and(|result| result.all_assertions_passed()));
    assert_eq!(executor.calls(), vec!["GET balance(@bank) AS Bank;".to_owned()]);
}

#[test]
fn click_step_waits_for_run_key() {
    let tour = parse_tour(TWO_STEPS);
    let executor = Arc::new(ScriptedExecutor::new());
    let mut app = app_with(&tour, Arc::clone(&executor));
    settle(&mut app);

    assert!(!app.handle_key_code(KeyCode::Right));
    settle(&mut app);
    assert_eq!(app.session.index(), 1);
    assert_eq!(app.session.phase(), Phase::CodeReveal);
    assert_eq!(executor.calls().len(), 1);

    app.handle_key_code(KeyCode::Char('r'));
    assert_eq!(app.in_flight, 1);
    settle(&mut app);
    assert_eq!(app.session.phase(), Phase::Result);
    assert_eq!(executor.calls().len(), 2);
}

#[test]
fn superseded_execution_is_ignored() {
    let tour = parse_tour(TWO_STEPS);
    let executor = Arc::new(ScriptedExecutor::new().with_latency(Duration::from_millis(20)));
    let mut app = app_with(&tour, executor);
    app.advance(Duration::ZERO);
    assert_eq!(app.in_flight, 1);

    app.handle_key_code(KeyCode::Char('s'));
    assert_eq!(app.session.index(), 1);
    settle(&mut app);

    assert_eq!(app.in_flight, 0);
    assert!(app.session.result(0).is_none());
}

#[test]
fn failed_execution_is_shown_on_screen() {
    let tour = parse_tour(TWO_STEPS);
    let executor = Arc::new(
        ScriptedExecutor::new()
            .with_response("balance", Err(ExecutionError::transport("connection refused"))),
    );
    let mut app = app_with(&tour, executor);
    settle(&mut app);

    let text = screen(&mut app);
    assert!(text.contains("backend unreachable: connection refused"));
    assert!(text.contains("✗ Bank = 100"));
}

#[test]
fn screen_shows_header_and_highlighted_code() {
    let tour = parse_tour(TWO_STEPS);
    let mut app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    settle(&mut app);

    let text = screen(&mut app);
    assert!(text.contains("Demo [1/2] Balance"));
    assert!(text.contains("1 │ GET balance(@bank) AS Bank;"));
    assert!(text.contains("─[r]─ Result"));
}

#[test]
fn finishing_the_tour_shows_summary() {
    let tour = parse_tour(TWO_STEPS);
    let mut app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    settle(&mut app);
    app.handle_key_code(KeyCode::Right);
    app.handle_key_code(KeyCode::Char('s'));

    assert!(app.session.is_finished());
    let summary = tour_summary(&app.session);
    assert_eq!(summary.executed, 1);
    assert_eq!(summary.assertions, 1);
    assert!(screen(&mut app).contains("Tour complete"));
}

#[test]
fn help_captures_keys_until_closed() {
    let tour = parse_tour(TWO_STEPS);
    let mut app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    settle(&mut app);

    app.handle_key_code(KeyCode::Char('?'));
    assert!(app.show_help);
    app.handle_key_code(KeyCode::Char('s'));
    assert_eq!(app.session.index(), 0);
    assert!(screen(&mut app).contains("Restart the tour"));

    assert!(!app.handle_key_code(KeyCode::Esc));
    assert!(!app.show_help);
    assert!(app.handle_key_code(KeyCode::Esc));
}

#[test]
fn quit_keys() {
    let tour = parse_tour(TWO_STEPS);
    let mut app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    assert!(app.handle_key_code(KeyCode::Char('q')));

    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
}

#[test]
fn yank_without_code_reports_toast() {
    let tour = parse_tour("--@ step: Intro\n--@ text: Just prose.\n");
    let mut app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    app.handle_key_code(KeyCode::Char('y'));
    assert_eq!(app.toast.as_ref().map(|toast| toast.message.as_str()), Some("No code to yank"));
}

#[test]
fn narrative_step_advances_on_the_clock() {
    let tour = parse_tour("--@ step: Intro\n--@ text: Hello *there*.\nGET 1;\n");
    let mut app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    assert_eq!(app.session.phase(), Phase::Narrative);
    assert!(screen(&mut app).contains("Hello there."));

    app.advance(Duration::from_millis(800));
    assert_eq!(app.session.phase(), Phase::Executing);
    settle(&mut app);
    assert_eq!(app.session.phase(), Phase::Result);
}

#[test]
fn poll_interval_tracks_pending_timer() {
    let tour = parse_tour("--@ step: Intro\n--@ text: Hello.\n--@ pause: 0.1\nGET 1;\n");
    let app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    assert_eq!(app.poll_interval(), Duration::from_millis(100));
}

#[test]
fn footer_names_run_or_retry() {
    let tour = parse_tour(TWO_STEPS);
    let mut app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    settle(&mut app);
    let footer = line_to_string(&footer_help_line(&app, ""));
    assert!(footer.contains("Retry:r"));
    assert!(!footer.contains("Run:r"));

    app.handle_key_code(KeyCode::Right);
    let footer = line_to_string(&footer_help_line(&app, " | saved"));
    assert!(footer.contains("Run:r"));
    assert!(footer.ends_with(" | saved"));
}

#[test]
fn diagnostics_show_in_header_and_help() {
    let (tour, diagnostics) =
        parse_tour_with_diagnostics("--@ step: S\n--@ assert: x <= 5\nGET 1;\n");
    let app = App::new(&tour, Arc::new(ScriptedExecutor::new()), None, TuiTheme::default())
        .expect("app")
        .with_diagnostics(&diagnostics);

    assert!(line_to_string(&header_line(&app)).ends_with("1 warning (?)"));
    let help = help_lines(&app).iter().map(line_to_string).collect::<Vec<_>>();
    assert!(help.iter().any(|line| line == "--- Diagnostics ---"));
    assert!(help.iter().any(|line| line.starts_with("assert on line 2")));
}

#[test]
fn header_has_no_warning_without_diagnostics() {
    let tour = parse_tour(TWO_STEPS);
    let app = app_with(&tour, Arc::new(ScriptedExecutor::new()));
    assert!(!line_to_string(&header_line(&app)).contains("warning"));
}
