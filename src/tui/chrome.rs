// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Title, header, footer, help, and overlay helpers used by TUI rendering.
fn view_title(label: &str, key: Option<char>, tail: Option<&str>) -> String {
    let mut title = match key {
        Some(key) => format!("─[{key}]─ {label}"),
        None => format!("─ {label}"),
    };
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn step_counter_label(index: usize, total: usize) -> String {
    if total == 0 {
        return "[0/0]".to_owned();
    }
    let width = total.to_string().len();
    format!("[{:0width$}/{total}]", (index + 1).min(total))
}

fn header_line(app: &App<'_>) -> Line<'static> {
    let session = &app.session;
    let tour_title = session.tour().meta().title.as_deref().unwrap_or("FQL tour");
    let mut spans = vec![
        Span::styled(truncate_with_ellipsis(tour_title, HEADER_TITLE_MAX), app.theme.title_style()),
        Span::raw(" "),
        Span::styled(
            step_counter_label(session.index(), session.step_count()),
            app.theme.key_style(),
        ),
    ];

    if let Some(step) = session.current_step() {
        if !step.title().is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                truncate_with_ellipsis(step.title(), HEADER_TITLE_MAX),
                app.theme.title_style(),
            ));
        }
    }

    let phase = if session.is_finished() { "finished" } else { session.phase().as_str() };
    spans.push(Span::styled(format!("  ·  {phase}"), app.theme.phase_style()));

    match app.diagnostics.len() {
        0 => {}
        1 => spans.push(Span::styled("  ·  1 warning (?)", app.theme.error_style())),
        count => {
            spans.push(Span::styled(format!("  ·  {count} warnings (?)"), app.theme.error_style()));
        }
    }
    Line::from(spans)
}

fn footer_help_line(app: &App<'_>, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let run_label = if app.session.phase() == Phase::CodeReveal { "RUN" } else { "RETRY" };

    push_footer_entry(&mut spans, app, "NEXT", "→");
    push_footer_entry(&mut spans, app, "BACK", "←");
    push_footer_entry(&mut spans, app, run_label, "r");
    push_footer_entry(&mut spans, app, "SKIP", "s");
    push_footer_entry(&mut spans, app, "YANK", "y");
    push_footer_entry(&mut spans, app, "HELP", "?");
    push_footer_entry(&mut spans, app, "QUIT", "q");

    if let Some(message) = toast_suffix.strip_prefix(" | ") {
        spans.push(Span::styled(" | ".to_owned(), app.theme.muted_style()));
        spans.push(Span::raw(message.to_owned()));
    }

    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, app: &App<'_>, label: &str, key: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), app.theme.muted_style()));
    }
    spans.push(Span::styled(format!("{}:", footer_label_ucfirst(label)), app.theme.muted_style()));
    spans.push(Span::styled(key.to_owned(), app.theme.key_style()));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_brand_line(app: &App<'_>) -> Line<'static> {
    Line::from(Span::styled(FOOTER_BRAND.to_owned(), app.theme.title_style()))
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = 100u16.saturating_sub(height_percent) / 2;
    let horizontal_margin = 100u16.saturating_sub(width_percent) / 2;

    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage(vertical_margin),
        Constraint::Percentage(height_percent),
        Constraint::Percentage(vertical_margin),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage(horizontal_margin),
        Constraint::Percentage(width_percent),
        Constraint::Percentage(horizontal_margin),
    ])
    .areas(middle);
    center
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>key_width$}"), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("→/Space/Enter/l", "Next: finish the reveal, or move to the next step"),
    ("←/h", "Back to the previous step (keeps its result)"),
    ("R/Home", "Restart the tour from the first step"),
    ("r", "Run a click-to-run step, otherwise retry the current step"),
    ("s", "Skip the current step without executing it"),
    ("y", "Yank the step's code to the clipboard (OSC 52)"),
    ("?", "Help (toggle)"),
    ("q/Esc", "Quit"),
];

fn help_lines(app: &App<'_>) -> Vec<Line<'static>> {
    let key_width = HELP_ENTRIES.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    let key_style = app.theme.key_style();

    let mut lines = vec![Line::from(Span::styled("--- Playback ---", app.theme.title_style()))];
    lines.extend(HELP_ENTRIES.iter().map(|(key, desc)| help_kv(key, desc, key_width, key_style)));

    let meta = app.session.tour().meta();
    if !meta.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("--- Tour ---", app.theme.title_style())));
        if let Some(description) = &meta.description {
            lines.push(Line::raw(description.clone()));
        }
        if let Some(author) = &meta.author {
            lines.push(Line::raw(format!("Author: {author}")));
        }
        if let Some(difficulty) = meta.difficulty {
            lines.push(Line::raw(format!("Difficulty: {difficulty}")));
        }
        if !meta.tags.is_empty() {
            lines.push(Line::raw(format!("Tags: {}", meta.tags.join(", "))));
        }
    }

    if !app.diagnostics.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("--- Diagnostics ---", app.theme.title_style())));
        lines.extend(
            app.diagnostics
                .iter()
                .map(|diagnostic| Line::from(Span::styled(diagnostic.clone(), app.theme.error_style()))),
        );
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "j/k, ↑/↓ scroll · Esc/? close",
        app.theme.muted_style(),
    )));
    lines
}

fn render_help(frame: &mut Frame<'_>, app: &mut App<'_>, area: Rect) {
    let area = centered_rect(76, 70, area);
    frame.render_widget(Clear, area);

    let lines = help_lines(app);
    let max_scroll = (lines.len() as u16).saturating_sub(area.height.saturating_sub(2));
    app.help_scroll = app.help_scroll.min(max_scroll);

    let paragraph = Paragraph::new(Text::from(lines))
        .style(app.theme.base_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_style(true))
                .title(view_title("Help", Some('?'), None)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Executed steps and assertion tallies for the end-of-tour overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TourSummary {
    executed: usize,
    failed: usize,
    assertions: usize,
    assertions_passed: usize,
}

fn tour_summary(session: &PlaybackSession<'_>) -> TourSummary {
    let mut summary = TourSummary::default();
    for result in (0..session.step_count()).filter_map(|idx| session.result(idx)) {
        summary.executed += 1;
        if !result.is_success() {
            summary.failed += 1;
        }
        summary.assertions += result.assertions().len();
        summary.assertions_passed +=
            result.assertions().iter().filter(|assertion| assertion.passed()).count();
    }
    summary
}

fn finished_lines(app: &App<'_>) -> Vec<Line<'static>> {
    let summary = tour_summary(&app.session);
    let mut lines = vec![
        Line::from(Span::styled("Tour complete", app.theme.success_style())),
        Line::default(),
        Line::raw(format!(
            "{} of {} steps executed, {} failed",
            summary.executed,
            app.session.step_count(),
            summary.failed
        )),
    ];
    if summary.assertions > 0 {
        let style = if summary.assertions_passed == summary.assertions {
            app.theme.success_style()
        } else {
            app.theme.error_style()
        };
        lines.push(Line::from(Span::styled(
            format!("{}/{} assertions passed", summary.assertions_passed, summary.assertions),
            style,
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "R restart · ← review · q quit",
        app.theme.muted_style(),
    )));
    lines
}

fn render_finished(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let lines = finished_lines(app);
    let height = (lines.len() as u16).saturating_add(2).min(area.height);
    let width = 44u16.min(area.width);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(Text::from(lines)).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.panel_border_style(true)),
    );
    frame.render_widget(paragraph, popup);
}
