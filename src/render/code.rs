// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::styles::RenderStyles;
use super::text::sanitize_line;
use crate::highlight::tokenize_line;
use crate::model::tour::TourStep;

/// Renders the first `revealed` code lines of a step.
///
/// Each line gets a right-aligned 1-based line number. Tokens equal to one of the step's
/// `highlight` terms (ASCII case-insensitive) are marked, and lines outside `focus` are dimmed.
pub fn render_code(step: &TourStep, revealed: usize, styles: &RenderStyles) -> Vec<Line<'static>> {
    let lines = step.code_lines();
    let gutter_width = lines.len().to_string().len();

    lines
        .iter()
        .take(revealed)
        .enumerate()
        .map(|(idx, line)| {
            let dimmed = step.focus().is_some_and(|focus| !focus.contains_line(idx));
            render_code_line(idx, line, gutter_width, dimmed, step.highlight(), styles)
        })
        .collect()
}

fn render_code_line(
    idx: usize,
    line: &str,
    gutter_width: usize,
    dimmed: bool,
    highlight: &[String],
    styles: &RenderStyles,
) -> Line<'static> {
    let dim = |style: Style| if dimmed { style.add_modifier(Modifier::DIM) } else { style };

    let mut spans = vec![Span::styled(format!("{:>gutter_width$} │ ", idx + 1), styles.gutter)];
    let line = sanitize_line(line);
    for token in tokenize_line(&line) {
        let highlighted = token.kind.is_some()
            && highlight.iter().any(|term| term.eq_ignore_ascii_case(token.text));
        let style = if highlighted {
            styles.token(token.kind).patch(styles.highlight)
        } else {
            styles.token(token.kind)
        };
        spans.push(Span::styled(token.text.to_owned(), dim(style)));
    }
    Line::from(spans)
}
