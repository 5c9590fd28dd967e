// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Narrative markup to terminal lines.
//!
//! The dialect is deliberately tiny: `**strong**`, `*emphasis*`, `` `code` ``, lines starting
//! with `- ` or `* ` become bullets, and a blank line separates paragraphs. Markers without a
//! closing partner are kept as literal text. There is no nesting.

use ratatui::text::{Line, Span};

use super::styles::RenderStyles;
use super::text::sanitize_line;

const BULLET: &str = "  • ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inline {
    Plain,
    Strong,
    Emphasis,
    Code,
}

pub fn render_narrative(text: &str, styles: &RenderStyles) -> Vec<Line<'static>> {
    text.split('\n').map(|line| render_narrative_line(&sanitize_line(line), styles)).collect()
}

fn render_narrative_line(line: &str, styles: &RenderStyles) -> Line<'static> {
    let trimmed = line.trim_start();
    let bullet_body = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* "));

    let mut spans = Vec::new();
    let body = match bullet_body {
        Some(body) => {
            spans.push(Span::styled(BULLET, styles.bullet));
            body
        }
        None => line,
    };

    for (text, inline) in parse_inline(body) {
        let style = match inline {
            Inline::Plain => styles.base,
            Inline::Strong => styles.strong,
            Inline::Emphasis => styles.emphasis,
            Inline::Code => styles.inline_code,
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn parse_inline(line: &str) -> Vec<(String, Inline)> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some((inner, after, inline)) = closed_marker(rest) {
            if !plain.is_empty() {
                out.push((std::mem::take(&mut plain), Inline::Plain));
            }
            out.push((inner.to_owned(), inline));
            rest = after;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        plain.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    if !plain.is_empty() {
        out.push((plain, Inline::Plain));
    }
    out
}

/// Matches a complete marker pair at the start of `text`: `(inner, remainder, kind)`.
fn closed_marker(text: &str) -> Option<(&str, &str, Inline)> {
    const MARKERS: &[(&str, Inline)] =
        &[("`", Inline::Code), ("**", Inline::Strong), ("*", Inline::Emphasis)];

    MARKERS.iter().find_map(|(marker, inline)| {
        let after_open = text.strip_prefix(marker)?;
        let end = after_open.find(marker)?;
        let inner = &after_open[..end];
        if inner.is_empty() {
            return None;
        }
        // `*` pairs must hug their text, so `5 * 3 * 2` stays arithmetic.
        let hugs = !inner.starts_with(char::is_whitespace) && !inner.ends_with(char::is_whitespace);
        if *inline != Inline::Code && !hugs {
            return None;
        }
        Some((inner, &after_open[end + marker.len()..], *inline))
    })
}
