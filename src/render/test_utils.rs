// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::style::Style;
use ratatui::text::Line;

pub(super) fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

pub(super) fn lines_text(lines: &[Line<'_>]) -> Vec<String> {
    lines.iter().map(line_text).collect()
}

/// `(text, style)` for every span of a line, for asserting on styling.
pub(super) fn styled_spans(line: &Line<'_>) -> Vec<(String, Style)> {
    line.spans.iter().map(|span| (span.content.to_string(), span.style)).collect()
}
