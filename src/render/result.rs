// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::text::{Line, Span};

use super::styles::RenderStyles;
use super::text::sanitize_line;
use crate::model::tour::TourStep;
use crate::playback::{visible_result_lines, StepResult};

/// Renders a cached step result: visible output, execution counters, then one line per assertion.
pub fn render_result(step: &TourStep, result: &StepResult, styles: &RenderStyles) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match result.outcome() {
        Ok(output) => {
            for line in visible_result_lines(step, output) {
                lines.push(Line::from(Span::styled(sanitize_line(line).into_owned(), styles.base)));
            }
            if step.hide_output() {
                lines.push(Line::from(Span::styled("(output hidden)", styles.muted)));
            }
            lines.push(Line::from(Span::styled(
                summary(output.statements_executed, output.journals_created),
                styles.muted,
            )));
        }
        Err(err) => {
            lines.push(Line::from(Span::styled(err.to_string(), styles.failure)));
        }
    }

    for assertion in result.assertions() {
        let (mark, style) =
            if assertion.passed() { ("✓", styles.success) } else { ("✗", styles.failure) };
        lines.push(Line::from(vec![
            Span::styled(format!("{mark} "), style),
            Span::styled(assertion.assert().to_string(), styles.base),
        ]));
    }

    lines
}

fn summary(statements: u64, journals: u64) -> String {
    let plural = |count: u64, word: &str| {
        if count == 1 {
            format!("{count} {word}")
        } else {
            format!("{count} {word}s")
        }
    };
    format!("{}, {} created", plural(statements, "statement"), plural(journals, "journal"))
}

#[cfg(test)]
mod tests {
    use super::render_result;
    use crate::exec::{ExecutionError, ExecutionOutput};
    use crate::format::tour::parse_tour;
    use crate::model::tour::Tour;
    use crate::playback::{PlaybackSession, StepResult};
    use crate::render::styles::RenderStyles;
    use crate::render::test_utils::lines_text;

    fn executed(tour: &Tour, outcome: Result<ExecutionOutput, ExecutionError>) -> StepResult {
        let mut session = PlaybackSession::new(tour, None);
        let request = session.take_execution_request().expect("request");
        session.complete_execution(request.ticket, outcome);
        session.current_result().cloned().expect("result")
    }

    #[test]
    fn success_shows_output_counters_and_assertions() {
        let tour = parse_tour("--@ assert: Bank = 100\n--@ assert: Bank contains 7\nGET 1\n");
        let output = ExecutionOutput {
            results: vec!["Bank: 100".to_owned()],
            statements_executed: 1,
            journals_created: 0,
        };
        let result = executed(&tour, Ok(output));

        let lines = render_result(&tour.steps()[0], &result, &RenderStyles::default());
        assert_eq!(
            lines_text(&lines),
            vec![
                "Bank: 100",
                "1 statement, 0 journals created",
                "✓ Bank = 100",
                "✗ Bank contains 7",
            ]
        );
    }

    #[test]
    fn hidden_output_is_announced() {
        let tour = parse_tour("--@ hideOutput\nGET 1\n");
        let result = executed(&tour, Ok(ExecutionOutput::new(vec!["secret: 1".to_owned()])));
        let lines = render_result(&tour.steps()[0], &result, &RenderStyles::default());
        assert_eq!(lines_text(&lines), vec!["(output hidden)", "0 statements, 0 journals created"]);
    }

    #[test]
    fn failure_shows_the_error() {
        let tour = parse_tour("--@ assert: x = 1\nGET 1\n");
        let result = executed(&tour, Err(ExecutionError::transport("connection refused")));
        let lines = render_result(&tour.steps()[0], &result, &RenderStyles::default());
        assert_eq!(
            lines_text(&lines),
            vec!["backend unreachable: connection refused", "✗ x = 1"]
        );
    }
}
