// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Drives a [`PlaybackSession`] from key presses and wall-clock ticks and draws the active step
//! with ratatui + crossterm. Executions run as tasks on a current-thread tokio runtime; their
//! outcomes come back over an unbounded channel that the UI loop drains every tick.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tokio::{
    runtime::{Builder, Runtime},
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
};
use tracing::{debug, warn};

use crate::exec::{ExecutionContextId, ExecutionOutcome, Executor};
use crate::format::tour::TourDiagnostic;
use crate::model::tour::{RunMode, StepLayout, Tour, TourStep};
use crate::playback::{ExecutionTicket, Phase, PlaybackAction, PlaybackError, PlaybackSession};
use crate::render::text::{sanitize_line, truncate_with_ellipsis};
use crate::render::{render_code, render_narrative, render_result, RenderStyles};

mod theme;

use theme::TuiTheme;

const TICK: Duration = Duration::from_millis(250);
const EXECUTION_POLL: Duration = Duration::from_millis(40);
const TOAST_TTL: Duration = Duration::from_secs(2);
const FOOTER_BRAND: &str = "fql·tour";
const HEADER_TITLE_MAX: usize = 40;

type Completion = (ExecutionTicket, ExecutionOutcome);

/// Runs the interactive tour player until the user quits.
/// Parse diagnostics are counted in the header and listed in the help overlay.
pub fn run(
    tour: &Tour,
    diagnostics: &[TourDiagnostic],
    executor: Arc<dyn Executor>,
    context: Option<ExecutionContextId>,
) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut app = App::new(tour, executor, context, theme)?.with_diagnostics(diagnostics);
    let mut terminal = TerminalSession::new()?;

    while !app.should_quit {
        app.tick(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        let wait = app.poll_interval();
        let key_wait = if app.in_flight > 0 {
            app.pump_completions(wait);
            Duration::ZERO
        } else {
            wait
        };

        if event::poll(key_wait)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App<'_>) {
    let [header_area, main_area, status_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .areas(frame.area());

    frame.render_widget(Paragraph::new(header_line(app)), header_area);
    draw_step(frame, app, main_area);

    let toast_snapshot = app.toast.as_ref().map(|toast| (toast.message.clone(), toast.expires_at));
    let toast_suffix = match toast_snapshot {
        Some((message, expires_at)) if expires_at > Instant::now() => format!(" | {message}"),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };
    frame.render_widget(Paragraph::new(footer_help_line(app, &toast_suffix)), status_area);
    frame.render_widget(
        Paragraph::new(footer_brand_line(app)).alignment(Alignment::Right),
        status_area,
    );

    if app.session.is_finished() {
        render_finished(frame, app, main_area);
    }
    if app.show_help {
        render_help(frame, app, main_area);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Narrative,
    Code,
    Result,
}

impl Panel {
    fn is_active(self, phase: Phase) -> bool {
        match self {
            Self::Narrative => phase == Phase::Narrative,
            Self::Code => phase == Phase::CodeReveal,
            Self::Result => matches!(phase, Phase::Executing | Phase::Result | Phase::Done),
        }
    }
}

fn draw_step(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let Some(step) = app.session.current_step() else {
        let empty = Paragraph::new("This tour has no steps.").style(app.theme.muted_style());
        frame.render_widget(empty, area);
        return;
    };

    let narrative = narrative_lines(step, &app.styles);
    let code = code_panel_lines(app, step);
    let result = result_lines(app, step);

    let mut panels = Vec::new();
    if !narrative.is_empty() {
        panels.push((Panel::Narrative, narrative));
    }
    if step.has_code() {
        panels.push((Panel::Code, code));
        if !result.is_empty() {
            panels.push((Panel::Result, result));
        }
    } else if !result.is_empty() {
        panels.push((Panel::Result, result));
    }

    match step.layout() {
        StepLayout::Split if panels.len() > 1 && panels[0].0 == Panel::Narrative => {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .areas(area);
            let rest = panels.split_off(1);
            render_stack(frame, app, step, left, panels);
            render_stack(frame, app, step, right, rest);
        }
        StepLayout::FullCode if step.has_code() => {
            panels.retain(|(panel, _)| *panel != Panel::Narrative);
            render_stack(frame, app, step, area, panels);
        }
        _ => render_stack(frame, app, step, area, panels),
    }
}

/// Lays panels out top to bottom. The code panel takes the remaining height, the others are
/// sized to their content up to a share of the area.
fn render_stack(
    frame: &mut Frame<'_>,
    app: &App<'_>,
    step: &TourStep,
    area: Rect,
    panels: Vec<(Panel, Vec<Line<'static>>)>,
) {
    let has_code_panel = panels.iter().any(|(panel, _)| *panel == Panel::Code);
    let constraints = panels
        .iter()
        .map(|(panel, lines)| match panel {
            Panel::Code => Constraint::Min(3),
            _ if !has_code_panel => Constraint::Min(panel_height(lines.len(), area.height)),
            Panel::Narrative => Constraint::Length(panel_height(lines.len(), area.height / 2)),
            Panel::Result => Constraint::Length(panel_height(lines.len(), area.height / 3)),
        })
        .collect::<Vec<_>>();
    let areas = Layout::vertical(constraints).split(area);

    for ((panel, lines), panel_area) in panels.into_iter().zip(areas.iter().copied()) {
        let border_style = app.theme.panel_border_style(panel.is_active(app.session.phase()));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(panel_title(app, step, panel));
        let mut paragraph = Paragraph::new(Text::from(lines)).style(app.theme.base_style()).block(block);
        if panel != Panel::Code {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        frame.render_widget(paragraph, panel_area);
    }
}

fn panel_height(lines: usize, cap: u16) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2).min(cap.max(3))
}

fn panel_title(app: &App<'_>, step: &TourStep, panel: Panel) -> String {
    let session = &app.session;
    match panel {
        Panel::Narrative => view_title("Narrative", None, None),
        Panel::Code => {
            let tail = if !session.is_reveal_complete() {
                Some(format!("{}/{}", session.revealed_lines(), session.total_lines()))
            } else {
                match step.run() {
                    RunMode::Auto => None,
                    RunMode::Click => Some("click to run".to_owned()),
                    RunMode::Skip => Some("not run".to_owned()),
                }
            };
            view_title("Code", Some('y'), tail.as_deref())
        }
        Panel::Result => {
            let tail = session.current_result().and_then(|result| {
                if result.assertions().is_empty() {
                    None
                } else if result.all_assertions_passed() {
                    Some("✓")
                } else {
                    Some("✗")
                }
            });
            view_title("Result", Some('r'), tail)
        }
    }
}

fn narrative_lines(step: &TourStep, styles: &RenderStyles) -> Vec<Line<'static>> {
    let mut lines = step.text().map(|text| render_narrative(text, styles)).unwrap_or_default();
    for (heading, body) in [("Note", step.note()), ("Expected", step.expect())] {
        let Some(body) = body else {
            continue;
        };
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(format!("{heading}:"), styles.strong)));
        lines.extend(render_narrative(body, styles));
    }
    if !step.has_code() {
        if let Some(caption) = step.caption() {
            lines.extend(caption_lines(caption, styles));
        }
    }
    lines
}

fn caption_lines(caption: &str, styles: &RenderStyles) -> Vec<Line<'static>> {
    caption
        .lines()
        .map(|line| Line::from(Span::styled(sanitize_line(line).into_owned(), styles.emphasis)))
        .collect()
}

fn code_panel_lines(app: &App<'_>, step: &TourStep) -> Vec<Line<'static>> {
    let mut lines = render_code(step, app.session.revealed_lines(), &app.styles);
    if let Some(caption) = step.caption().filter(|_| app.session.is_reveal_complete()) {
        lines.push(Line::default());
        lines.extend(caption_lines(caption, &app.styles));
    }
    lines
}

fn result_lines(app: &App<'_>, step: &TourStep) -> Vec<Line<'static>> {
    let session = &app.session;
    let styles = &app.styles;
    let mut lines = Vec::new();

    match session.phase() {
        Phase::Executing => {
            lines.push(Line::from(Span::styled("Running…", styles.muted)));
        }
        Phase::Result | Phase::Done => match session.current_result() {
            Some(result) => lines.extend(render_result(step, result, styles)),
            None if step.has_code() => {
                lines.push(Line::from(Span::styled("Not executed", styles.muted)));
            }
            None => {}
        },
        Phase::CodeReveal if session.is_reveal_complete() && step.run() == RunMode::Click => {
            lines.push(Line::from(Span::styled("Press r to run", styles.muted)));
        }
        Phase::Narrative | Phase::CodeReveal => {}
    }

    if let Some(err @ PlaybackError::MalformedStep { .. }) = session.error() {
        lines.push(Line::from(Span::styled(err.to_string(), styles.failure)));
    }
    lines
}

// Extracted title/header/footer/help/overlay rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

struct App<'t> {
    session: PlaybackSession<'t>,
    executor: Arc<dyn Executor>,
    runtime: Runtime,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
    in_flight: usize,
    last_tick: Option<Instant>,
    theme: TuiTheme,
    styles: RenderStyles,
    show_help: bool,
    help_scroll: u16,
    toast: Option<Toast>,
    diagnostics: Vec<String>,
    should_quit: bool,
}

impl<'t> App<'t> {
    fn new(
        tour: &'t Tour,
        executor: Arc<dyn Executor>,
        context: Option<ExecutionContextId>,
        theme: TuiTheme,
    ) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let (completions_tx, completions_rx) = unbounded_channel();
        let styles = theme.render_styles();

        Ok(Self {
            session: PlaybackSession::new(tour, context),
            executor,
            runtime,
            completions_tx,
            completions_rx,
            in_flight: 0,
            last_tick: None,
            theme,
            styles,
            show_help: false,
            help_scroll: 0,
            toast: None,
            diagnostics: Vec::new(),
            should_quit: false,
        })
    }

    fn with_diagnostics(mut self, diagnostics: &[TourDiagnostic]) -> Self {
        self.diagnostics = diagnostics.iter().map(ToString::to_string).collect();
        self
    }

    /// Feeds wall-clock time since the previous tick into the session.
    fn tick(&mut self, now: Instant) {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);
        self.advance(elapsed);
    }

    fn advance(&mut self, elapsed: Duration) {
        self.session.advance(elapsed);
        self.dispatch_execution();
        self.drain_completions();
    }

    /// How long the loop may block before the session needs attention again.
    fn poll_interval(&self) -> Duration {
        let mut wait = self
            .session
            .pending_timer()
            .map(|(_, remaining)| remaining.min(TICK))
            .unwrap_or(TICK);
        if self.in_flight > 0 {
            wait = wait.min(EXECUTION_POLL);
        }
        wait
    }

    fn dispatch_execution(&mut self) {
        let Some(request) = self.session.take_execution_request() else {
            return;
        };
        debug!(
            step = request.ticket.step(),
            attempt = request.ticket.attempt(),
            "dispatching execution"
        );

        let executor = Arc::clone(&self.executor);
        let completions = self.completions_tx.clone();
        self.in_flight += 1;
        self.runtime.spawn(async move {
            let outcome = executor.execute(&request.code, request.context.as_ref()).await;
            // The receiver only goes away when the UI is shutting down.
            let _ = completions.send((request.ticket, outcome));
        });
    }

    /// Runs pending executions for up to `budget`, then applies every completion that arrived.
    fn pump_completions(&mut self, budget: Duration) {
        if self.in_flight == 0 {
            return;
        }
        let receiver = &mut self.completions_rx;
        let first = self
            .runtime
            .block_on(async { tokio::time::timeout(budget, receiver.recv()).await.ok().flatten() });
        if let Some(completion) = first {
            self.complete(completion);
        }
        self.drain_completions();
    }

    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.complete(completion);
        }
    }

    fn complete(&mut self, (ticket, outcome): Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !self.session.complete_execution(ticket, outcome) {
            debug!(step = ticket.step(), attempt = ticket.attempt(), "ignored superseded result");
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let interrupt =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if interrupt || self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1);
                }
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('y') => self.yank_step_code(),
            _ => {
                if let Some(action) = playback_action_for_key(code, self.session.phase()) {
                    self.apply(action);
                }
            }
        }
        false
    }

    fn apply(&mut self, action: PlaybackAction) {
        self.session.apply(action);
        if action == PlaybackAction::Restart {
            self.set_toast("Restarted tour");
        }
        self.dispatch_execution();
    }

    fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn yank_step_code(&mut self) {
        let Some(step) = self.session.current_step().filter(|step| step.has_code()) else {
            self.set_toast("No code to yank");
            return;
        };
        match copy_to_clipboard(step.code()) {
            Ok(backend) => self.set_toast(format!("Yanked step code ({backend})")),
            Err(err) => {
                warn!(%err, "clipboard copy failed");
                self.set_toast(format!("Clipboard error: {err}"));
            }
        }
    }
}

/// Keyboard policy for playback actions. `r` runs a step waiting for a click and retries
/// otherwise.
fn playback_action_for_key(code: KeyCode, phase: Phase) -> Option<PlaybackAction> {
    match code {
        KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') => {
            Some(PlaybackAction::Next)
        }
        KeyCode::Left | KeyCode::Char('h') => Some(PlaybackAction::Back),
        KeyCode::Home | KeyCode::Char('R') => Some(PlaybackAction::Restart),
        KeyCode::Char('r') if phase == Phase::CodeReveal => Some(PlaybackAction::Run),
        KeyCode::Char('r') => Some(PlaybackAction::Retry),
        KeyCode::Char('s') => Some(PlaybackAction::Skip),
        _ => None,
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

#[cfg(test)]
mod tests;
