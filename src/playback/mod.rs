// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Step-by-step playback of a parsed tour.
//!
//! [`PlaybackSession`] is a single-threaded state machine over a borrowed [`Tour`]. It owns no
//! clock and no I/O:
//!
//! - time only moves when the driver calls [`PlaybackSession::advance`], so narrative delays and
//!   incremental reveals are deterministic under test;
//! - executions are requested, not performed. The driver takes the [`ExecutionRequest`], runs it
//!   and reports back through [`PlaybackSession::complete_execution`] with the request's ticket.
//!
//! Each request carries an [`ExecutionTicket`] of `(step, attempt)`. Attempt counters only grow,
//! so a completion that arrives after the user moved on, retried or restarted is recognised as
//! stale and dropped instead of overwriting the cached result.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::exec::{ExecutionContextId, ExecutionError, ExecutionOutcome};
use crate::model::tour::{RevealMode, RunMode, Tour, TourStep};

mod assertions;

pub use assertions::{assertion_passes, evaluate_assertions, visible_result_lines, AssertionResult};

/// Auto-advance delay for narrative steps without a `pause`.
pub const NARRATIVE_DELAY: Duration = Duration::from_millis(800);
pub const TYPEWRITER_INTERVAL: Duration = Duration::from_millis(150);
pub const LINE_BY_LINE_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Narrative,
    CodeReveal,
    Executing,
    Result,
    Done,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Narrative => "narrative",
            Self::CodeReveal => "code",
            Self::Executing => "executing",
            Self::Result => "result",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackAction {
    Next,
    Back,
    Restart,
    Run,
    Retry,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutionTicket {
    step: usize,
    attempt: u64,
}

impl ExecutionTicket {
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub ticket: ExecutionTicket,
    pub code: String,
    pub context: Option<ExecutionContextId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    Transport { message: String },
    Backend { message: String },
    MalformedStep { step: usize, reason: String },
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "connection error: {message}"),
            Self::Backend { message } => write!(f, "error: {message}"),
            Self::MalformedStep { step, reason } => write!(f, "step {}: {reason}", step + 1),
        }
    }
}

impl std::error::Error for PlaybackError {}

impl From<&ExecutionError> for PlaybackError {
    fn from(err: &ExecutionError) -> Self {
        match err {
            ExecutionError::Transport { message } => Self::Transport { message: message.clone() },
            ExecutionError::Backend { message } => Self::Backend { message: message.clone() },
        }
    }
}

/// Most recent execution of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    outcome: ExecutionOutcome,
    assertions: Vec<AssertionResult>,
}

impl StepResult {
    pub fn outcome(&self) -> &ExecutionOutcome {
        &self.outcome
    }

    pub fn assertions(&self) -> &[AssertionResult] {
        &self.assertions
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn all_assertions_passed(&self) -> bool {
        self.assertions.iter().all(AssertionResult::passed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    NarrativeAdvance,
    RevealTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    kind: TimerKind,
    due: Duration,
}

#[derive(Debug)]
pub struct PlaybackSession<'t> {
    tour: &'t Tour,
    context: Option<ExecutionContextId>,
    index: usize,
    phase: Phase,
    error: Option<PlaybackError>,
    results: BTreeMap<usize, StepResult>,
    finished: bool,
    revealed_lines: usize,
    clock: Duration,
    timer: Option<PendingTimer>,
    attempts: BTreeMap<usize, u64>,
    in_flight: Option<ExecutionTicket>,
    pending_request: Option<ExecutionRequest>,
}

impl<'t> PlaybackSession<'t> {
    /// Starts a session on step 0. An empty tour starts out finished.
    pub fn new(tour: &'t Tour, context: Option<ExecutionContextId>) -> Self {
        let mut session = Self {
            tour,
            context,
            index: 0,
            phase: Phase::Done,
            error: None,
            results: BTreeMap::new(),
            finished: false,
            revealed_lines: 0,
            clock: Duration::ZERO,
            timer: None,
            attempts: BTreeMap::new(),
            in_flight: None,
            pending_request: None,
        };
        session.enter_step(0);
        session
    }

    pub fn tour(&self) -> &'t Tour {
        self.tour
    }

    pub fn context(&self) -> Option<&ExecutionContextId> {
        self.context.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.tour.len()
    }

    pub fn current_step(&self) -> Option<&'t TourStep> {
        self.tour.step(self.index)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&PlaybackError> {
        self.error.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn result(&self, index: usize) -> Option<&StepResult> {
        self.results.get(&index)
    }

    pub fn current_result(&self) -> Option<&StepResult> {
        self.result(self.index)
    }

    pub fn cached_result_count(&self) -> usize {
        self.results.len()
    }

    pub fn revealed_lines(&self) -> usize {
        self.revealed_lines
    }

    pub fn total_lines(&self) -> usize {
        self.current_step().map_or(0, |step| step.code_lines().len())
    }

    pub fn is_reveal_complete(&self) -> bool {
        self.revealed_lines >= self.total_lines()
    }

    /// Attempts started for `step` over the whole session.
    pub fn attempts(&self, step: usize) -> u64 {
        self.attempts.get(&step).copied().unwrap_or(0)
    }

    /// Kind and remaining time of the pending timer, if any.
    pub fn pending_timer(&self) -> Option<(TimerKind, Duration)> {
        self.timer.map(|timer| (timer.kind, timer.due.saturating_sub(self.clock)))
    }

    pub fn take_execution_request(&mut self) -> Option<ExecutionRequest> {
        self.pending_request.take()
    }

    pub fn apply(&mut self, action: PlaybackAction) {
        match action {
            PlaybackAction::Next => self.next(),
            PlaybackAction::Back => self.back(),
            PlaybackAction::Restart => self.restart(),
            PlaybackAction::Run => self.run(),
            PlaybackAction::Retry => self.retry(),
            PlaybackAction::Skip => self.skip(),
        }
    }

    /// Moves the logical clock forward and fires every timer that comes due.
    pub fn advance(&mut self, elapsed: Duration) {
        self.clock = self.clock.saturating_add(elapsed);

        while let Some(timer) = self.timer.filter(|timer| timer.due <= self.clock) {
            self.timer = None;
            match timer.kind {
                TimerKind::NarrativeAdvance => {
                    if self.phase == Phase::Narrative {
                        debug!(step = self.index, "narrative delay elapsed");
                        self.begin_reveal();
                    }
                }
                TimerKind::RevealTick => self.reveal_tick(timer.due),
            }
        }
    }

    pub fn next(&mut self) {
        if self.finished {
            return;
        }
        match self.phase {
            Phase::Narrative => self.begin_reveal(),
            Phase::CodeReveal if !self.is_reveal_complete() => self.finish_reveal(),
            Phase::CodeReveal | Phase::Result | Phase::Done => self.advance_step(),
            Phase::Executing => {}
        }
    }

    pub fn back(&mut self) {
        if self.index == 0 {
            return;
        }
        let target = self.index - 1;
        self.finished = false;

        if self.results.contains_key(&target) {
            self.cancel_timer();
            self.abandon_execution();
            self.index = target;
            self.phase = Phase::Result;
            self.error = None;
            self.revealed_lines = self.total_lines();
            debug!(step = target, "restored cached result");
        } else {
            self.enter_step(target);
        }
    }

    pub fn restart(&mut self) {
        self.results.clear();
        self.finished = false;
        self.enter_step(0);
    }

    /// Explicit click-to-run. Only meaningful while the code is on screen waiting.
    pub fn run(&mut self) {
        let Some(step) = self.current_step() else {
            return;
        };
        if !step.has_code() {
            self.error = Some(PlaybackError::MalformedStep {
                step: self.index,
                reason: "this step has no code to run".to_owned(),
            });
            return;
        }
        if self.phase == Phase::CodeReveal {
            self.revealed_lines = self.total_lines();
            self.start_execution();
        }
    }

    /// Re-executes the current step unless a run is already in flight.
    pub fn retry(&mut self) {
        let Some(step) = self.current_step() else {
            return;
        };
        if self.phase == Phase::Executing {
            return;
        }
        if !step.has_code() {
            self.run();
            return;
        }
        self.revealed_lines = self.total_lines();
        self.start_execution();
    }

    /// Leaves the current step without executing it.
    pub fn skip(&mut self) {
        if self.finished {
            return;
        }
        debug!(step = self.index, "skipped");
        self.advance_step();
    }

    /// Feeds an execution outcome back. Returns `false` when the ticket is stale and the outcome
    /// was discarded.
    pub fn complete_execution(&mut self, ticket: ExecutionTicket, outcome: ExecutionOutcome) -> bool {
        if self.phase != Phase::Executing || self.in_flight != Some(ticket) {
            warn!(
                step = ticket.step,
                attempt = ticket.attempt,
                current = self.index,
                "discarding stale execution result"
            );
            return false;
        }
        self.in_flight = None;

        let asserts = self.current_step().map(TourStep::asserts).unwrap_or_default();
        let assertions = evaluate_assertions(asserts, &outcome);
        self.error = outcome.as_ref().err().map(PlaybackError::from);
        match &self.error {
            Some(err) => warn!(step = self.index, %err, "execution failed"),
            None => debug!(step = self.index, "execution succeeded"),
        }

        self.results.insert(self.index, StepResult { outcome, assertions });
        self.phase = Phase::Result;
        true
    }

    fn enter_step(&mut self, index: usize) {
        self.cancel_timer();
        self.abandon_execution();
        self.index = index;
        self.error = None;
        self.revealed_lines = 0;

        let Some(step) = self.tour.step(index) else {
            self.phase = Phase::Done;
            self.finished = true;
            return;
        };
        debug!(step = index, title = step.title(), "entering step");

        if step.has_narrative() {
            self.phase = Phase::Narrative;
            if !step.wait() {
                let delay = step
                    .pause()
                    .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
                    .unwrap_or(NARRATIVE_DELAY);
                self.schedule(TimerKind::NarrativeAdvance, delay);
            }
        } else {
            self.begin_reveal();
        }
    }

    fn begin_reveal(&mut self) {
        self.cancel_timer();
        self.phase = Phase::CodeReveal;
        self.revealed_lines = 0;

        let interval = match self.current_step().map(TourStep::reveal) {
            Some(RevealMode::Typewriter) => TYPEWRITER_INTERVAL,
            Some(RevealMode::LineByLine) => LINE_BY_LINE_INTERVAL,
            Some(RevealMode::Instant) | None => {
                self.finish_reveal();
                return;
            }
        };

        if self.is_reveal_complete() {
            self.on_reveal_complete();
        } else {
            self.schedule(TimerKind::RevealTick, interval);
        }
    }

    fn reveal_tick(&mut self, fired_at: Duration) {
        if self.phase != Phase::CodeReveal {
            return;
        }
        self.revealed_lines += 1;
        if self.is_reveal_complete() {
            self.on_reveal_complete();
            return;
        }

        let interval = match self.current_step().map(TourStep::reveal) {
            Some(RevealMode::LineByLine) => LINE_BY_LINE_INTERVAL,
            _ => TYPEWRITER_INTERVAL,
        };
        // Anchor on the previous due time so one large `advance` catches up on every tick.
        self.timer = Some(PendingTimer { kind: TimerKind::RevealTick, due: fired_at + interval });
    }

    fn finish_reveal(&mut self) {
        self.revealed_lines = self.total_lines();
        self.on_reveal_complete();
    }

    fn on_reveal_complete(&mut self) {
        self.cancel_timer();
        let Some(step) = self.current_step() else {
            return;
        };

        if step.run() == RunMode::Skip || !step.has_code() {
            self.phase = Phase::Done;
            return;
        }
        match step.run() {
            RunMode::Click => debug!(step = self.index, "waiting for explicit run"),
            RunMode::Auto | RunMode::Skip => self.try_auto_execute(),
        }
    }

    fn try_auto_execute(&mut self) {
        if self.phase != Phase::CodeReveal || !self.is_reveal_complete() {
            return;
        }
        self.start_execution();
    }

    fn start_execution(&mut self) {
        let Some(step) = self.current_step() else {
            return;
        };
        self.cancel_timer();

        let attempt = self.attempts.entry(self.index).or_insert(0);
        *attempt += 1;
        let ticket = ExecutionTicket { step: self.index, attempt: *attempt };

        self.error = None;
        self.finished = false;
        self.phase = Phase::Executing;
        self.in_flight = Some(ticket);
        self.pending_request = Some(ExecutionRequest {
            ticket,
            code: step.code().to_owned(),
            context: self.context.clone(),
        });
        debug!(step = ticket.step, attempt = ticket.attempt, "execution requested");
    }

    fn advance_step(&mut self) {
        if self.index + 1 < self.tour.len() {
            self.enter_step(self.index + 1);
        } else {
            self.cancel_timer();
            self.abandon_execution();
            if self.phase == Phase::Executing {
                self.phase = Phase::Done;
            }
            self.finished = true;
            debug!("tour finished");
        }
    }

    fn abandon_execution(&mut self) {
        self.in_flight = None;
        self.pending_request = None;
    }

    fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        self.cancel_timer();
        debug_assert!(self.timer.is_none());
        self.timer = Some(PendingTimer { kind, due: self.clock.saturating_add(delay) });
    }

    fn cancel_timer(&mut self) {
        self.timer = None;
    }
}
