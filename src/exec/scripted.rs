// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{ExecutionContextId, ExecutionOutcome, ExecutionOutput, Executor};

#[derive(Debug, Clone)]
struct ScriptedResponse {
    needle: String,
    outcome: ExecutionOutcome,
}

/// In-memory executor with canned answers.
///
/// The first response whose needle occurs in the submitted code wins. Code that matches nothing
/// succeeds with empty results and counters derived from the code itself.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: Vec<ScriptedResponse>,
    latency: Duration,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, needle: impl Into<String>, outcome: ExecutionOutcome) -> Self {
        self.responses.push(ScriptedResponse { needle: needle.into(), outcome });
        self
    }

    /// Delays every answer, so a UI can show the executing state.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Code submitted so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn respond(&self, code: &str) -> ExecutionOutcome {
        match self.responses.iter().find(|response| code.contains(&response.needle)) {
            Some(response) => response.outcome.clone(),
            None => Ok(ExecutionOutput {
                results: Vec::new(),
                statements_executed: count_statements(code),
                journals_created: count_journals(code),
            }),
        }
    }
}

fn count_statements(code: &str) -> u64 {
    let statements = code
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    statements.split(';').filter(|statement| !statement.trim().is_empty()).count() as u64
}

fn count_journals(code: &str) -> u64 {
    code.lines()
        .map(|line| line.split_whitespace().map(str::to_ascii_uppercase).collect::<Vec<_>>())
        .filter(|words| words.windows(2).any(|pair| pair[0] == "CREATE" && pair[1] == "JOURNAL"))
        .count() as u64
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn execute(&self, code: &str, context: Option<&ExecutionContextId>) -> ExecutionOutcome {
        debug!(context = ?context.map(ExecutionContextId::as_str), "scripted execution");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(code.to_owned());
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.respond(code)
    }
}
