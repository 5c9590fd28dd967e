// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Running FQL against a backend.
//!
//! Playback never talks to a backend directly. The driver takes an execution request from the
//! session, hands the code to an [`Executor`] and feeds the outcome back.

use std::fmt;

use async_trait::async_trait;

mod context;
mod http;
mod scripted;

pub use context::{ContextIdError, ExecutionContextId};
pub use http::{HttpExecutor, DEFAULT_TIMEOUT};
pub use scripted::ScriptedExecutor;

/// Successful execution payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub results: Vec<String>,
    pub statements_executed: u64,
    pub journals_created: u64,
}

impl ExecutionOutput {
    pub fn new(results: Vec<String>) -> Self {
        Self { results, ..Self::default() }
    }

    /// All result blocks joined by newlines, the text assertions are checked against.
    pub fn joined(&self) -> String {
        self.results.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The backend could not be reached or answered with something unreadable.
    Transport { message: String },
    /// The backend ran the request and reported a failure.
    Backend { message: String },
}

impl ExecutionError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message } | Self::Backend { message } => message,
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "backend unreachable: {message}"),
            Self::Backend { message } => write!(f, "query failed: {message}"),
        }
    }
}

impl std::error::Error for ExecutionError {}

pub type ExecutionOutcome = Result<ExecutionOutput, ExecutionError>;

#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, code: &str, context: Option<&ExecutionContextId>) -> ExecutionOutcome;
}
