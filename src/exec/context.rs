// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

/// Identifies the isolated execution context (ledger entity) a tour runs against.
///
/// The value is opaque to playback; it only has to be a non-empty token without whitespace so it
/// can travel in a JSON field or a command line flag unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutionContextId {
    value: String,
}

impl ExecutionContextId {
    pub fn new(value: impl Into<String>) -> Result<Self, ContextIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ContextIdError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(ContextIdError::ContainsWhitespace);
        }
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ExecutionContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for ExecutionContextId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for ExecutionContextId {
    type Err = ContextIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextIdError {
    Empty,
    ContainsWhitespace,
}

impl fmt::Display for ContextIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("context id must not be empty"),
            Self::ContainsWhitespace => f.write_str("context id must not contain whitespace"),
        }
    }
}

impl std::error::Error for ContextIdError {}
