// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ExecutionContextId, ExecutionError, ExecutionOutcome, ExecutionOutput, Executor};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    success: bool,
    #[serde(default)]
    results: Vec<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    statements_executed: u64,
    #[serde(default)]
    journals_created: u64,
}

impl ExecuteResponse {
    fn into_outcome(self) -> ExecutionOutcome {
        if !self.success {
            let message = self
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "backend reported failure without a message".to_owned());
            return Err(ExecutionError::Backend { message });
        }

        Ok(ExecutionOutput {
            results: self.results,
            statements_executed: self.statements_executed,
            journals_created: self.journals_created,
        })
    }
}

/// Executes FQL by POSTing it as JSON to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    http: Client,
    endpoint: String,
}

impl HttpExecutor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ExecutionError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fqltour/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ExecutionError::transport(format!("failed to build client: {err}")))?;

        Ok(Self { http, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    async fn execute(&self, code: &str, context: Option<&ExecutionContextId>) -> ExecutionOutcome {
        let request = ExecuteRequest { query: code, entity: context.map(ExecutionContextId::as_str) };
        debug!(endpoint = %self.endpoint, bytes = code.len(), "posting fql");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| ExecutionError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ExecutionError::transport(format!("unreadable response: {err}")))?;

        if status.is_success() {
            let decoded: ExecuteResponse = serde_json::from_str(&body)
                .map_err(|err| ExecutionError::transport(format!("unreadable response: {err}")))?;
            return decoded.into_outcome();
        }

        // Error statuses may still carry the backend's own failure report.
        match serde_json::from_str::<ExecuteResponse>(&body) {
            Ok(decoded) if !decoded.success => {
                debug!(%status, "backend reported failure with an error status");
                decoded.into_outcome()
            }
            _ => {
                warn!(%status, "backend returned an error status");
                Err(ExecutionError::transport(format!(
                    "HTTP {status}: {}",
                    body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect::<String>()
                )))
            }
        }
    }
}
