// Copyright (c) 2026 Snowflake REST Driver Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Statement execution against the Snowflake SQL REST API.
//!
//! [`StatementExecutor::execute`] makes the stateless statements API
//! behave like a synchronous connection: it substitutes bind values as
//! SQL literals, submits with a fresh request id, and either returns the
//! inline result or drives the completion poll loop until the statement
//! resolves. The caller's task blocks for the whole exchange; independent
//! statements run concurrently by invoking separate executions on
//! separate tasks.

use crate::client::{StatementOutcome, StatementsApi};
use crate::codec::{interpolate, Value};
use crate::error::{Error, Result};
use crate::reader::QueryResult;
use crate::types::{StatementContext, StatementRequestBody, StatementResponseBody};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Polling configuration for asynchronous statements.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Interval between completion polls.
    pub poll_interval: Duration,
    /// Maximum number of polls before the statement is abandoned.
    /// The default budget is about one hour at the default interval.
    pub max_poll_attempts: u32,
    /// Out-of-band cancellation observed between poll iterations. The
    /// poll loop itself only cancels a statement when its attempt budget
    /// runs out.
    pub cancellation: Option<CancellationToken>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            max_poll_attempts: 7200,
            cancellation: None,
        }
    }
}

/// Executes SQL statements and assembles their results.
#[derive(Debug)]
pub struct StatementExecutor {
    client: Arc<dyn StatementsApi>,
    config: ExecutorConfig,
}

impl StatementExecutor {
    /// Creates a new executor over `client`.
    pub fn new(client: Arc<dyn StatementsApi>, config: ExecutorConfig) -> Self {
        Self { client, config }
    }

    /// Attach an out-of-band cancellation token observed by the poll loop.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.config.cancellation = Some(token);
        self
    }

    /// Execute `sql` with `bindings` substituted positionally, within
    /// `context`.
    ///
    /// Returns once the statement has a terminal result, polling through
    /// asynchronous execution if needed. Query errors reported by the
    /// server are enriched with the SQL text and bindings for diagnostics.
    pub async fn execute(
        &self,
        sql: &str,
        bindings: &[Value],
        context: &StatementContext,
    ) -> Result<QueryResult> {
        let request_id = Uuid::new_v4().to_string();
        let statement = interpolate(sql, bindings)?;
        let body = StatementRequestBody::new(statement, context);

        debug!("Executing statement (requestId {})", request_id);

        let outcome = self
            .client
            .submit_statement(&request_id, &body)
            .await
            .map_err(|e| e.with_statement(sql, bindings))?;

        let response = match outcome {
            StatementOutcome::Complete(response) => response,
            StatementOutcome::Pending { handle } => {
                debug!("Statement {} executing asynchronously", handle);
                self.wait_for_completion(&handle)
                    .await
                    .map_err(|e| e.with_statement(sql, bindings))?
            }
        };

        QueryResult::new(response, Arc::clone(&self.client))
    }

    /// Execute a DML statement and report the number of affected rows.
    ///
    /// DML results carry the count as the single cell of a single-row
    /// result; when that cell isn't an integer the metadata row count is
    /// reported instead.
    pub async fn execute_update(
        &self,
        sql: &str,
        bindings: &[Value],
        context: &StatementContext,
    ) -> Result<u64> {
        let mut result = self.execute(sql, bindings, context).await?;
        let fallback = result.row_count();
        if let Some(row) = result.next_row().await? {
            if let Some(Value::Int(n)) = row.values().first() {
                if *n >= 0 {
                    return Ok(*n as u64);
                }
            }
        }
        Ok(fallback)
    }

    /// Poll `handle` until the statement resolves or the attempt budget
    /// runs out.
    ///
    /// Every response is interpreted exactly as the submission response
    /// was, so remote failures surface mid-poll. Exhausting the budget
    /// issues one best-effort cancel and fails with a timeout whose error
    /// records whether the cancel was acknowledged.
    async fn wait_for_completion(&self, handle: &str) -> Result<StatementResponseBody> {
        let max = self.config.max_poll_attempts;

        for attempt in 1..=max {
            if let Some(token) = &self.config.cancellation {
                if token.is_cancelled() {
                    debug!("Caller cancelled wait for statement {}", handle);
                    let acknowledged = self.cancel(handle).await;
                    return Err(Error::statement(format!(
                        "statement cancelled by caller (cancel acknowledged: {acknowledged})"
                    )));
                }
            }

            sleep(self.config.poll_interval).await;

            debug!("Polling statement {} (attempt {}/{})", handle, attempt, max);
            match self.client.get_statement_status(handle).await? {
                StatementOutcome::Complete(response) => {
                    debug!("Statement {} completed after {} polls", handle, attempt);
                    return Ok(response);
                }
                StatementOutcome::Pending { .. } => continue,
            }
        }

        warn!(
            "Statement {} still pending after {} polls, issuing best-effort cancel",
            handle, max
        );
        let cancel_acknowledged = self.cancel(handle).await;
        Err(Error::PollTimeout {
            attempts: max,
            cancel_acknowledged,
        })
    }

    /// Best-effort cancellation of an in-flight statement.
    ///
    /// Failures are reported as `false`, never raised: cancellation is
    /// advisory cleanup and must not mask the error that triggered it.
    pub async fn cancel(&self, handle: &str) -> bool {
        match self.client.cancel_statement(handle).await {
            Ok(()) => {
                debug!("Canceled statement {}", handle);
                true
            }
            Err(e) => {
                warn!("Cancel of statement {} failed: {}", handle, e);
                false
            }
        }
    }
}
