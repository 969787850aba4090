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

//! Error types for the Snowflake REST driver.
//!
//! The taxonomy mirrors how failures reach the caller:
//! - [`Error::Authentication`]: credential problems — always fatal to the
//!   current call, never retried.
//! - [`Error::Query`]: a remote-reported SQL failure (HTTP 422), carrying
//!   the diagnostics the server returned plus the statement that caused it.
//! - [`Error::PollTimeout`]: the completion poll budget ran out; a
//!   best-effort cancel was attempted first and its outcome is recorded.
//! - [`Error::Statement`]: any other non-success response.
//! - [`Error::Transport`]: the HTTP exchange itself failed.

use crate::codec::Value;

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by statement execution, result fetching, and
/// credential handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing credentials, malformed key material, or a failed
    /// token grant.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The server rejected the statement (HTTP 422).
    #[error("SQL error {code} (state {sql_state}): {message}")]
    Query {
        /// Error message reported by the server.
        message: String,
        /// Snowflake error code (e.g. `"002003"`).
        code: String,
        /// ANSI SQL state (e.g. `"42S02"`).
        sql_state: String,
        /// Handle of the failed statement, when the server assigned one.
        statement_handle: Option<String>,
        /// The SQL text as submitted (after literal substitution).
        sql: Option<String>,
        /// The bind values that were substituted into the statement.
        bindings: Vec<Value>,
    },

    /// The statement did not complete within the configured poll budget.
    ///
    /// `cancel_acknowledged` records whether the best-effort cancel that
    /// precedes this error was accepted by the server; it never replaces
    /// or masks the timeout itself.
    #[error("statement did not complete within {attempts} poll attempts (cancel acknowledged: {cancel_acknowledged})")]
    PollTimeout {
        attempts: u32,
        cancel_acknowledged: bool,
    },

    /// Any other non-success response, malformed response body, or invalid
    /// client-side state (e.g. a bind-count mismatch).
    #[error("statement error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Statement {
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
        message: String,
    },

    /// The HTTP exchange failed before a response was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Build a [`Error::Statement`] without an HTTP status.
    pub(crate) fn statement(message: impl Into<String>) -> Self {
        Error::Statement {
            status: None,
            message: message.into(),
        }
    }

    /// Attach the originating SQL and bindings to a [`Error::Query`].
    ///
    /// The REST client raises query errors from the response body alone;
    /// the executor enriches them with the statement context it holds.
    pub(crate) fn with_statement(self, sql: &str, bindings: &[Value]) -> Self {
        match self {
            Error::Query {
                message,
                code,
                sql_state,
                statement_handle,
                ..
            } => Error::Query {
                message,
                code,
                sql_state,
                statement_handle,
                sql: Some(sql.to_string()),
                bindings: bindings.to_vec(),
            },
            other => other,
        }
    }

    /// True for the poll-budget timeout produced by the executor.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::PollTimeout { .. })
    }
}
