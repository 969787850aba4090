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

//! Client implementations for the Snowflake SQL REST API.
//!
//! This module provides:
//! - [`StatementsApi`] trait: abstract interface over the statements
//!   endpoints, which the executor and reader consume (and tests mock)
//! - [`SnowflakeHttpClient`]: low-level HTTP wrapper with credential and
//!   header injection
//! - [`RestClient`]: implementation against `/api/v2/statements`

pub mod http;
pub mod rest;

pub use http::{HttpClientConfig, SnowflakeHttpClient};
pub use rest::RestClient;

use crate::error::Result;
use crate::types::{RawRowSet, StatementRequestBody, StatementResponseBody};
use async_trait::async_trait;

/// Outcome of a submission or status poll.
#[derive(Debug, Clone)]
pub enum StatementOutcome {
    /// Terminal response carrying metadata and the first partition.
    Complete(StatementResponseBody),
    /// Statement still executing; poll by handle.
    Pending { handle: String },
}

impl StatementOutcome {
    /// The statement handle, wherever the response carried one.
    pub fn statement_handle(&self) -> Option<&str> {
        match self {
            StatementOutcome::Complete(body) => body.statement_handle.as_deref(),
            StatementOutcome::Pending { handle } => Some(handle),
        }
    }
}

/// Abstract interface over the statements endpoints.
///
/// The executor drives submission and polling through this trait, and the
/// result reader uses it as the partition fetcher; tests substitute an
/// in-memory scripted implementation.
#[async_trait]
pub trait StatementsApi: Send + Sync + std::fmt::Debug {
    /// Submit a statement for execution.
    ///
    /// `request_id` is a fresh client-generated identifier the server uses
    /// for at-most-once semantics on retried submissions.
    async fn submit_statement(
        &self,
        request_id: &str,
        body: &StatementRequestBody,
    ) -> Result<StatementOutcome>;

    /// Poll an in-flight statement by handle.
    async fn get_statement_status(&self, handle: &str) -> Result<StatementOutcome>;

    /// Fetch one numbered partition of a completed statement's result.
    ///
    /// Any failure is hard: partition fetches are not subject to the
    /// polling policy and are never retried.
    async fn fetch_partition(&self, handle: &str, partition: usize) -> Result<RawRowSet>;

    /// Cancel an in-flight statement.
    async fn cancel_statement(&self, handle: &str) -> Result<()>;
}
