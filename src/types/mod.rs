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

//! Request/response types for the Snowflake SQL REST API.
//!
//! These types map directly to the JSON structures exchanged with
//! `/api/v2/statements`. They are primarily used by `RestClient`; the
//! executor and reader consume them through the unified
//! [`crate::client::StatementOutcome`] view.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw row data as delivered on the wire: one entry per row, one optional
/// string per column. `None` is SQL NULL.
pub type RawRowSet = Vec<Vec<Option<String>>>;

/// Execution context attached to every statement submission.
///
/// All fields are optional; the server falls back to the user's defaults
/// for anything unset.
#[derive(Debug, Clone, Default)]
pub struct StatementContext {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub warehouse: Option<String>,
    pub role: Option<String>,
    /// Session parameters forwarded verbatim (e.g. `QUERY_TAG`).
    pub parameters: HashMap<String, String>,
}

/// Request body for `POST /api/v2/statements`.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRequestBody {
    pub statement: String,
    /// Statement-level timeout in seconds, owned by the server. `None`
    /// leaves the server default in place; the client never enforces one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, String>,
}

impl StatementRequestBody {
    /// Build a request body for `statement` within `context`.
    pub fn new(statement: impl Into<String>, context: &StatementContext) -> Self {
        Self {
            statement: statement.into(),
            timeout: None,
            database: context.database.clone(),
            schema: context.schema.clone(),
            warehouse: context.warehouse.clone(),
            role: context.role.clone(),
            parameters: context.parameters.clone(),
        }
    }
}

/// Response body for statement submission and status polling.
///
/// The same shape is returned by `POST /api/v2/statements`,
/// `GET /api/v2/statements/{handle}`, and (with only `data` populated
/// meaningfully) partition fetches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponseBody {
    #[serde(default)]
    pub statement_handle: Option<String>,
    #[serde(default)]
    pub statement_status_url: Option<String>,
    /// Snowflake status code, e.g. `"090001"` (success) or `"333334"`
    /// (asynchronous execution in progress).
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sql_state: Option<String>,
    #[serde(default)]
    pub result_set_meta_data: Option<ResultSetMetaData>,
    /// Row data for the first (or requested) partition.
    #[serde(default)]
    pub data: Option<RawRowSet>,
}

/// Statement executed successfully.
pub const CODE_SUCCESS: &str = "090001";
/// Asynchronous execution: statement queued.
pub const CODE_ASYNC_QUEUED: &str = "333333";
/// Asynchronous execution: statement still running.
pub const CODE_ASYNC_RUNNING: &str = "333334";

impl StatementResponseBody {
    /// Whether this body still describes an in-flight statement.
    pub fn is_pending(&self) -> bool {
        matches!(
            self.code.as_deref(),
            Some(CODE_ASYNC_QUEUED) | Some(CODE_ASYNC_RUNNING)
        )
    }

    /// Whether this body is a terminal result: it carries row data or an
    /// explicit success code.
    pub fn is_complete(&self) -> bool {
        self.data.is_some() || self.code.as_deref() == Some(CODE_SUCCESS)
    }
}

/// Result set metadata returned with a terminal response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetMetaData {
    #[serde(default)]
    pub num_rows: u64,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub row_type: Vec<ColumnMeta>,
    #[serde(default)]
    pub partition_info: Vec<PartitionInfo>,
}

/// Declared metadata for a single result column.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMeta {
    pub name: String,
    /// Declared type name, matched case-insensitively by the codec.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub scale: Option<i64>,
    #[serde(default)]
    pub precision: Option<i64>,
    #[serde(default)]
    pub length: Option<i64>,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
}

impl ColumnMeta {
    /// Minimal column metadata, useful in tests and for synthetic results.
    pub fn named(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            scale: None,
            precision: None,
            length: None,
            nullable: None,
            database: None,
            schema: None,
            table: None,
        }
    }
}

/// Descriptor for one numbered result partition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionInfo {
    #[serde(default)]
    pub row_count: u64,
    #[serde(default)]
    pub uncompressed_size: Option<u64>,
    #[serde(default)]
    pub compressed_size: Option<u64>,
}
