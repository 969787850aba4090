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

//! Lazy reader over a statement's partitioned result.
//!
//! A completed statement delivers column metadata, the first partition of
//! rows inline, and descriptors for the remaining partitions. The reader
//! walks partitions 0..N-1 in order, exactly once each, fetching each
//! subsequent partition through the client only when the previous one is
//! drained — at most one partition's rows are resident. Rows are decoded
//! at yield time and never cached behind the cursor; re-reading a result
//! requires re-running the query.

pub mod row;

pub use row::Row;

use crate::client::StatementsApi;
use crate::error::{Error, Result};
use crate::types::{ColumnMeta, RawRowSet, StatementResponseBody};
use futures::Stream;
use std::sync::Arc;
use tracing::debug;

/// Result of a successfully executed statement.
///
/// Exposes the result shape (`row_count`, `columns`, `statement_handle`)
/// and a forward-only, single-pass row cursor.
pub struct QueryResult {
    handle: String,
    columns: Arc<Vec<ColumnMeta>>,
    num_rows: u64,
    partition_count: usize,
    client: Arc<dyn StatementsApi>,
    current: std::vec::IntoIter<Vec<Option<String>>>,
    next_partition: usize,
}

impl std::fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResult")
            .field("handle", &self.handle)
            .field("num_rows", &self.num_rows)
            .field("partition_count", &self.partition_count)
            .field("next_partition", &self.next_partition)
            .finish()
    }
}

impl QueryResult {
    /// Assemble a result from a terminal response body.
    pub(crate) fn new(
        body: StatementResponseBody,
        client: Arc<dyn StatementsApi>,
    ) -> Result<Self> {
        let handle = body
            .statement_handle
            .ok_or_else(|| Error::statement("terminal response carries no statement handle"))?;
        let meta = body
            .result_set_meta_data
            .ok_or_else(|| Error::statement("terminal response carries no result set metadata"))?;
        let first_partition: RawRowSet = body.data.unwrap_or_default();

        // The first partition always exists (it may be empty); further
        // partitions only when the metadata describes them.
        let partition_count = meta.partition_info.len().max(1);

        debug!(
            "Result ready: handle={}, rows={}, partitions={}",
            handle, meta.num_rows, partition_count
        );

        Ok(Self {
            handle,
            columns: Arc::new(meta.row_type),
            num_rows: meta.num_rows,
            partition_count,
            client,
            current: first_partition.into_iter(),
            next_partition: 1,
        })
    }

    /// Total number of rows across all partitions.
    pub fn row_count(&self) -> u64 {
        self.num_rows
    }

    /// Column metadata, in result order.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Number of partitions the result was delivered in.
    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    /// Handle of the statement that produced this result.
    pub fn statement_handle(&self) -> &str {
        &self.handle
    }

    /// Yield the next decoded row, fetching the next partition when the
    /// current one is drained. `None` once every partition is exhausted.
    pub async fn next_row(&mut self) -> Result<Option<Row>> {
        loop {
            if let Some(raw) = self.current.next() {
                return Ok(Some(Row::decode(Arc::clone(&self.columns), raw)));
            }
            if self.next_partition >= self.partition_count {
                return Ok(None);
            }

            let index = self.next_partition;
            debug!(
                "Fetching partition {}/{} for {}",
                index, self.partition_count, self.handle
            );
            let rows = self.client.fetch_partition(&self.handle, index).await?;
            self.next_partition += 1;
            self.current = rows.into_iter();
        }
    }

    /// Drain the cursor into an eager vector.
    pub async fn collect_rows(mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::with_capacity(self.num_rows.min(u64::from(u32::MAX)) as usize);
        while let Some(row) = self.next_row().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Adapt the cursor into a `futures` stream of rows.
    pub fn into_stream(self) -> impl Stream<Item = Result<Row>> {
        futures::stream::try_unfold(self, |mut result| async move {
            let row = result.next_row().await?;
            Ok(row.map(|row| (row, result)))
        })
    }
}
