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

//! Decoded result rows.

use crate::codec::{self, Value};
use crate::types::ColumnMeta;
use std::sync::Arc;

/// One decoded result row.
///
/// Values are ordered as the result's columns are; name lookup is
/// case-insensitive, matching how the server reports column names.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<Vec<ColumnMeta>>,
    values: Vec<Value>,
}

impl Row {
    /// Decode a raw wire row against the shared column metadata.
    pub(crate) fn decode(columns: Arc<Vec<ColumnMeta>>, raw: Vec<Option<String>>) -> Self {
        let values = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                codec::decode(raw.get(i).and_then(|v| v.as_deref()), column)
            })
            .collect();
        Self { columns, values }
    }

    /// Value of the column named `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
    }

    /// Values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consume the row, yielding its values in column order.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Column metadata shared by every row of the result.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }
}
