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

//! Snowflake SQL REST API driver for Rust
//!
//! This crate runs SQL statements against Snowflake through the stateless
//! HTTPS statements API (`/api/v2/statements`) and makes it behave like a
//! synchronous database connection.
//!
//! ## Overview
//!
//! - [`StatementExecutor`] - submits a statement, interprets immediate
//!   vs. asynchronous completion, drives the polling loop, and exposes
//!   best-effort cancellation
//! - [`QueryResult`] - lazy, forward-only reader over the result's
//!   numbered partitions, decoding each row against the column metadata
//! - [`codec`] - decodes wire scalars by declared column type and encodes
//!   bind values as injection-safe SQL literals (the API has no native
//!   parameter binding)
//! - [`auth`] - key-pair (signed JWT) and OAuth credential providers
//!   behind one trait, each caching its token and refreshing before expiry
//!
//! ## Example
//!
//! ```ignore
//! use snowflake_rest::{AuthConfig, KeyMaterial, SnowflakeConfig, Value};
//!
//! #[tokio::main]
//! async fn main() -> snowflake_rest::Result<()> {
//!     let config = SnowflakeConfig::new(
//!         "xy12345.eu-west-1",
//!         AuthConfig::KeyPair {
//!             user: "APP_USER".into(),
//!             key: KeyMaterial::Path("/secrets/rsa_key.p8".into()),
//!             passphrase: None,
//!         },
//!     )
//!     .with_database("ANALYTICS")
//!     .with_warehouse("REPORTING_WH");
//!
//!     let executor = config.build()?;
//!     let mut result = executor
//!         .execute(
//!             "SELECT id, name FROM users WHERE id = ?",
//!             &[Value::Int(42)],
//!             &config.context(),
//!         )
//!         .await?;
//!
//!     while let Some(row) = result.next_row().await? {
//!         println!("{:?}", row.get("NAME"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `host` | derived from account | Base URL override (e.g. PrivateLink) |
//! | `poll_interval` | 500 ms | Interval between completion polls |
//! | `max_poll_attempts` | 7200 | Poll budget before timeout + cancel |
//! | `http.connect_timeout` | 30 s | Connection establishment timeout |
//!
//! Statement requests deliberately carry no client-side read timeout: the
//! server owns the statement-level timeout, and the poll budget bounds
//! the overall wait.
//!
//! ## Capability notes
//!
//! The remote system has no native wire protocol, no true savepoints, and
//! no row locks; this driver surfaces the statements API as-is and does
//! not emulate transactional storage-engine semantics on top of it.

pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod reader;
pub mod types;

// Re-export main types
pub use codec::Value;
pub use config::{AuthConfig, SnowflakeConfig};
pub use error::{Error, Result};
pub use executor::{ExecutorConfig, StatementExecutor};
pub use logging::{init_logging, LogConfig};
pub use reader::{QueryResult, Row};
pub use types::{ColumnMeta, StatementContext};

// Re-export client and auth types for advanced users
pub use auth::{CredentialProvider, KeyMaterial, KeyPairProvider, OAuthConfig, OAuthProvider, TokenType};
pub use client::{HttpClientConfig, RestClient, SnowflakeHttpClient, StatementsApi};
