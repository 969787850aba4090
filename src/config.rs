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

//! Driver configuration and wiring.
//!
//! [`SnowflakeConfig`] holds everything needed to talk to one account:
//! the account identifier (or an explicit host override), the
//! authentication method, the default execution context, and the HTTP
//! and polling knobs. [`SnowflakeConfig::build`] wires it into a ready
//! [`StatementExecutor`], selecting the credential variant exactly once.

use crate::auth::{
    CredentialProvider, KeyMaterial, KeyPairConfig, KeyPairProvider, OAuthConfig, OAuthProvider,
};
use crate::client::{HttpClientConfig, RestClient, SnowflakeHttpClient};
use crate::error::Result;
use crate::executor::{ExecutorConfig, StatementExecutor};
use crate::types::StatementContext;
use std::sync::Arc;
use std::time::Duration;

/// Authentication method, selected once at construction.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Key-pair (signed JWT) authentication for `user`.
    KeyPair {
        user: String,
        key: KeyMaterial,
        passphrase: Option<String>,
    },
    /// OAuth bearer tokens from a token endpoint.
    OAuth(OAuthConfig),
}

/// Configuration for one Snowflake account connection.
#[derive(Debug, Clone)]
pub struct SnowflakeConfig {
    /// Account identifier (e.g. `xy12345.eu-west-1`).
    pub account: String,
    /// Explicit base URL; when unset the host is derived from the
    /// account identifier.
    pub host: Option<String>,
    pub auth: AuthConfig,
    /// Default execution context for statements.
    pub context: StatementContext,
    pub http: HttpClientConfig,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl SnowflakeConfig {
    /// Configuration with default HTTP and polling settings.
    pub fn new(account: impl Into<String>, auth: AuthConfig) -> Self {
        let executor = ExecutorConfig::default();
        Self {
            account: account.into(),
            host: None,
            auth,
            context: StatementContext::default(),
            http: HttpClientConfig::default(),
            poll_interval: executor.poll_interval,
            max_poll_attempts: executor.max_poll_attempts,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.context.database = Some(database.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.context.schema = Some(schema.into());
        self
    }

    pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.context.warehouse = Some(warehouse.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.context.role = Some(role.into());
        self
    }

    pub fn with_session_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.context.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    /// The base URL requests are sent to.
    pub fn host_url(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| format!("https://{}.snowflakecomputing.com", self.account))
    }

    /// The default execution context.
    pub fn context(&self) -> StatementContext {
        self.context.clone()
    }

    /// Wire this configuration into an executor.
    ///
    /// Key material is loaded and validated here, so a misconfigured
    /// key-pair fails before any statement is submitted.
    pub fn build(&self) -> Result<StatementExecutor> {
        let credentials: Arc<dyn CredentialProvider> = match &self.auth {
            AuthConfig::KeyPair {
                user,
                key,
                passphrase,
            } => Arc::new(KeyPairProvider::new(&KeyPairConfig {
                account: self.account.clone(),
                user: user.clone(),
                key: key.clone(),
                passphrase: passphrase.clone(),
            })?),
            AuthConfig::OAuth(config) => Arc::new(OAuthProvider::new(config.clone())?),
        };

        let http = Arc::new(SnowflakeHttpClient::new(self.http.clone(), credentials)?);
        let client = Arc::new(RestClient::new(http, self.host_url()));

        Ok(StatementExecutor::new(
            client,
            ExecutorConfig {
                poll_interval: self.poll_interval,
                max_poll_attempts: self.max_poll_attempts,
                cancellation: None,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth_config() -> SnowflakeConfig {
        SnowflakeConfig::new(
            "acme.eu-west-1",
            AuthConfig::OAuth(OAuthConfig {
                token_url: "https://login.example.com/oauth/token".to_string(),
                client_id: "cid".to_string(),
                client_secret: "secret".to_string(),
                scope: None,
                refresh_token: None,
            }),
        )
    }

    #[test]
    fn test_host_derived_from_account() {
        assert_eq!(
            oauth_config().host_url(),
            "https://acme.eu-west-1.snowflakecomputing.com"
        );
    }

    #[test]
    fn test_host_override_wins() {
        let config = oauth_config().with_host("https://private-link.example.com");
        assert_eq!(config.host_url(), "https://private-link.example.com");
    }

    #[test]
    fn test_builder_populates_context() {
        let config = oauth_config()
            .with_database("DB")
            .with_schema("PUBLIC")
            .with_warehouse("WH")
            .with_role("ANALYST")
            .with_session_parameter("QUERY_TAG", "etl");

        let ctx = config.context();
        assert_eq!(ctx.database.as_deref(), Some("DB"));
        assert_eq!(ctx.schema.as_deref(), Some("PUBLIC"));
        assert_eq!(ctx.warehouse.as_deref(), Some("WH"));
        assert_eq!(ctx.role.as_deref(), Some("ANALYST"));
        assert_eq!(ctx.parameters.get("QUERY_TAG").map(String::as_str), Some("etl"));
    }

    #[test]
    fn test_build_with_oauth_succeeds_without_network() {
        // Token grants are lazy; wiring must not touch the endpoint.
        assert!(oauth_config().build().is_ok());
    }

    #[test]
    fn test_build_with_bad_key_fails_eagerly() {
        let config = SnowflakeConfig::new(
            "acme",
            AuthConfig::KeyPair {
                user: "bob".to_string(),
                key: KeyMaterial::Pem("garbage".to_string()),
                passphrase: None,
            },
        );
        assert!(config.build().is_err());
    }
}
