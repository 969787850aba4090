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

//! HTTP client wrapper for the Snowflake SQL REST API.
//!
//! A thin layer over `reqwest` that injects, per request:
//! - `Authorization: Bearer {token}` from the credential provider
//! - the `X-Snowflake-Authorization-Token-Type` discriminator
//! - `Content-Type`/`Accept: application/json`
//! - the crate User-Agent
//!
//! Only connection establishment is bounded by a client-side timeout.
//! Statement requests carry no read timeout — the server owns the
//! statement-level timeout — and nothing here retries: failures propagate
//! to the caller, and the only repetition anywhere is the executor's
//! bounded completion polling.

use crate::auth::CredentialProvider;
use crate::error::Result;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Header naming the authentication method of the bearer token.
pub const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum number of idle connections per host.
    pub max_connections_per_host: usize,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            max_connections_per_host: 16,
            user_agent: format!("snowflake-rest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for communicating with the statements endpoints.
#[derive(Debug)]
pub struct SnowflakeHttpClient {
    client: Client,
    config: HttpClientConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl SnowflakeHttpClient {
    /// Creates a new HTTP client with the given configuration and
    /// credential provider.
    pub fn new(
        config: HttpClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.max_connections_per_host)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Returns the credential provider backing this client.
    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Start a request with authentication and JSON headers applied.
    ///
    /// The bearer token is obtained from the credential provider for every
    /// request, so a refresh that happened between calls is picked up
    /// transparently.
    pub async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.credentials.get_token().await?;

        debug!("Preparing {} {}", method, url);

        Ok(self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(TOKEN_TYPE_HEADER, self.credentials.token_type().header_value())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CredentialProvider, TokenType};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedToken(&'static str);

    #[async_trait]
    impl CredentialProvider for FixedToken {
        fn token_type(&self) -> TokenType {
            TokenType::OAuth
        }

        async fn get_token(&self) -> Result<String> {
            Ok(self.0.to_string())
        }

        async fn refresh(&self) -> Result<()> {
            Ok(())
        }

        async fn is_valid(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_http_client_config_default() {
        let config = HttpClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.max_connections_per_host, 16);
        assert!(config.user_agent.starts_with("snowflake-rest/"));
    }

    #[tokio::test]
    async fn test_request_carries_auth_and_json_headers() {
        let client = SnowflakeHttpClient::new(
            HttpClientConfig::default(),
            Arc::new(FixedToken("test-token")),
        )
        .unwrap();

        let request = client
            .request(Method::POST, "https://acme.snowflakecomputing.com/api/v2/statements")
            .await
            .unwrap()
            .build()
            .unwrap();

        let headers = request.headers();
        assert_eq!(
            headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer test-token"
        );
        assert_eq!(
            headers.get(TOKEN_TYPE_HEADER).unwrap().to_str().unwrap(),
            "OAUTH"
        );
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/json"
        );
        assert_eq!(
            headers.get(ACCEPT).unwrap().to_str().unwrap(),
            "application/json"
        );
    }
}
