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

//! REST implementation of the [`StatementsApi`] trait.
//!
//! Maps the `/api/v2/statements` endpoints onto the unified
//! [`StatementOutcome`] view and the crate error taxonomy:
//! 401/403 → authentication, 422 → query error with the server's
//! diagnostics, any other non-success → statement error. A 202 (or an
//! async-in-progress code in a 200 body) is a pending outcome.

use crate::client::{SnowflakeHttpClient, StatementOutcome, StatementsApi};
use crate::error::{Error, Result};
use crate::types::{RawRowSet, StatementRequestBody, StatementResponseBody};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use tracing::debug;

/// Client for the Snowflake SQL REST API statements endpoints.
#[derive(Debug)]
pub struct RestClient {
    http: Arc<SnowflakeHttpClient>,
    host: String,
}

impl RestClient {
    /// Create a client for `host` (e.g.
    /// `https://myaccount.snowflakecomputing.com`).
    pub fn new(http: Arc<SnowflakeHttpClient>, host: impl Into<String>) -> Self {
        Self {
            http,
            host: host.into(),
        }
    }

    /// Base URL of the statements resource.
    fn statements_url(&self) -> String {
        format!("{}/api/v2/statements", self.host.trim_end_matches('/'))
    }

    /// Interpret a response's status and body per the error taxonomy.
    fn interpret(status: StatusCode, body: &str) -> Result<StatementOutcome> {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Authentication(
                format!("request rejected (HTTP {}): {}", status.as_u16(), body.trim()),
            )),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let parsed: StatementResponseBody =
                    serde_json::from_str(body).unwrap_or_default();
                Err(Error::Query {
                    message: parsed
                        .message
                        .unwrap_or_else(|| body.trim().to_string()),
                    code: parsed.code.unwrap_or_default(),
                    sql_state: parsed.sql_state.unwrap_or_default(),
                    statement_handle: parsed.statement_handle,
                    sql: None,
                    bindings: Vec::new(),
                })
            }
            status if status.is_success() => {
                let parsed: StatementResponseBody =
                    serde_json::from_str(body).map_err(|e| Error::Statement {
                        status: Some(status.as_u16()),
                        message: format!("failed to parse response: {e} - body: {body}"),
                    })?;

                if status == StatusCode::ACCEPTED || parsed.is_pending() {
                    let handle = parsed.statement_handle.ok_or_else(|| Error::Statement {
                        status: Some(status.as_u16()),
                        message: "pending response carries no statement handle".to_string(),
                    })?;
                    Ok(StatementOutcome::Pending { handle })
                } else {
                    Ok(StatementOutcome::Complete(parsed))
                }
            }
            other => Err(Error::Statement {
                status: Some(other.as_u16()),
                message: body.trim().to_string(),
            }),
        }
    }
}

#[async_trait]
impl StatementsApi for RestClient {
    async fn submit_statement(
        &self,
        request_id: &str,
        body: &StatementRequestBody,
    ) -> Result<StatementOutcome> {
        let url = self.statements_url();

        debug!("Submitting statement at {} (requestId {})", url, request_id);

        let response = self
            .http
            .request(Method::POST, &url)
            .await?
            .query(&[("requestId", request_id)])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let outcome = Self::interpret(status, &text)?;

        debug!(
            "Submit response: HTTP {}, handle={:?}",
            status.as_u16(),
            outcome.statement_handle()
        );

        Ok(outcome)
    }

    async fn get_statement_status(&self, handle: &str) -> Result<StatementOutcome> {
        let url = format!("{}/{}", self.statements_url(), handle);

        debug!("Polling statement status at {}", url);

        let response = self.http.request(Method::GET, &url).await?.send().await?;

        let status = response.status();
        let text = response.text().await?;
        Self::interpret(status, &text)
    }

    async fn fetch_partition(&self, handle: &str, partition: usize) -> Result<RawRowSet> {
        let url = format!("{}/{}", self.statements_url(), handle);

        debug!("Fetching partition {} at {}", partition, url);

        let response = self
            .http
            .request(Method::GET, &url)
            .await?
            .query(&[("partition", partition)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication(format!(
                "partition fetch rejected (HTTP {}): {}",
                status.as_u16(),
                text.trim()
            )));
        }
        if !status.is_success() {
            return Err(Error::Statement {
                status: Some(status.as_u16()),
                message: format!("partition {partition} fetch failed: {}", text.trim()),
            });
        }

        let parsed: StatementResponseBody =
            serde_json::from_str(&text).map_err(|e| Error::Statement {
                status: Some(status.as_u16()),
                message: format!("failed to parse partition response: {e}"),
            })?;

        Ok(parsed.data.unwrap_or_default())
    }

    async fn cancel_statement(&self, handle: &str) -> Result<()> {
        let url = format!("{}/{}/cancel", self.statements_url(), handle);

        debug!("Canceling statement at {}", url);

        let response = self.http.request(Method::POST, &url).await?.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Statement {
                status: Some(status.as_u16()),
                message: format!("cancel failed: {}", text.trim()),
            });
        }

        debug!("Canceled statement: {}", handle);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CredentialProvider, TokenType};
    use crate::client::HttpClientConfig;

    #[derive(Debug)]
    struct FixedToken;

    #[async_trait]
    impl CredentialProvider for FixedToken {
        fn token_type(&self) -> TokenType {
            TokenType::KeyPairJwt
        }

        async fn get_token(&self) -> Result<String> {
            Ok("test-token".to_string())
        }

        async fn refresh(&self) -> Result<()> {
            Ok(())
        }

        async fn is_valid(&self) -> bool {
            true
        }
    }

    fn test_client(host: &str) -> RestClient {
        let http = Arc::new(
            SnowflakeHttpClient::new(HttpClientConfig::default(), Arc::new(FixedToken)).unwrap(),
        );
        RestClient::new(http, host)
    }

    #[test]
    fn test_statements_url() {
        let client = test_client("https://acme.snowflakecomputing.com");
        assert_eq!(
            client.statements_url(),
            "https://acme.snowflakecomputing.com/api/v2/statements"
        );
    }

    #[test]
    fn test_statements_url_strips_trailing_slash() {
        let client = test_client("https://acme.snowflakecomputing.com/");
        assert_eq!(
            client.statements_url(),
            "https://acme.snowflakecomputing.com/api/v2/statements"
        );
    }

    #[test]
    fn test_interpret_inline_result() {
        let body = r#"{"statementHandle": "h1", "code": "090001", "data": [["1"]]}"#;
        let outcome = RestClient::interpret(StatusCode::OK, body).unwrap();
        assert!(matches!(outcome, StatementOutcome::Complete(_)));
    }

    #[test]
    fn test_interpret_accepted_is_pending() {
        let body = r#"{"statementHandle": "h1", "code": "333334"}"#;
        let outcome = RestClient::interpret(StatusCode::ACCEPTED, body).unwrap();
        match outcome {
            StatementOutcome::Pending { handle } => assert_eq!(handle, "h1"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_interpret_pending_code_in_ok_body() {
        let body = r#"{"statementHandle": "h2", "code": "333333"}"#;
        let outcome = RestClient::interpret(StatusCode::OK, body).unwrap();
        assert!(matches!(outcome, StatementOutcome::Pending { .. }));
    }

    #[test]
    fn test_interpret_auth_failures() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = RestClient::interpret(status, "denied").unwrap_err();
            assert!(matches!(err, Error::Authentication(_)), "status {status}");
        }
    }

    #[test]
    fn test_interpret_query_error_carries_diagnostics() {
        let body = r#"{
            "message": "SQL compilation error: Object 'T' does not exist.",
            "code": "002003",
            "sqlState": "42S02",
            "statementHandle": "h3"
        }"#;
        let err = RestClient::interpret(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap_err();
        match err {
            Error::Query {
                message,
                code,
                sql_state,
                statement_handle,
                ..
            } => {
                assert!(message.contains("does not exist"));
                assert_eq!(code, "002003");
                assert_eq!(sql_state, "42S02");
                assert_eq!(statement_handle.as_deref(), Some("h3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_interpret_other_failures_are_statement_errors() {
        let err = RestClient::interpret(StatusCode::SERVICE_UNAVAILABLE, "try later").unwrap_err();
        match err {
            Error::Statement { status, message } => {
                assert_eq!(status, Some(503));
                assert_eq!(message, "try later");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_interpret_pending_without_handle_is_an_error() {
        let err = RestClient::interpret(StatusCode::ACCEPTED, "{}").unwrap_err();
        assert!(matches!(err, Error::Statement { .. }));
    }

    #[test]
    fn test_interpret_unparseable_success_body() {
        let err = RestClient::interpret(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, Error::Statement { .. }));
    }
}
