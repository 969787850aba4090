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

//! OAuth credential provider.
//!
//! Drives a standard OAuth 2.0 token endpoint: a refresh-token grant when
//! one is held, otherwise a client-credentials grant. Rotated refresh
//! tokens returned by the provider are adopted for subsequent grants.

use crate::auth::{Credential, CredentialProvider, TokenType};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

/// Expiry assumed when the token response omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Configuration for [`OAuthProvider`].
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Token endpoint URL.
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
    /// Initial refresh token, if one was provisioned out of band.
    pub refresh_token: Option<String>,
}

struct OAuthState {
    credential: Option<Credential>,
    refresh_token: Option<String>,
}

/// Credential provider backed by an OAuth token endpoint.
pub struct OAuthProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: Option<String>,
    state: Mutex<OAuthState>,
}

impl std::fmt::Debug for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthProvider")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenGrantResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// RFC 6749 error body.
#[derive(Debug, Deserialize)]
struct TokenGrantError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl OAuthProvider {
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            token_url: config.token_url,
            client_id: config.client_id,
            client_secret: config.client_secret,
            scope: config.scope,
            state: Mutex::new(OAuthState {
                credential: None,
                refresh_token: config.refresh_token,
            }),
        })
    }

    /// Form parameters for the next grant: refresh-token when one is
    /// held, client-credentials otherwise.
    fn grant_params(&self, refresh_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
        ];
        match refresh_token {
            Some(token) => {
                params.push(("grant_type", "refresh_token".to_string()));
                params.push(("refresh_token", token.to_string()));
            }
            None => params.push(("grant_type", "client_credentials".to_string())),
        }
        if let Some(scope) = &self.scope {
            params.push(("scope", scope.clone()));
        }
        params
    }

    /// Perform a grant and replace the cached credential.
    ///
    /// Caller must hold the state lock; that lock is what prevents two
    /// concurrent callers from each performing a grant.
    async fn refresh_locked(&self, state: &mut OAuthState) -> Result<String> {
        let params = self.grant_params(state.refresh_token.as_deref());
        let grant_type = params
            .iter()
            .find(|(k, _)| *k == "grant_type")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();

        debug!("Requesting OAuth token via {} grant", grant_type);

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Authentication(format!("token endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<TokenGrantError>(&body)
                .ok()
                .and_then(|e| match (e.error, e.error_description) {
                    (Some(code), Some(desc)) => Some(format!("{code}: {desc}")),
                    (Some(code), None) => Some(code),
                    (None, Some(desc)) => Some(desc),
                    (None, None) => None,
                })
                .unwrap_or(body);
            return Err(Error::Authentication(format!(
                "token grant failed (HTTP {}): {detail}",
                status.as_u16()
            )));
        }

        let grant: TokenGrantResponse = response
            .json()
            .await
            .map_err(|e| Error::Authentication(format!("malformed token response: {e}")))?;

        let now = Utc::now();
        let expires_in = grant.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        if let Some(rotated) = grant.refresh_token {
            state.refresh_token = Some(rotated);
        }
        state.credential = Some(Credential {
            token: grant.access_token.clone(),
            expires_at: now + TimeDelta::seconds(expires_in as i64),
        });

        debug!("OAuth token obtained, expires in {}s", expires_in);

        Ok(grant.access_token)
    }

    #[cfg(test)]
    pub(crate) async fn expire_cached_token(&self) {
        let mut state = self.state.lock().await;
        if let Some(cred) = state.credential.as_mut() {
            cred.expires_at = Utc::now() - TimeDelta::seconds(1);
        }
    }
}

#[async_trait]
impl CredentialProvider for OAuthProvider {
    fn token_type(&self) -> TokenType {
        TokenType::OAuth
    }

    async fn get_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        if let Some(cred) = state.credential.as_ref() {
            if cred.is_valid_at(Utc::now()) {
                return Ok(cred.token.clone());
            }
        }
        self.refresh_locked(&mut state).await
    }

    async fn refresh(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.refresh_locked(&mut state).await.map(|_| ())
    }

    async fn is_valid(&self) -> bool {
        let state = self.state.lock().await;
        state
            .credential
            .as_ref()
            .map(|cred| cred.is_valid_at(Utc::now()))
            .unwrap_or(false)
    }
}
