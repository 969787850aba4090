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

//! Credential providers for the Snowflake SQL REST API.
//!
//! Two authentication methods share one contract:
//! - [`KeyPairProvider`]: signs short-lived RS256 JWTs with an RSA private
//!   key registered for the user.
//! - [`OAuthProvider`]: obtains bearer tokens from an OAuth token endpoint
//!   via refresh-token or client-credentials grants.
//!
//! Each provider owns a private token cache and replaces it wholesale on
//! refresh. A cached token is never returned once it is within
//! [`REFRESH_BUFFER_SECS`] of its expiry, so a request can't be sent with
//! a token that might expire mid-flight. Refreshes are serialized by the
//! provider's own mutex; concurrent callers wait instead of refreshing
//! twice.

pub mod keypair;
pub mod oauth;

pub use keypair::{KeyMaterial, KeyPairConfig, KeyPairProvider};
pub use oauth::{OAuthConfig, OAuthProvider};

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

/// Safety margin subtracted from a token's true expiry.
pub const REFRESH_BUFFER_SECS: i64 = 300;

/// Discriminator forwarded in the `X-Snowflake-Authorization-Token-Type`
/// header so the server knows how to validate the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    KeyPairJwt,
    OAuth,
}

impl TokenType {
    /// Wire value for the token-type header.
    pub fn header_value(self) -> &'static str {
        match self {
            TokenType::KeyPairJwt => "KEYPAIR_JWT",
            TokenType::OAuth => "OAUTH",
        }
    }
}

/// A cached bearer token and its expiry instant.
///
/// Owned exclusively by the provider that minted it; replaced wholesale on
/// every refresh, never mutated in place.
#[derive(Debug, Clone)]
pub struct Credential {
    pub(crate) token: String,
    pub(crate) expires_at: DateTime<Utc>,
}

impl Credential {
    /// Whether this credential may still be handed out at `now`.
    pub(crate) fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at - TimeDelta::seconds(REFRESH_BUFFER_SECS)
    }
}

/// Source of bearer tokens for API requests.
///
/// `get_token` is cheap to call repeatedly: it refreshes only when the
/// cached credential is no longer valid.
#[async_trait]
pub trait CredentialProvider: Send + Sync + std::fmt::Debug {
    /// Which authentication method this provider implements.
    fn token_type(&self) -> TokenType;

    /// Return a valid bearer token, refreshing first if needed.
    async fn get_token(&self) -> Result<String>;

    /// Unconditionally mint a new credential, replacing the cache.
    async fn refresh(&self) -> Result<()>;

    /// Whether the cached credential is still usable (expiry minus the
    /// refresh buffer has not been reached).
    async fn is_valid(&self) -> bool;
}
