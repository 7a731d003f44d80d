// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::*;
use crate::jwt::{encode, Claims};
use crate::{JwsAlgorithm, Token};
use async_trait::async_trait;
use bytes::Bytes;
use cloudsign_core::time::{now, DateTime};
use cloudsign_core::utils::Redact;
use cloudsign_core::{Context, Error, ProvideCredential, Result};
use http::header;
use log::debug;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// JwtBearerCredentialProvider exchanges a signed JWT assertion for an
/// access token.
///
/// See [RFC 7523](https://www.rfc-editor.org/rfc/rfc7523).
#[derive(Clone)]
pub struct JwtBearerCredentialProvider {
    token_endpoint: String,
    issuer: String,
    scope: String,
    audience: Option<String>,
    subject: Option<String>,
    algorithm: JwsAlgorithm,
    key: Vec<u8>,
    lifetime: Duration,

    time: Option<DateTime>,
}

impl Debug for JwtBearerCredentialProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtBearerCredentialProvider")
            .field("token_endpoint", &self.token_endpoint)
            .field("issuer", &self.issuer)
            .field("scope", &self.scope)
            .field("audience", &self.audience)
            .field("subject", &self.subject)
            .field("algorithm", &self.algorithm)
            .field("key", &Redact::from(&String::from_utf8_lossy(&self.key).to_string()))
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl JwtBearerCredentialProvider {
    /// Create a provider posting assertions signed with `key` to `token_endpoint`.
    pub fn new(
        token_endpoint: &str,
        issuer: &str,
        algorithm: JwsAlgorithm,
        key: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            token_endpoint: token_endpoint.to_string(),
            issuer: issuer.to_string(),
            scope: String::new(),
            audience: None,
            subject: None,
            algorithm,
            key: key.into(),
            lifetime: DEFAULT_ASSERTION_LIFETIME,
            time: None,
        }
    }

    /// Set the requested scope.
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    /// Set the audience, defaults to the token endpoint.
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.audience = Some(audience.to_string());
        self
    }

    /// Set the subject to impersonate.
    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the assertion lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Specify the assertion issue time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign assertions.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Build the signed assertion.
    pub fn assertion(&self, issued_at: DateTime) -> Result<String> {
        let audience = self.audience.as_deref().unwrap_or(&self.token_endpoint);
        let mut claims = Claims::new(
            &self.issuer,
            &self.scope,
            audience,
            issued_at,
            self.lifetime,
        );
        if let Some(subject) = &self.subject {
            claims = claims.with_subject(subject);
        }
        encode(self.algorithm, &claims, &self.key)
    }
}

#[async_trait]
impl ProvideCredential for JwtBearerCredentialProvider {
    type Credential = Token;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let issued_at = self.time.unwrap_or_else(now);
        let assertion = self.assertion(issued_at)?;
        debug!(
            "exchanging {} assertion of {} at {}",
            self.algorithm, self.issuer, self.token_endpoint
        );

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", JWT_BEARER_GRANT_TYPE)
            .append_pair("assertion", &assertion)
            .finish();
        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&self.token_endpoint)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(header::ACCEPT, "application/json")
            .body(Bytes::from(body))?;

        let resp = ctx.http_send(req).await?;
        if !resp.status().is_success() {
            let body = String::from_utf8_lossy(resp.body());
            return Err(Error::credential_invalid(format!(
                "token endpoint rejected assertion with status {}: {}",
                resp.status(),
                body
            )));
        }

        let token: TokenResponse = serde_json::from_slice(resp.body()).map_err(|e| {
            Error::unexpected("failed to parse token response").with_source(e)
        })?;

        Ok(Some(Token {
            access_token: token.access_token,
            token_type: token.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_in: token
                .expires_in
                .map(|secs| issued_at + chrono::TimeDelta::seconds(secs as i64)),
        }))
    }
}
