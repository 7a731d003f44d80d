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

use crate::Token;
use async_trait::async_trait;
use cloudsign_core::{Context, Error, HttpRequest, Result, SignRequest};
use http::header;

/// BearerTokenSigner authorizes requests with `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerTokenSigner;

impl BearerTokenSigner {
    /// Create a new BearerTokenSigner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignRequest for BearerTokenSigner {
    type Credential = Token;

    async fn sign_request(
        &self,
        _: &Context,
        req: &HttpRequest,
        credential: Option<&Self::Credential>,
    ) -> Result<HttpRequest> {
        let Some(token) = credential.filter(|t| !t.access_token.is_empty()) else {
            return Err(Error::credential_invalid("oauth2 access token is required"));
        };

        req.to_builder()
            .replace_sensitive_header(
                header::AUTHORIZATION,
                &format!("Bearer {}", token.access_token),
            )
            .build()
    }
}
