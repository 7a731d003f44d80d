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

//! JWT assertion encoding.

use crate::JwsAlgorithm;
use cloudsign_core::hash::{base64url_encode, hmac_sha256, hmac_sha384, hmac_sha512};
use cloudsign_core::time::DateTime;
use cloudsign_core::{Error, Result};
use rand::thread_rng;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

/// Claims of a JWT-bearer assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, usually the client or service account id.
    pub iss: String,
    /// Space separated scopes requested.
    pub scope: String,
    /// Audience, usually the token endpoint.
    pub aud: String,
    /// Expiration time in unix seconds.
    pub exp: i64,
    /// Issued at time in unix seconds.
    pub iat: i64,
    /// Subject to impersonate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl Claims {
    /// Build claims issued at `issued_at` and valid for `lifetime`.
    pub fn new(
        issuer: &str,
        scope: &str,
        audience: &str,
        issued_at: DateTime,
        lifetime: Duration,
    ) -> Self {
        let iat = issued_at.timestamp();
        Claims {
            iss: issuer.to_string(),
            scope: scope.to_string(),
            aud: audience.to_string(),
            exp: iat.saturating_add(lifetime.as_secs() as i64),
            iat,
            sub: None,
        }
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: &str) -> Self {
        self.sub = Some(subject.to_string());
        self
    }
}

/// Encode and sign a JWT.
///
/// HMAC keys are raw bytes and RSA keys are PKCS#8 PEM. The output is
/// `base64url(header).base64url(claims).base64url(signature)` without
/// padding.
pub fn encode(algorithm: JwsAlgorithm, claims: &Claims, key: &[u8]) -> Result<String> {
    let header = Header {
        alg: algorithm.name(),
        typ: "JWT",
    };
    let header = serde_json::to_vec(&header)
        .map_err(|e| Error::unexpected("failed to serialize jwt header").with_source(e))?;
    let claims = serde_json::to_vec(claims)
        .map_err(|e| Error::unexpected("failed to serialize jwt claims").with_source(e))?;

    let signing_input = format!("{}.{}", base64url_encode(&header), base64url_encode(&claims));
    let signature = sign(algorithm, key, signing_input.as_bytes())?;

    Ok(format!("{signing_input}.{}", base64url_encode(&signature)))
}

/// Compute the raw JWS signature of `content`.
pub fn sign(algorithm: JwsAlgorithm, key: &[u8], content: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        JwsAlgorithm::None => Ok(Vec::new()),
        JwsAlgorithm::HS256 => hmac_sha256(key, content),
        JwsAlgorithm::HS384 => hmac_sha384(key, content),
        JwsAlgorithm::HS512 => hmac_sha512(key, content),
        JwsAlgorithm::RS256 | JwsAlgorithm::RS384 | JwsAlgorithm::RS512 => {
            let private_key = parse_private_key(key)?;
            let mut rng = thread_rng();
            let signature = match algorithm {
                JwsAlgorithm::RS384 => SigningKey::<Sha384>::new(private_key)
                    .sign_with_rng(&mut rng, content)
                    .to_bytes(),
                JwsAlgorithm::RS512 => SigningKey::<Sha512>::new(private_key)
                    .sign_with_rng(&mut rng, content)
                    .to_bytes(),
                _ => SigningKey::<Sha256>::new(private_key)
                    .sign_with_rng(&mut rng, content)
                    .to_bytes(),
            };
            Ok(signature.into_vec())
        }
    }
}

fn parse_private_key(key: &[u8]) -> Result<RsaPrivateKey> {
    let pem = std::str::from_utf8(key).map_err(|e| {
        Error::credential_invalid("rsa private key is not utf-8 pem").with_source(e)
    })?;
    RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| {
        Error::credential_invalid("failed to parse rsa private key")
            .with_source(anyhow::anyhow!("{e}"))
    })
}
