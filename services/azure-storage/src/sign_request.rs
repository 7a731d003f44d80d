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
use crate::{Credential, SigningMode};
use async_trait::async_trait;
use cloudsign_core::hash::{base64_decode, base64_encode, base64_hmac_sha256};
use cloudsign_core::time::{format_http_date, now, DateTime};
use cloudsign_core::{Context, Error, HttpRequest, Result, SignRequest, SigningRequest};
use http::header;
use http::uri::{Authority, Scheme};
use log::debug;
use std::fmt::Write;
use std::str::FromStr;

/// RequestSigner that implements Azure Storage SharedKeyLite and SAS authorization.
///
/// - [Authorize with Shared Key](https://learn.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
/// - [Create a service SAS](https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    mode: SigningMode,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given mode.
    pub fn new(mode: SigningMode) -> Self {
        Self { mode, time: None }
    }

    /// Create a signer whose mode is detected from the credential secret.
    pub fn for_secret(secret: &str) -> Self {
        Self::new(SigningMode::detect(secret))
    }

    /// The signing mode.
    pub fn mode(&self) -> &SigningMode {
        &self.mode
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &HttpRequest,
        credential: Option<&Self::Credential>,
    ) -> Result<HttpRequest> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "azure storage credential is required",
            ));
        };

        let date = format_http_date(self.time.unwrap_or_else(now));

        match &self.mode {
            SigningMode::SharedKeyLite => sign_shared_key_lite(req, cred, &date),
            SigningMode::SharedAccessSignature(token) => {
                sign_shared_access_signature(req, &cred.account_name, token, &date)
            }
        }
    }
}

fn sign_shared_key_lite(req: &HttpRequest, cred: &Credential, date: &str) -> Result<HttpRequest> {
    let dated = req
        .to_builder()
        .replace_header(header::DATE, date)
        .build()?;

    let string_to_sign = string_to_sign(&dated, &cred.account_name)?;
    debug!("calculated string to sign: {string_to_sign}");

    let key = base64_decode(&cred.secret).map_err(|e| {
        Error::credential_invalid("azure storage account key is not valid base64").with_source(e)
    })?;
    let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes())?;

    dated
        .to_builder()
        .replace_sensitive_header(
            header::AUTHORIZATION,
            &format!("SharedKeyLite {}:{}", cred.account_name, signature),
        )
        .build()
}

fn sign_shared_access_signature(
    req: &HttpRequest,
    account_name: &str,
    token: &str,
    date: &str,
) -> Result<HttpRequest> {
    let mut ctx = SigningRequest::build(req)?;

    let path = ctx.path.trim_start_matches('/').to_string();
    let (container, blob) = match path.split_once('/') {
        Some((c, b)) if !b.is_empty() => (c.to_string(), Some(b.to_string())),
        Some((c, _)) => (c.to_string(), None),
        None => (path.clone(), None),
    };
    if container.is_empty() {
        return Err(Error::request_invalid(format!(
            "path {:?} doesn't name a container",
            ctx.path
        )));
    }

    let existing = ctx.query.take().filter(|q| !q.is_empty());
    if blob.is_none()
        && !existing
            .as_deref()
            .is_some_and(|q| form_urlencoded::parse(q.as_bytes()).any(|(k, _)| k == "restype"))
    {
        ctx.query_append("restype=container");
    }
    if let Some(q) = existing {
        ctx.query_append(&q);
    }
    ctx.query_append(token.trim_start_matches('?'));

    ctx.scheme = Scheme::HTTPS;
    ctx.authority = Authority::from_str(&format!("{account_name}.{BLOB_HOST_SUFFIX}"))?;
    ctx.path = match &blob {
        Some(b) => format!("/{container}/{b}"),
        None => format!("/{container}"),
    };

    ctx.headers.remove(header::AUTHORIZATION);
    ctx.headers.insert(header::DATE, date.parse()?);

    ctx.apply(req)
}

/// Build the SharedKeyLite string to sign of a request.
///
/// ```shell
/// VERB
/// Content-MD5
/// Content-Type
/// Date
/// CanonicalizedHeaders
/// CanonicalizedResource
/// ```
pub fn string_to_sign(req: &HttpRequest, account_name: &str) -> Result<String> {
    let ctx = SigningRequest::build(req)?;
    let metadata = req.payload().map(|p| p.metadata());

    let mut s = String::with_capacity(128);

    writeln!(&mut s, "{}", ctx.method.as_str())?;

    let content_md5 = match metadata.and_then(|m| m.content_md5.as_deref()) {
        Some(md5) => base64_encode(md5),
        None => ctx
            .header_get_or_default(&header::HeaderName::from_static("content-md5"))?
            .to_string(),
    };
    writeln!(&mut s, "{content_md5}")?;

    let content_type = match metadata.and_then(|m| m.content_type.as_deref()) {
        Some(v) => v,
        None => ctx.header_get_or_default(&header::CONTENT_TYPE)?,
    };
    writeln!(&mut s, "{content_type}")?;

    for name in FIRST_HEADERS_TO_SIGN.iter() {
        writeln!(&mut s, "{}", ctx.header_get_or_default(name)?)?;
    }

    let headers = ctx.header_to_vec_with_prefix(X_MS_PREFIX)?;
    if !headers.is_empty() {
        writeln!(
            &mut s,
            "{}",
            SigningRequest::header_to_string(headers, ":", "\n")
        )?;
    }

    write!(&mut s, "{}", canonicalize_resource(&ctx, account_name))?;

    Ok(s)
}

/// Canonicalize resource
///
/// ## Format
///
/// ```shell
/// /<account><raw path>[?comp=<value>]
/// ```
fn canonicalize_resource(ctx: &SigningRequest, account_name: &str) -> String {
    match ctx.query_get("comp") {
        Some(comp) => format!("/{}{}?comp={}", account_name, ctx.path, comp),
        None => format!("/{}{}", account_name, ctx.path),
    }
}
