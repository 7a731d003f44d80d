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

use crate::{Error, HttpRequest, Result};
use http::header::HeaderName;
use http::uri::{Authority, PathAndQuery, Scheme};
use http::{HeaderMap, Method, Uri};
use std::borrow::Cow;
use std::str::FromStr;

/// Signing context for request.
///
/// Path and query are kept raw, exactly as they appear on the endpoint, so
/// that a signer which doesn't touch them gives them back byte-for-byte.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// Raw HTTP path.
    pub path: String,
    /// Raw HTTP query, without the leading `?`.
    pub query: Option<String>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from a request.
    pub fn build(req: &HttpRequest) -> Result<Self> {
        let uri = req.endpoint().clone().into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: req.method().clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTPS),
            authority: uri
                .authority
                .ok_or_else(|| Error::request_invalid("request without authority is invalid for signing"))?,
            path: paq.path().to_string(),
            query: paq.query().map(|v| v.to_string()),
            headers: req.headers().clone(),
        })
    }

    /// Apply the signing context to a copy of `req`.
    ///
    /// The payload of `req` is carried over untouched.
    pub fn apply(self, req: &HttpRequest) -> Result<HttpRequest> {
        let paq = match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path,
        };

        let uri = Uri::builder()
            .scheme(self.scheme)
            .authority(self.authority)
            .path_and_query(PathAndQuery::from_str(&paq)?)
            .build()?;

        req.to_builder()
            .method(self.method)
            .endpoint(uri)
            .headers(self.headers)
            .build()
    }

    /// Get the path percent decoded.
    pub fn path_percent_decoded(&self) -> Cow<'_, str> {
        percent_encoding::percent_decode_str(&self.path).decode_utf8_lossy()
    }

    /// Parse the query into decoded pairs.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|v| {
                form_urlencoded::parse(v.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the first decoded value of a query parameter.
    pub fn query_get(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Append a raw, already encoded fragment to the query.
    #[inline]
    pub fn query_append(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        self.query = match self.query.take() {
            Some(q) if !q.is_empty() => Some(format!("{q}&{fragment}")),
            _ => Some(fragment.to_string()),
        };
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    /// Get headers with given prefix.
    ///
    /// Names come back lower-cased. Values of a multi-valued header are
    /// joined by `,` after embedded line breaks are stripped from each.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let mut headers = Vec::new();
        for name in self.headers.keys() {
            let name = name.as_str().to_lowercase();
            if !name.starts_with(prefix) {
                continue;
            }

            let mut values = Vec::new();
            for v in self.headers.get_all(name.as_str()) {
                values.push(v.to_str()?.replace("\r\n", "").replace('\n', ""));
            }
            headers.push((name, values.join(",")));
        }

        Ok(headers)
    }

    /// Convert sorted headers to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d"
    /// ```
    pub fn header_to_string(mut headers: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        // Sort via header name.
        headers.sort();

        for (idx, (k, v)) in headers.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }
}
