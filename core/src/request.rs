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

use crate::{Payload, Result};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};

/// HttpRequest is an immutable outbound request.
///
/// Signers and retry handlers never modify a request in place: they derive
/// a new one through [`HttpRequest::to_builder`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    endpoint: Uri,
    headers: HeaderMap,
    payload: Option<Payload>,
}

impl HttpRequest {
    /// Start building a new request.
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::new()
    }

    /// Start building a request derived from this one.
    pub fn to_builder(&self) -> HttpRequestBuilder {
        HttpRequestBuilder {
            inner: Ok(self.clone()),
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request endpoint.
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// Header multimap.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Optional payload.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// First value of a header, if present and valid utf-8.
    pub fn first_header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns true if the request can be sent again as-is.
    ///
    /// A request without payload, or with a repeatable payload, is replayable.
    pub fn is_replayable(&self) -> bool {
        self.payload.as_ref().map_or(true, |p| p.is_repeatable())
    }

    /// Convert into `http::Request`, keeping the payload as body.
    pub fn into_http(self) -> Result<http::Request<Option<Payload>>> {
        let mut req = http::Request::builder()
            .method(self.method)
            .uri(self.endpoint)
            .body(self.payload)?;
        *req.headers_mut() = self.headers;
        Ok(req)
    }

    /// Build from an `http::Request` whose body is the payload.
    pub fn from_http(req: http::Request<Option<Payload>>) -> Self {
        let (parts, payload) = req.into_parts();
        Self {
            method: parts.method,
            endpoint: parts.uri,
            headers: parts.headers,
            payload,
        }
    }
}

/// Builder for [`HttpRequest`].
///
/// Errors from invalid header names or values are kept until [`build`](Self::build).
#[derive(Debug)]
pub struct HttpRequestBuilder {
    inner: std::result::Result<HttpRequest, http::Error>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRequestBuilder {
    /// Create a builder for `GET /`.
    pub fn new() -> Self {
        Self {
            inner: Ok(HttpRequest {
                method: Method::GET,
                endpoint: Uri::from_static("/"),
                headers: HeaderMap::new(),
                payload: None,
            }),
        }
    }

    fn and_then(
        self,
        f: impl FnOnce(HttpRequest) -> std::result::Result<HttpRequest, http::Error>,
    ) -> Self {
        Self {
            inner: self.inner.and_then(f),
        }
    }

    /// Set the method.
    pub fn method(self, method: Method) -> Self {
        self.and_then(move |mut req| {
            req.method = method;
            Ok(req)
        })
    }

    /// Set the endpoint.
    pub fn endpoint<T>(self, endpoint: T) -> Self
    where
        Uri: TryFrom<T>,
        <Uri as TryFrom<T>>::Error: Into<http::Error>,
    {
        self.and_then(move |mut req| {
            req.endpoint = Uri::try_from(endpoint).map_err(Into::into)?;
            Ok(req)
        })
    }

    /// Append a header value, keeping existing values.
    pub fn header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.and_then(move |mut req| {
            let name = HeaderName::try_from(key).map_err(Into::into)?;
            let value = HeaderValue::try_from(value).map_err(Into::into)?;
            req.headers.append(name, value);
            Ok(req)
        })
    }

    /// Replace all values of a header.
    pub fn replace_header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.and_then(move |mut req| {
            let name = HeaderName::try_from(key).map_err(Into::into)?;
            let value = HeaderValue::try_from(value).map_err(Into::into)?;
            req.headers.insert(name, value);
            Ok(req)
        })
    }

    /// Replace all values of a header with a value marked sensitive.
    ///
    /// Sensitive values are hidden from `Debug` output.
    pub fn replace_sensitive_header<K>(self, key: K, value: &str) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
    {
        let value = HeaderValue::from_str(value).map(|mut v| {
            v.set_sensitive(true);
            v
        });
        self.and_then(move |mut req| {
            let name = HeaderName::try_from(key).map_err(Into::into)?;
            req.headers.insert(name, value.map_err(http::Error::from)?);
            Ok(req)
        })
    }

    /// Replace the whole header multimap.
    pub fn headers(self, headers: HeaderMap) -> Self {
        self.and_then(move |mut req| {
            req.headers = headers;
            Ok(req)
        })
    }

    /// Remove all values of a header.
    pub fn remove_header(self, key: impl http::header::AsHeaderName) -> Self {
        self.and_then(move |mut req| {
            req.headers.remove(key);
            Ok(req)
        })
    }

    /// Set the payload.
    pub fn payload(self, payload: impl Into<Payload>) -> Self {
        let payload = payload.into();
        self.and_then(move |mut req| {
            req.payload = Some(payload);
            Ok(req)
        })
    }

    /// Build the request.
    pub fn build(self) -> Result<HttpRequest> {
        Ok(self.inner?)
    }
}
