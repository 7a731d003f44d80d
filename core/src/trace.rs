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

//! Signature tracing.

use crate::utils::redact_endpoint;
use crate::HttpRequest;
use log::debug;
use std::fmt::Debug;

/// Log target used by [`LogTraceSink`].
pub const SIGNATURE_LOG_TARGET: &str = "cloudsign::signature";

/// TraceSink observes requests around signing.
///
/// Sinks only observe; the request they are given is never the one sent.
pub trait TraceSink: Debug + Send + Sync + 'static {
    /// Called with the request before it is signed.
    fn before_signing(&self, req: &HttpRequest);

    /// Called with the request after it has been signed.
    fn after_signing(&self, req: &HttpRequest);
}

/// LogTraceSink writes traced requests to the `cloudsign::signature` log target.
///
/// Sensitive headers (such as `Authorization`) set by the signers are
/// hidden by the request's `Debug` output, and credential query parameters
/// are masked with [`redact_endpoint`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTraceSink;

impl LogTraceSink {
    /// Render `req` the way it is logged.
    pub fn format(&self, req: &HttpRequest) -> String {
        format!(
            "{} {} {:?}",
            req.method(),
            redact_endpoint(req.endpoint()),
            req.headers()
        )
    }
}

impl TraceSink for LogTraceSink {
    fn before_signing(&self, req: &HttpRequest) {
        debug!(target: SIGNATURE_LOG_TARGET, ">> {}", self.format(req));
    }

    fn after_signing(&self, req: &HttpRequest) {
        debug!(target: SIGNATURE_LOG_TARGET, "<< {}", self.format(req));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;

    #[test]
    fn test_log_trace_sink_masks_credentials() {
        let req = HttpRequest::builder()
            .endpoint("https://myaccount.blob.core.windows.net/c/b?sv=2021-08-06&sig=c2lnbmF0dXJl")
            .header(header::CONTENT_TYPE, "text/plain")
            .build()
            .unwrap();

        let line = LogTraceSink.format(&req);
        assert!(!line.contains("c2lnbmF0dXJl"), "{line}");
        assert!(line.contains("sv=2021-08-06&sig=***"), "{line}");
        assert!(line.contains("text/plain"), "{line}");
    }
}
