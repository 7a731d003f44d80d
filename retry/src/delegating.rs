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

use crate::{
    BackoffLimitedRetryHandler, HttpCommand, HttpResponse, Interrupt, RateLimitRetryHandler,
    RetryConfig, RetryDecision, RetryHandler,
};
use http::StatusCode;
use std::sync::Arc;

/// DelegatingRetryHandler routes a failure to a handler by status.
///
/// `429` goes to the rate-limited handler, every other `4xx` to the client
/// error handler and `5xx` to the server error handler. Anything else isn't
/// a failure and is never retried.
#[derive(Debug, Clone)]
pub struct DelegatingRetryHandler {
    rate_limited: Arc<dyn RetryHandler>,
    client_error: Arc<dyn RetryHandler>,
    server_error: Arc<dyn RetryHandler>,
}

impl Default for DelegatingRetryHandler {
    fn default() -> Self {
        Self::from_config(RetryConfig::default())
    }
}

impl DelegatingRetryHandler {
    /// Create a handler from its three delegates.
    pub fn new(
        rate_limited: impl RetryHandler,
        client_error: impl RetryHandler,
        server_error: impl RetryHandler,
    ) -> Self {
        Self {
            rate_limited: Arc::new(rate_limited),
            client_error: Arc::new(client_error),
            server_error: Arc::new(server_error),
        }
    }

    /// Rate-limit handling for `429`, exponential backoff for other client
    /// errors and for server errors.
    pub fn from_config(config: RetryConfig) -> Self {
        Self::from_config_with_interrupt(config, Interrupt::new())
    }

    /// Like [`from_config`](Self::from_config), with rate-limit waits
    /// cancelled through `interrupt`.
    pub fn from_config_with_interrupt(config: RetryConfig, interrupt: Interrupt) -> Self {
        let backoff = BackoffLimitedRetryHandler::new(config);
        Self::new(
            RateLimitRetryHandler::new(config).with_interrupt(interrupt),
            backoff.clone(),
            backoff,
        )
    }
}

impl RetryHandler for DelegatingRetryHandler {
    fn should_retry(&self, command: &mut HttpCommand, response: &HttpResponse) -> RetryDecision {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            self.rate_limited.should_retry(command, response)
        } else if status.is_client_error() {
            self.client_error.should_retry(command, response)
        } else if status.is_server_error() {
            self.server_error.should_retry(command, response)
        } else {
            RetryDecision::give_up(format!("status {status} is not a failure"))
        }
    }
}
