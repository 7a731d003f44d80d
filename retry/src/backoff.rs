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

//! Exponential backoff for generic failures.

use crate::{HttpCommand, HttpResponse, RetryConfig, RetryDecision, RetryHandler};
use log::{debug, warn};
use std::time::Duration;

/// Compute `min(period * failure_count^pow, max_period)`.
///
/// Saturates instead of overflowing.
pub fn backoff_delay(period: Duration, max_period: Duration, pow: u32, failure_count: u32) -> Duration {
    let factor = failure_count.checked_pow(pow).unwrap_or(u32::MAX);
    period.saturating_mul(factor).min(max_period)
}

/// Block for `min(period * failure_count^pow, period * 10)`.
///
/// `max` and `description` only show up in the log line.
pub fn impose_backoff_exponential_delay(
    period: Duration,
    pow: u32,
    failure_count: u32,
    max: u32,
    description: &str,
) {
    impose_backoff_exponential_delay_with_max(
        period,
        period.saturating_mul(10),
        pow,
        failure_count,
        max,
        description,
    )
}

/// Block for `min(period * failure_count^pow, max_period)`.
///
/// The wait can't be interrupted.
pub fn impose_backoff_exponential_delay_with_max(
    period: Duration,
    max_period: Duration,
    pow: u32,
    failure_count: u32,
    max: u32,
    description: &str,
) {
    if period.is_zero() {
        return;
    }

    let delay = backoff_delay(period, max_period, pow, failure_count);
    debug!(
        "{description}: retry {failure_count}/{max}: delaying for {}ms",
        delay.as_millis()
    );
    std::thread::sleep(delay);
}

/// BackoffLimitedRetryHandler retries replayable commands with an
/// exponentially growing delay until the retry limit is reached.
#[derive(Debug, Clone, Default)]
pub struct BackoffLimitedRetryHandler {
    config: RetryConfig,
}

impl BackoffLimitedRetryHandler {
    /// Create a handler from config.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// The config in use.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl RetryHandler for BackoffLimitedRetryHandler {
    fn should_retry(&self, command: &mut HttpCommand, response: &HttpResponse) -> RetryDecision {
        let failures = command.increment_failure_count();
        let req = command.current_request();

        if !command.is_replayable() {
            warn!(
                "cannot retry {} {} after {}: payload is not repeatable",
                req.method(),
                req.endpoint(),
                response.status()
            );
            return RetryDecision::give_up("request payload is not repeatable");
        }

        if failures > self.config.max_retries {
            warn!(
                "cannot retry {} {} after {}: retry limit {} reached",
                req.method(),
                req.endpoint(),
                response.status(),
                self.config.max_retries
            );
            return RetryDecision::give_up(format!(
                "retry limit {} reached",
                self.config.max_retries
            ));
        }

        let description = format!("{} {}", req.method(), req.endpoint());
        impose_backoff_exponential_delay(
            self.config.delay_start,
            self.config.backoff_pow,
            failures,
            self.config.max_retries,
            &description,
        );
        RetryDecision::Retry
    }
}
