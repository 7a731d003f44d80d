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

use cloudsign_core::{Context, Result};
use std::time::Duration;

/// Env key for the retry limit.
pub const CLOUDSIGN_MAX_RETRIES: &str = "CLOUDSIGN_MAX_RETRIES";
/// Env key for the backoff period, in milliseconds.
pub const CLOUDSIGN_RETRY_DELAY_START: &str = "CLOUDSIGN_RETRY_DELAY_START";
/// Env key for the longest rate-limit wait accepted, in milliseconds.
pub const CLOUDSIGN_MAX_RATE_LIMIT_WAIT: &str = "CLOUDSIGN_MAX_RATE_LIMIT_WAIT";

/// Config for the retry handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Failures tolerated before giving up.
    ///
    /// default to `5`
    pub max_retries: u32,
    /// Base period of the exponential backoff.
    ///
    /// default to `50ms`
    pub delay_start: Duration,
    /// Exponent applied to the failure count.
    ///
    /// default to `2`
    pub backoff_pow: u32,
    /// Longest server-directed wait that is still honoured.
    ///
    /// default to `120s`
    pub max_rate_limit_wait: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay_start: Duration::from_millis(50),
            backoff_pow: 2,
            max_rate_limit_wait: Duration::from_secs(120),
        }
    }
}

impl RetryConfig {
    /// Set the retry limit.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff period.
    pub fn with_delay_start(mut self, delay_start: Duration) -> Self {
        self.delay_start = delay_start;
        self
    }

    /// Set the backoff exponent.
    pub fn with_backoff_pow(mut self, pow: u32) -> Self {
        self.backoff_pow = pow;
        self
    }

    /// Set the longest accepted rate-limit wait.
    pub fn with_max_rate_limit_wait(mut self, wait: Duration) -> Self {
        self.max_rate_limit_wait = wait;
        self
    }

    /// Load config from env, falling back to the defaults for unset keys.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(v) = ctx.env_parse::<u32>(CLOUDSIGN_MAX_RETRIES)? {
            cfg.max_retries = v;
        }
        if let Some(v) = ctx.env_parse::<u64>(CLOUDSIGN_RETRY_DELAY_START)? {
            cfg.delay_start = Duration::from_millis(v);
        }
        if let Some(v) = ctx.env_parse::<u64>(CLOUDSIGN_MAX_RATE_LIMIT_WAIT)? {
            cfg.max_rate_limit_wait = Duration::from_millis(v);
        }

        Ok(cfg)
    }
}
