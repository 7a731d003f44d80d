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

//! Server-directed waits for `429 Too Many Requests`.

use crate::{HttpCommand, HttpResponse, Interrupt, RetryConfig, RetryDecision, RetryHandler};
use cloudsign_core::ErrorKind;
use http::header::RETRY_AFTER;
use http::StatusCode;
use log::{debug, info, warn};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// RateLimitPolicy tells how long the server asks us to wait.
///
/// Providers that announce their limits in other headers can plug in their
/// own policy.
pub trait RateLimitPolicy: Debug + Send + Sync + 'static {
    /// Wait requested by `response`, or `None` if it asks for none.
    fn retry_after(&self, command: &HttpCommand, response: &HttpResponse) -> Option<Duration>;
}

/// RetryAfter reads `Retry-After` as an integer number of seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryAfter;

impl RateLimitPolicy for RetryAfter {
    fn retry_after(&self, _: &HttpCommand, response: &HttpResponse) -> Option<Duration> {
        let v = response.first_header(RETRY_AFTER)?;
        match v.trim().parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                debug!("ignoring Retry-After value {v:?}: not an integer number of seconds");
                None
            }
        }
    }
}

/// RateLimitRetryHandler waits as long as a `429` response asks and then
/// retries.
///
/// The wait can be cancelled through the handler's [`Interrupt`].
#[derive(Debug, Clone)]
pub struct RateLimitRetryHandler {
    config: RetryConfig,
    policy: Arc<dyn RateLimitPolicy>,
    interrupt: Interrupt,
}

impl Default for RateLimitRetryHandler {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RateLimitRetryHandler {
    /// Create a handler reading `Retry-After`.
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            policy: Arc::new(RetryAfter),
            interrupt: Interrupt::new(),
        }
    }

    /// Replace the wait policy.
    pub fn with_policy(mut self, policy: impl RateLimitPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Share an existing interrupt handle.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Handle that cancels waits of this handler.
    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }
}

impl RetryHandler for RateLimitRetryHandler {
    fn should_retry(&self, command: &mut HttpCommand, response: &HttpResponse) -> RetryDecision {
        let failures = command.increment_failure_count();

        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            return RetryDecision::give_up(format!("status {} is not rate limited", response.status()));
        }
        if !command.is_replayable() {
            warn!("cannot retry rate limited request: payload is not repeatable");
            return RetryDecision::give_up("request payload is not repeatable");
        }
        if failures > self.config.max_retries {
            warn!(
                "cannot retry rate limited request: retry limit {} reached",
                self.config.max_retries
            );
            return RetryDecision::give_up(format!(
                "retry limit {} reached",
                self.config.max_retries
            ));
        }

        let Some(wait) = self.policy.retry_after(command, response) else {
            info!("rate limited response has no usable wait, not retrying");
            return RetryDecision::give_up("rate limited response has no Retry-After");
        };
        if wait > self.config.max_rate_limit_wait {
            info!(
                "rate limit wait of {}ms exceeds {}ms, not retrying",
                wait.as_millis(),
                self.config.max_rate_limit_wait.as_millis()
            );
            return RetryDecision::give_up(format!(
                "rate limit wait of {}ms exceeds maximum of {}ms",
                wait.as_millis(),
                self.config.max_rate_limit_wait.as_millis()
            ));
        }

        debug!(
            "rate limited: retry {failures}/{}: waiting {}ms",
            self.config.max_retries,
            wait.as_millis()
        );
        match self.interrupt.sleep(wait) {
            Ok(()) => RetryDecision::Retry,
            Err(err) if err.kind() == ErrorKind::Interrupted => {
                warn!("rate limit wait interrupted");
                RetryDecision::Aborted
            }
            Err(err) => RetryDecision::give_up(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsign_core::{HttpRequest, Payload};
    use pretty_assertions::assert_eq;
    use std::io::Read;
    use std::time::Instant;

    fn command() -> HttpCommand {
        HttpCommand::new(
            HttpRequest::builder()
                .endpoint("https://myaccount.blob.core.windows.net/c")
                .payload("hello")
                .build()
                .unwrap(),
        )
    }

    fn too_many(retry_after: Option<&str>) -> HttpResponse {
        let resp = HttpResponse::new(StatusCode::TOO_MANY_REQUESTS);
        match retry_after {
            Some(v) => resp.with_header(RETRY_AFTER, v).unwrap(),
            None => resp,
        }
    }

    #[test]
    fn test_no_retry_after() {
        let mut cmd = command();
        let decision = RateLimitRetryHandler::default().should_retry(&mut cmd, &too_many(None));
        assert!(matches!(decision, RetryDecision::GiveUp(_)));
        assert_eq!(cmd.failure_count(), 1);
    }

    #[test]
    fn test_wait_over_maximum() {
        let mut cmd = command();
        let start = Instant::now();
        let decision =
            RateLimitRetryHandler::default().should_retry(&mut cmd, &too_many(Some("400")));
        assert!(matches!(decision, RetryDecision::GiveUp(_)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_not_rate_limited() {
        let mut cmd = command();
        let resp = HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE)
            .with_header(RETRY_AFTER, "1")
            .unwrap();
        let decision = RateLimitRetryHandler::default().should_retry(&mut cmd, &resp);
        assert!(matches!(decision, RetryDecision::GiveUp(_)));
    }

    #[test]
    fn test_non_replayable() {
        let mut cmd = HttpCommand::new(
            HttpRequest::builder()
                .payload(Payload::from_reader(std::io::empty()))
                .build()
                .unwrap(),
        );
        let decision =
            RateLimitRetryHandler::default().should_retry(&mut cmd, &too_many(Some("0")));
        assert_eq!(
            decision,
            RetryDecision::GiveUp("request payload is not repeatable".to_string())
        );
    }

    #[test]
    fn test_retry_limit() {
        let handler = RateLimitRetryHandler::new(RetryConfig::default().with_max_retries(2));
        let mut cmd = command();
        let resp = too_many(Some("0"));

        assert!(handler.should_retry(&mut cmd, &resp).is_retry());
        assert!(handler.should_retry(&mut cmd, &resp).is_retry());
        assert!(matches!(
            handler.should_retry(&mut cmd, &resp),
            RetryDecision::GiveUp(_)
        ));
    }

    #[test]
    fn test_waits_retry_after_and_keeps_payload() {
        let mut cmd = command();
        let resp = too_many(Some("1"))
            .with_payload(Payload::from_reader(std::io::Cursor::new(b"slow down".to_vec())));

        let start = Instant::now();
        let decision = RateLimitRetryHandler::default().should_retry(&mut cmd, &resp);
        assert_eq!(decision, RetryDecision::Retry);
        assert!(start.elapsed() >= Duration::from_millis(999));

        let payload = resp.payload().unwrap();
        assert!(!payload.is_consumed());
        let mut body = String::new();
        payload.open_stream().unwrap().read_to_string(&mut body).unwrap();
        assert_eq!(body, "slow down");
    }

    #[test]
    fn test_interrupted_wait_aborts() {
        let handler = RateLimitRetryHandler::default();
        let interrupt = handler.interrupt().clone();
        let start = Instant::now();

        let waiter = std::thread::spawn(move || {
            let mut cmd = command();
            handler.should_retry(&mut cmd, &too_many(Some("60")))
        });
        std::thread::sleep(Duration::from_millis(50));
        interrupt.interrupt();

        assert_eq!(waiter.join().unwrap(), RetryDecision::Aborted);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[derive(Debug)]
    struct FixedWait(Duration);

    impl RateLimitPolicy for FixedWait {
        fn retry_after(&self, _: &HttpCommand, _: &HttpResponse) -> Option<Duration> {
            Some(self.0)
        }
    }

    #[test]
    fn test_custom_policy() {
        let handler = RateLimitRetryHandler::default().with_policy(FixedWait(Duration::ZERO));
        let mut cmd = command();
        assert!(handler.should_retry(&mut cmd, &too_many(None)).is_retry());
    }
}
