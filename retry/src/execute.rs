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

use crate::{CommandState, HttpCommand, HttpResponse, RetryDecision, RetryHandler};
use cloudsign_core::{Error, HttpRequest, Result};
use log::debug;

/// Send `command` until it succeeds or `handler` stops retrying.
///
/// `send` is called with the command's current request on every attempt,
/// so it can re-sign before sending. A response with status below `400`
/// is a success. Errors returned by `send` end the loop as they are.
///
/// Giving up yields an [`ErrorKind::RetryExhausted`](cloudsign_core::ErrorKind::RetryExhausted)
/// error and an interrupted wait an
/// [`ErrorKind::Interrupted`](cloudsign_core::ErrorKind::Interrupted) error. Both
/// carry the last status and the number of attempts.
///
/// The calling thread blocks during waits. Async callers should run this
/// on a blocking thread, for example with `tokio::task::spawn_blocking`.
pub fn execute_with_retry<F>(
    command: &mut HttpCommand,
    handler: &dyn RetryHandler,
    mut send: F,
) -> Result<HttpResponse>
where
    F: FnMut(&HttpRequest) -> Result<HttpResponse>,
{
    let mut attempts: u32 = 0;
    loop {
        command.set_state(CommandState::Active);
        attempts += 1;

        let resp = send(command.current_request())?;
        let status = resp.status();
        if status.as_u16() < 400 {
            command.set_state(CommandState::Succeeded);
            return Ok(resp);
        }

        match handler.should_retry(command, &resp) {
            RetryDecision::Retry => {
                debug!("retrying after status {status}, attempt {attempts}");
                command.set_state(CommandState::Retrying);
            }
            RetryDecision::GiveUp(reason) => {
                command.set_state(CommandState::Exhausted);
                return Err(Error::retry_exhausted(format!(
                    "request failed with status {status} after {attempts} attempts: {reason}"
                )));
            }
            RetryDecision::Aborted => {
                command.set_state(CommandState::Aborted);
                return Err(Error::interrupted(format!(
                    "retry aborted after status {status} and {attempts} attempts"
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackoffLimitedRetryHandler, DelegatingRetryHandler, RetryConfig};
    use cloudsign_core::ErrorKind;
    use http::StatusCode;
    use std::time::Duration;

    fn command() -> HttpCommand {
        HttpCommand::new(
            HttpRequest::builder()
                .endpoint("https://ec2.us-west-2.amazonaws.com/")
                .payload("Action=DescribeRegions")
                .build()
                .unwrap(),
        )
    }

    fn fast() -> RetryConfig {
        RetryConfig::default().with_delay_start(Duration::from_millis(1))
    }

    #[test]
    fn test_succeeds_after_transient_failures() {
        let handler = DelegatingRetryHandler::from_config(fast());
        let mut cmd = command();
        let mut statuses = vec![StatusCode::OK, StatusCode::BAD_GATEWAY, StatusCode::SERVICE_UNAVAILABLE];

        let resp = execute_with_retry(&mut cmd, &handler, |_| {
            Ok(HttpResponse::new(statuses.pop().unwrap()))
        })
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(cmd.failure_count(), 2);
        assert_eq!(cmd.state(), CommandState::Succeeded);
    }

    #[test]
    fn test_exhaustion_surfaces_status() {
        let handler = BackoffLimitedRetryHandler::new(fast().with_max_retries(2));
        let mut cmd = command();
        let mut sends = 0;

        let err = execute_with_retry(&mut cmd, &handler, |_| {
            sends += 1;
            Ok(HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR))
        })
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RetryExhausted);
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("3 attempts"));
        assert_eq!(sends, 3);
        assert_eq!(cmd.state(), CommandState::Exhausted);
    }

    #[test]
    fn test_send_error_propagates() {
        let handler = BackoffLimitedRetryHandler::new(fast());
        let mut cmd = command();

        let err = execute_with_retry(&mut cmd, &handler, |_| {
            Err(Error::transport("connection reset"))
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(cmd.failure_count(), 0);
    }

    #[test]
    fn test_send_called_on_every_attempt() {
        let handler = BackoffLimitedRetryHandler::new(fast());
        let mut cmd = command();
        let mut seen = Vec::new();

        let _ = execute_with_retry(&mut cmd, &handler, |req| {
            seen.push(req.endpoint().to_string());
            if seen.len() == 1 {
                Ok(HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE))
            } else {
                Ok(HttpResponse::new(StatusCode::NO_CONTENT))
            }
        })
        .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
    }
}
